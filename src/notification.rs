use crate::model::{ChefId, Kitchen, Registry, Reservation, ReservationId};
use crate::temporal::{self, TemporalState};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};

/// Rappel généré pour la prochaine réservation d'un chef.
#[derive(Debug, Clone)]
pub struct Notice {
    pub chef: ChefId,
    pub reservation: ReservationId,
    pub starts_in: Duration,
    pub content: String,
}

/// Permet de customiser le rendu du message (texte, mail, SMS…) ; le
/// contenu effectivement envoyé reste hors du moteur.
pub trait NoticeRenderer {
    fn render(&self, kitchen: &Kitchen, reservation: &Reservation, starts_in: Duration) -> String;
}

/// Gabarit texte simple destiné à un futur mail/SMS.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextNotice;

impl NoticeRenderer for TextNotice {
    fn render(&self, kitchen: &Kitchen, reservation: &Reservation, starts_in: Duration) -> String {
        format!(
            "Bonjour,\n\nTa réservation de la cuisine \"{kitchen}\" approche : le {date} de {start} à {end} (heure locale du lieu), soit dans {hours} h.\n\nPense à vérifier ton matériel et tes ingrédients.\n",
            kitchen = kitchen.name,
            date = reservation.date.format("%Y-%m-%d"),
            start = reservation.start.format("%H:%M"),
            end = reservation.end.format("%H:%M"),
            hours = starts_in.num_hours()
        )
    }
}

/// Prépare un rappel pour la prochaine réservation active à venir d'un chef.
pub fn prepare_notice(
    registry: &Registry,
    chef: &ChefId,
    now: DateTime<Utc>,
    renderer: &dyn NoticeRenderer,
) -> Result<Notice> {
    let mut upcoming: Vec<&Reservation> = registry
        .reservations
        .iter()
        .filter(|r| {
            if !(r.is_active() && &r.chef == chef) {
                return false;
            }
            let Some(kitchen) = registry.find_kitchen(&r.kitchen) else {
                return false;
            };
            temporal::classify(r, temporal::kitchen_tz(kitchen), now) == TemporalState::Upcoming
        })
        .collect();

    if upcoming.is_empty() {
        bail!("no upcoming reservation found for chef {}", chef.as_str());
    }

    upcoming.sort_by_key(|r| (r.date, r.start));
    let reservation = upcoming[0];
    let kitchen = registry
        .find_kitchen(&reservation.kitchen)
        .with_context(|| format!("unknown kitchen: {}", reservation.kitchen.as_str()))?;

    let starts_in = temporal::time_until_start(reservation, temporal::kitchen_tz(kitchen), now);
    let content = renderer.render(kitchen, reservation, starts_in);
    Ok(Notice {
        chef: reservation.chef.clone(),
        reservation: reservation.id.clone(),
        starts_in,
        content,
    })
}
