//! Classification temporelle dans le fuseau du lieu.
//!
//! Toutes les heures du registre sont murales (date + HH:MM, locales à la
//! cuisine). La seule conversion de fuseau se fait ici : « maintenant » UTC
//! est projeté dans le fuseau IANA du lieu, puis comparé en heure locale
//! naïve. Comparer en UTC ou dans le fuseau du serveur produit de faux
//! accepts/rejects autour de minuit.

use crate::model::{Kitchen, Reservation};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Position d'une réservation par rapport à maintenant, demi-ouverte :
/// Past si end ≤ now, Active si start ≤ now < end, Upcoming sinon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalState {
    Past,
    Active,
    Upcoming,
}

/// Fuseau d'une cuisine : identifiant IANA du lieu, UTC en secours
/// (absent ou illisible).
pub fn kitchen_tz(kitchen: &Kitchen) -> Tz {
    kitchen
        .timezone
        .as_deref()
        .and_then(|s| s.parse::<Tz>().ok())
        .unwrap_or(Tz::UTC)
}

/// Heure murale du lieu à l'instant UTC donné.
pub fn local_now(tz: Tz, now: DateTime<Utc>) -> NaiveDateTime {
    now.with_timezone(&tz).naive_local()
}

pub fn classify(reservation: &Reservation, tz: Tz, now: DateTime<Utc>) -> TemporalState {
    let now_local = local_now(tz, now);
    let start = reservation.date.and_time(reservation.start);
    let end = reservation.date.and_time(reservation.end);
    if end <= now_local {
        TemporalState::Past
    } else if start <= now_local {
        TemporalState::Active
    } else {
        TemporalState::Upcoming
    }
}

/// Délai signé jusqu'au début de la réservation (négatif si entamée).
/// Consommé par la politique d'annulation, externe au moteur.
pub fn time_until_start(reservation: &Reservation, tz: Tz, now: DateTime<Utc>) -> Duration {
    let now_local = local_now(tz, now);
    reservation.date.and_time(reservation.start) - now_local
}
