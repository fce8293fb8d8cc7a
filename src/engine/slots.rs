use super::resolve::Window;
use super::util;
use crate::model::Reservation;
use chrono::NaiveTime;

/// Découpe des fenêtres ouvertes en débuts de créneaux de durée fixe.
///
/// Chaque créneau [t, t+G) tient strictement dans sa fenêtre ; aucun
/// alignement sur l'horloge murale n'est supposé (une fenêtre 09:15–10:45
/// à 30 min donne 09:15, 09:45, 10:15). Une fenêtre plus courte que G ne
/// produit rien.
pub(super) fn discretize(windows: &[Window], granularity_minutes: u32) -> Vec<NaiveTime> {
    let g = granularity_minutes.max(1);
    let mut slots = Vec::new();
    for &(start, end) in windows {
        let end_m = util::minutes_of(end);
        let mut m = util::minutes_of(start);
        while m + g <= end_m {
            slots.push(util::time_at_minutes(m));
            m += g;
        }
    }
    slots.sort();
    slots
}

/// Retire tout créneau dont [t, t+G) coupe une réservation active.
pub(super) fn filter_reserved(
    slots: Vec<NaiveTime>,
    granularity_minutes: u32,
    reservations: &[&Reservation],
) -> Vec<NaiveTime> {
    let g = granularity_minutes.max(1);
    slots
        .into_iter()
        .filter(|&slot| {
            let slot_end = util::time_at_minutes(util::minutes_of(slot) + g);
            !reservations
                .iter()
                .any(|r| util::overlaps(slot, slot_end, r.start, r.end))
        })
        .collect()
}
