use super::resolve::Window;
use super::types::ConflictEntry;
use super::util;
use crate::model::{weekday_of, KitchenId, Registry, Reservation};
use chrono::{NaiveDate, NaiveTime};

/// Réservations actives que les fenêtres proposées ne contiennent plus.
///
/// Garde commune aux mutations d'exceptions : toute réservation qui ne tient
/// plus entièrement dans une fenêtre résultante serait orpheline, donc la
/// mutation est refusée avant toute écriture.
pub(super) fn orphaned_by<'a, I>(windows: &[Window], reservations: I) -> Vec<ConflictEntry>
where
    I: Iterator<Item = &'a Reservation>,
{
    let mut out: Vec<ConflictEntry> = reservations
        .filter(|r| !windows.iter().any(|w| util::window_contains(*w, r.start, r.end)))
        .map(ConflictEntry::from)
        .collect();
    out.sort_by_key(|c| (c.date, c.start));
    out
}

/// Réservations actives coupant directement la plage [start, end).
pub(super) fn intersecting<'a, I>(
    start: NaiveTime,
    end: NaiveTime,
    reservations: I,
) -> Vec<ConflictEntry>
where
    I: Iterator<Item = &'a Reservation>,
{
    let mut out: Vec<ConflictEntry> = reservations
        .filter(|r| util::overlaps(start, end, r.start, r.end))
        .map(ConflictEntry::from)
        .collect();
    out.sort_by_key(|c| (c.date, c.start));
    out
}

/// Garde d'édition du gabarit hebdomadaire.
///
/// Ne regarde que les dates à venir (`from_date` inclus) sans exception
/// datée : là, le gabarit est ce qui s'applique réellement. Une journée
/// fermée rend toute réservation orpheline ; des horaires rétrécis rendent
/// orphelines celles qui débordent.
pub(super) fn weekly_orphans(
    registry: &Registry,
    kitchen: &KitchenId,
    weekday: u8,
    is_open: bool,
    open: NaiveTime,
    close: NaiveTime,
    from_date: NaiveDate,
) -> Vec<ConflictEntry> {
    let mut out: Vec<ConflictEntry> = registry
        .reservations
        .iter()
        .filter(|r| {
            r.is_active()
                && &r.kitchen == kitchen
                && r.date >= from_date
                && weekday_of(r.date) == weekday
                && registry.overrides_for(kitchen, r.date).next().is_none()
        })
        .filter(|r| !is_open || !util::window_contains((open, close), r.start, r.end))
        .map(ConflictEntry::from)
        .collect();
    out.sort_by_key(|c| (c.date, c.start));
    out
}
