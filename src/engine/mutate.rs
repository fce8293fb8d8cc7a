use super::types::{BookingError, ConflictEntry, UpsertOutcome};
use super::{conflicts, resolve, Engine};
use crate::model::{
    ChefId, KitchenId, OverrideId, OverrideSegment, Reservation, ReservationId, ReservationStatus,
    SegmentKind, WeeklyRule,
};
use crate::temporal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Upsert idempotent d'une exception datée.
///
/// Trois issues : segment identique déjà stocké → aucun changement ; même
/// (cuisine, date, nature) avec d'autres bornes → remplacement en place ;
/// sinon insertion. La garde de conflit s'exécute sur le jeu d'exceptions
/// proposé avant toute écriture : une réservation active qui ne tiendrait
/// plus dans les fenêtres résultantes fait échouer la mutation entière.
pub(super) fn upsert_override(
    engine: &mut Engine,
    kitchen: &KitchenId,
    date: NaiveDate,
    kind: SegmentKind,
    start: NaiveTime,
    end: NaiveTime,
    reason: Option<String>,
) -> Result<UpsertOutcome, BookingError> {
    if end <= start {
        return Err(BookingError::InvalidTimeRange);
    }
    if engine.registry.find_kitchen(kitchen).is_none() {
        return Err(BookingError::UnknownKitchen(kitchen.as_str().to_string()));
    }

    // Relance idempotente : rien à faire, rien à dupliquer.
    if let Some(existing) = engine
        .registry
        .overrides_for(kitchen, date)
        .find(|o| o.kind == kind && o.start == start && o.end == end)
    {
        return Ok(UpsertOutcome::Unchanged(existing.id.clone()));
    }

    let replace_id: Option<OverrideId> = engine
        .registry
        .overrides_for(kitchen, date)
        .find(|o| o.kind == kind)
        .map(|o| o.id.clone());

    let candidate = OverrideSegment::new(kitchen.clone(), date, kind, start, end, reason)
        .map_err(|_| BookingError::InvalidTimeRange)?;

    let mut proposed: Vec<OverrideSegment> = engine
        .registry
        .overrides_for(kitchen, date)
        .filter(|o| Some(&o.id) != replace_id.as_ref())
        .cloned()
        .collect();
    proposed.push(candidate.clone());

    let windows = resolve::windows_from_segments(proposed.iter());
    let orphans =
        conflicts::orphaned_by(&windows, engine.registry.active_reservations(kitchen, date));
    if !orphans.is_empty() {
        return Err(BookingError::Conflict(orphans));
    }

    match replace_id {
        Some(id) => {
            if let Some(row) = engine.registry.overrides.iter_mut().find(|o| o.id == id) {
                row.start = start;
                row.end = end;
                row.reason = candidate.reason;
            }
            Ok(UpsertOutcome::Replaced(id))
        }
        None => {
            let id = candidate.id.clone();
            engine.registry.overrides.push(candidate);
            Ok(UpsertOutcome::Inserted(id))
        }
    }
}

/// Suppression d'une exception par identifiant.
///
/// Retirer un `Block` ne fait qu'élargir la disponibilité : pas de garde.
/// Retirer une base `Open` rétrécit la journée (retour au gabarit si c'était
/// la dernière), donc la garde s'applique.
pub(super) fn delete_override(
    engine: &mut Engine,
    id: &OverrideId,
) -> Result<UpsertOutcome, BookingError> {
    let pos = engine
        .registry
        .overrides
        .iter()
        .position(|o| &o.id == id)
        .ok_or_else(|| BookingError::UnknownOverride(id.as_str().to_string()))?;
    let seg = engine.registry.overrides[pos].clone();

    if seg.kind == SegmentKind::Open {
        let remaining: Vec<OverrideSegment> = engine
            .registry
            .overrides_for(&seg.kitchen, seg.date)
            .filter(|o| o.id != seg.id)
            .cloned()
            .collect();
        let windows = if remaining.is_empty() {
            resolve::weekly_windows(&engine.registry, &seg.kitchen, seg.date)
        } else {
            resolve::windows_from_segments(remaining.iter())
        };
        let orphans = conflicts::orphaned_by(
            &windows,
            engine.registry.active_reservations(&seg.kitchen, seg.date),
        );
        if !orphans.is_empty() {
            return Err(BookingError::Conflict(orphans));
        }
    }

    engine.registry.overrides.remove(pos);
    Ok(UpsertOutcome::Deleted(seg.id))
}

/// Édition du gabarit hebdomadaire, gardée contre les réservations à venir
/// (dates ≥ `from_date` sans exception datée) que les nouveaux horaires ne
/// contiendraient plus.
pub(super) fn set_weekly_rule(
    engine: &mut Engine,
    kitchen: &KitchenId,
    weekday: u8,
    is_open: bool,
    open: NaiveTime,
    close: NaiveTime,
    from_date: NaiveDate,
) -> Result<(), BookingError> {
    if weekday > 6 {
        return Err(BookingError::Validation("weekday must be in 0..=6"));
    }
    if engine.registry.find_kitchen(kitchen).is_none() {
        return Err(BookingError::UnknownKitchen(kitchen.as_str().to_string()));
    }
    let rule = WeeklyRule::new(kitchen.clone(), weekday, is_open, open, close)
        .map_err(|_| BookingError::InvalidTimeRange)?;

    let orphans = conflicts::weekly_orphans(
        &engine.registry,
        kitchen,
        weekday,
        is_open,
        open,
        close,
        from_date,
    );
    if !orphans.is_empty() {
        return Err(BookingError::Conflict(orphans));
    }

    engine.registry.upsert_weekly_rule(rule);
    Ok(())
}

/// Création d'une réservation : validation, garde anti-passé dans le fuseau
/// de la cuisine, pré-vérification de chevauchement, puis écriture sous la
/// contrainte d'exclusion du registre.
#[allow(clippy::too_many_arguments)]
pub(super) fn create_reservation(
    engine: &mut Engine,
    kitchen: &KitchenId,
    chef: &ChefId,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    notes: Option<String>,
    initial_status: ReservationStatus,
    now: DateTime<Utc>,
) -> Result<ReservationId, BookingError> {
    if end <= start {
        return Err(BookingError::InvalidTimeRange);
    }
    if initial_status == ReservationStatus::Cancelled {
        return Err(BookingError::StatusInvalid(
            "initial status cannot be cancelled",
        ));
    }
    let k = engine
        .registry
        .find_kitchen(kitchen)
        .ok_or_else(|| BookingError::UnknownKitchen(kitchen.as_str().to_string()))?;
    if !k.is_active {
        return Err(BookingError::Validation("kitchen is not active"));
    }

    // Garde anti-passé : comparaison en heure murale du lieu, jamais dans
    // le fuseau du processus appelant.
    let tz = temporal::kitchen_tz(k);
    let now_local = temporal::local_now(tz, now);
    let requested = date.and_time(start);
    if requested <= now_local {
        return Err(BookingError::PastTime {
            requested,
            now_local,
        });
    }

    let offenders = conflicts::intersecting(
        start,
        end,
        engine.registry.active_reservations(kitchen, date),
    );
    if !offenders.is_empty() {
        return Err(BookingError::Conflict(offenders));
    }

    let mut reservation =
        Reservation::new(kitchen.clone(), chef.clone(), date, start, end, initial_status)
            .map_err(|_| BookingError::InvalidTimeRange)?;
    reservation.notes = notes;

    engine.registry.commit_reservation(reservation).map_err(|offenders| {
        BookingError::Conflict(offenders.iter().map(ConflictEntry::from).collect())
    })
}

pub(super) fn confirm_reservation(
    engine: &mut Engine,
    id: &ReservationId,
) -> Result<(), BookingError> {
    let r = engine
        .registry
        .find_reservation_mut(id)
        .ok_or_else(|| BookingError::UnknownReservation(id.as_str().to_string()))?;
    match r.status {
        ReservationStatus::Cancelled => {
            Err(BookingError::StatusInvalid("reservation is cancelled"))
        }
        _ => {
            r.status = ReservationStatus::Confirmed;
            Ok(())
        }
    }
}

pub(super) fn cancel_reservation(
    engine: &mut Engine,
    id: &ReservationId,
) -> Result<(), BookingError> {
    let r = engine
        .registry
        .find_reservation_mut(id)
        .ok_or_else(|| BookingError::UnknownReservation(id.as_str().to_string()))?;
    match r.status {
        ReservationStatus::Cancelled => {
            Err(BookingError::StatusInvalid("reservation already cancelled"))
        }
        _ => {
            r.status = ReservationStatus::Cancelled;
            Ok(())
        }
    }
}
