use crate::model::{ChefId, OverrideId, Reservation, ReservationId};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Options de découpage en créneaux
#[derive(Debug, Clone, Copy)]
pub struct SlotOptions {
    pub granularity_minutes: u32,
}

impl Default for SlotOptions {
    fn default() -> Self {
        Self {
            granularity_minutes: 30,
        }
    }
}

/// Issue d'un upsert/delete d'exception datée.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted(OverrideId),
    Replaced(OverrideId),
    Unchanged(OverrideId),
    Deleted(OverrideId),
}

impl UpsertOutcome {
    pub fn id(&self) -> &OverrideId {
        match self {
            Self::Inserted(id) | Self::Replaced(id) | Self::Unchanged(id) | Self::Deleted(id) => id,
        }
    }
}

/// Réservation fautive renvoyée dans un `BookingError::Conflict` :
/// de quoi agir côté gestionnaire (qui, quand, quelle plage).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictEntry {
    pub reservation: ReservationId,
    pub chef: ChefId,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl From<&Reservation> for ConflictEntry {
    fn from(r: &Reservation) -> Self {
        Self {
            reservation: r.id.clone(),
            chef: r.chef.clone(),
            date: r.date,
            start: r.start,
            end: r.end,
        }
    }
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("invalid time range: end must be after start")]
    InvalidTimeRange,
    #[error("validation failed: {0}")]
    Validation(&'static str),
    #[error("unknown kitchen: {0}")]
    UnknownKitchen(String),
    #[error("unknown override segment: {0}")]
    UnknownOverride(String),
    #[error("unknown reservation: {0}")]
    UnknownReservation(String),
    #[error("conflicts with {} active reservation(s)", .0.len())]
    Conflict(Vec<ConflictEntry>),
    #[error("requested start {requested} already elapsed (kitchen-local now: {now_local})")]
    PastTime {
        requested: NaiveDateTime,
        now_local: NaiveDateTime,
    },
    #[error("status transition invalid: {0}")]
    StatusInvalid(&'static str),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
