mod conflicts;
mod mutate;
mod resolve;
mod slots;
mod types;
mod util;

pub use resolve::Window;
pub use types::{BookingError, ConflictEntry, SlotOptions, UpsertOutcome};

use crate::model::{
    ChefId, Kitchen, KitchenId, OverrideId, Registry, Reservation, ReservationId,
    ReservationStatus, SegmentKind,
};
use crate::temporal::{self, TemporalState};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Engine : encapsule le Registry et porte les opérations de résolution
/// de disponibilité et de mutation gardée.
#[derive(Debug, Default)]
pub struct Engine {
    registry: Registry,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            registry: Registry::default(),
        }
    }

    pub fn from_registry(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn add_kitchen(&mut self, name: &str, timezone: Option<String>) -> KitchenId {
        let kitchen = Kitchen::new(name, timezone);
        let id = kitchen.id.clone();
        self.registry.kitchens.push(kitchen);
        id
    }

    /// Fenêtres ouvertes d'une journée (exceptions datées, sinon gabarit).
    /// Une cuisine inactive n'a aucune fenêtre.
    pub fn open_windows(
        &self,
        kitchen: &KitchenId,
        date: NaiveDate,
    ) -> Result<Vec<Window>, BookingError> {
        let k = self
            .registry
            .find_kitchen(kitchen)
            .ok_or_else(|| BookingError::UnknownKitchen(kitchen.as_str().to_string()))?;
        if !k.is_active {
            return Ok(Vec::new());
        }
        Ok(resolve::day_windows(&self.registry, kitchen, date))
    }

    /// Créneaux réservables : fenêtres ouvertes, découpées à la granularité
    /// demandée, moins tout créneau coupant une réservation active.
    pub fn available_slots(
        &self,
        kitchen: &KitchenId,
        date: NaiveDate,
        opts: SlotOptions,
    ) -> Result<Vec<NaiveTime>, BookingError> {
        let windows = self.open_windows(kitchen, date)?;
        let candidates = slots::discretize(&windows, opts.granularity_minutes);
        let active: Vec<&Reservation> = self.registry.active_reservations(kitchen, date).collect();
        Ok(slots::filter_reserved(
            candidates,
            opts.granularity_minutes,
            &active,
        ))
    }

    pub fn upsert_override(
        &mut self,
        kitchen: &KitchenId,
        date: NaiveDate,
        kind: SegmentKind,
        start: NaiveTime,
        end: NaiveTime,
        reason: Option<String>,
    ) -> Result<UpsertOutcome, BookingError> {
        mutate::upsert_override(self, kitchen, date, kind, start, end, reason)
    }

    pub fn delete_override(&mut self, id: &OverrideId) -> Result<UpsertOutcome, BookingError> {
        mutate::delete_override(self, id)
    }

    pub fn set_weekly_rule(
        &mut self,
        kitchen: &KitchenId,
        weekday: u8,
        is_open: bool,
        open: NaiveTime,
        close: NaiveTime,
        from_date: NaiveDate,
    ) -> Result<(), BookingError> {
        mutate::set_weekly_rule(self, kitchen, weekday, is_open, open, close, from_date)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_reservation(
        &mut self,
        kitchen: &KitchenId,
        chef: &ChefId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        notes: Option<String>,
        initial_status: ReservationStatus,
        now: DateTime<Utc>,
    ) -> Result<ReservationId, BookingError> {
        mutate::create_reservation(
            self, kitchen, chef, date, start, end, notes, initial_status, now,
        )
    }

    pub fn confirm_reservation(&mut self, id: &ReservationId) -> Result<(), BookingError> {
        mutate::confirm_reservation(self, id)
    }

    pub fn cancel_reservation(&mut self, id: &ReservationId) -> Result<(), BookingError> {
        mutate::cancel_reservation(self, id)
    }

    /// Classe une réservation (passée / en cours / à venir) dans le fuseau
    /// de sa cuisine, à l'instant UTC fourni.
    pub fn classify(
        &self,
        id: &ReservationId,
        now: DateTime<Utc>,
    ) -> Result<TemporalState, BookingError> {
        let r = self
            .registry
            .find_reservation(id)
            .ok_or_else(|| BookingError::UnknownReservation(id.as_str().to_string()))?;
        let k = self
            .registry
            .find_kitchen(&r.kitchen)
            .ok_or_else(|| BookingError::UnknownKitchen(r.kitchen.as_str().to_string()))?;
        Ok(temporal::classify(r, temporal::kitchen_tz(k), now))
    }
}
