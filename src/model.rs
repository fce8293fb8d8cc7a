use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifiant fort pour Kitchen
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KitchenId(String);

impl KitchenId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour Chef (opaque, fourni par la couche identité)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChefId(String);

impl ChefId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour Reservation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(String);

impl ReservationId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour OverrideSegment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverrideId(String);

impl OverrideId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Cuisine réservable, rattachée à un lieu qui fournit le fuseau IANA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kitchen {
    pub id: KitchenId,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Identifiant IANA (ex. "America/St_Johns") ; UTC si absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Kitchen {
    pub fn new<N: Into<String>>(name: N, timezone: Option<String>) -> Self {
        Self {
            id: KitchenId::random(),
            name: name.into(),
            is_active: true,
            timezone,
        }
    }
}

/// Règle hebdomadaire : gabarit récurrent par jour de semaine.
/// Au plus une règle par (cuisine, jour) ; `Registry::upsert_weekly_rule`
/// remplace en place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRule {
    pub kitchen: KitchenId,
    /// 0 = dimanche … 6 = samedi
    pub weekday: u8,
    pub is_open: bool,
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl WeeklyRule {
    pub fn new(
        kitchen: KitchenId,
        weekday: u8,
        is_open: bool,
        open: NaiveTime,
        close: NaiveTime,
    ) -> Result<Self, String> {
        if weekday > 6 {
            return Err("weekday must be in 0..=6 (0 = Sunday)".to_string());
        }
        if is_open && close <= open {
            return Err("close must be strictly after open".to_string());
        }
        Ok(Self {
            kitchen,
            weekday,
            is_open,
            open,
            close,
        })
    }
}

/// Nature d'un segment d'exception : base ouverte ou découpe fermée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Open,
    Block,
}

/// Exception datée : remplace le gabarit hebdomadaire pour une date.
/// Les segments `Open` forment la base ; les segments `Block` s'y découpent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideSegment {
    pub id: OverrideId,
    pub kitchen: KitchenId,
    pub date: NaiveDate,
    pub kind: SegmentKind,
    pub start: NaiveTime,
    pub end: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl OverrideSegment {
    pub fn new(
        kitchen: KitchenId,
        date: NaiveDate,
        kind: SegmentKind,
        start: NaiveTime,
        end: NaiveTime,
        reason: Option<String>,
    ) -> Result<Self, String> {
        if end <= start {
            return Err("end must be strictly after start".to_string());
        }
        Ok(Self {
            id: OverrideId::random(),
            kitchen,
            date,
            kind,
            start,
            end,
            reason,
        })
    }

    /// Même segment logique : clé (cuisine, date, nature, bornes).
    pub fn same_row(&self, other: &OverrideSegment) -> bool {
        self.kitchen == other.kitchen
            && self.date == other.date
            && self.kind == other.kind
            && self.start == other.start
            && self.end == other.end
    }
}

/// Cycle de vie : pending → confirmed | cancelled ; cancelled est terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    /// pending et confirmed comptent contre la disponibilité.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

/// Réservation d'une cuisine sur [start, end) en heure locale du lieu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub kitchen: KitchenId,
    pub chef: ChefId,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub status: ReservationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Crée une réservation en validant que `end > start`.
    pub fn new(
        kitchen: KitchenId,
        chef: ChefId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        status: ReservationStatus,
    ) -> Result<Self, String> {
        if end <= start {
            return Err("end must be strictly after start".to_string());
        }
        Ok(Self {
            id: ReservationId::random(),
            kitchen,
            chef,
            date,
            start,
            end,
            status,
            notes: None,
            created_at: Utc::now(),
        })
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Durée en minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Jour de semaine d'une date, convention 0 = dimanche.
pub fn weekday_of(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Registre complet : cuisines, gabarits, exceptions, réservations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Registry {
    pub kitchens: Vec<Kitchen>,
    pub weekly_rules: Vec<WeeklyRule>,
    pub overrides: Vec<OverrideSegment>,
    pub reservations: Vec<Reservation>,
}

impl Registry {
    pub fn find_kitchen<'a>(&'a self, id: &KitchenId) -> Option<&'a Kitchen> {
        self.kitchens.iter().find(|k| &k.id == id)
    }

    pub fn find_kitchen_by_name<'a>(&'a self, name: &str) -> Option<&'a Kitchen> {
        self.kitchens.iter().find(|k| k.name == name)
    }

    pub fn weekly_rule<'a>(&'a self, kitchen: &KitchenId, weekday: u8) -> Option<&'a WeeklyRule> {
        self.weekly_rules
            .iter()
            .find(|r| &r.kitchen == kitchen && r.weekday == weekday)
    }

    /// Remplace la règle existante pour (cuisine, jour) ou insère.
    pub fn upsert_weekly_rule(&mut self, rule: WeeklyRule) {
        match self
            .weekly_rules
            .iter_mut()
            .find(|r| r.kitchen == rule.kitchen && r.weekday == rule.weekday)
        {
            Some(slot) => *slot = rule,
            None => self.weekly_rules.push(rule),
        }
    }

    pub fn overrides_for<'a>(
        &'a self,
        kitchen: &'a KitchenId,
        date: NaiveDate,
    ) -> impl Iterator<Item = &'a OverrideSegment> {
        self.overrides
            .iter()
            .filter(move |o| &o.kitchen == kitchen && o.date == date)
    }

    pub fn find_override<'a>(&'a self, id: &OverrideId) -> Option<&'a OverrideSegment> {
        self.overrides.iter().find(|o| &o.id == id)
    }

    pub fn find_reservation<'a>(&'a self, id: &ReservationId) -> Option<&'a Reservation> {
        self.reservations.iter().find(|r| &r.id == id)
    }

    pub fn find_reservation_mut(&mut self, id: &ReservationId) -> Option<&mut Reservation> {
        self.reservations.iter_mut().find(|r| &r.id == id)
    }

    /// Réservations actives (pending/confirmed) d'une cuisine pour une date.
    pub fn active_reservations<'a>(
        &'a self,
        kitchen: &'a KitchenId,
        date: NaiveDate,
    ) -> impl Iterator<Item = &'a Reservation> {
        self.reservations
            .iter()
            .filter(move |r| &r.kitchen == kitchen && r.date == date && r.is_active())
    }

    /// Écriture d'une réservation sous contrainte d'exclusion.
    ///
    /// Re-vérifie le chevauchement au moment de l'écriture, sous emprunt
    /// exclusif : filet contre le double-booking, indépendant des
    /// pré-vérifications de l'appelant. Renvoie les réservations en conflit
    /// sans rien écrire.
    pub fn commit_reservation(
        &mut self,
        reservation: Reservation,
    ) -> Result<ReservationId, Vec<Reservation>> {
        let offenders: Vec<Reservation> = self
            .active_reservations(&reservation.kitchen, reservation.date)
            .filter(|r| reservation.start < r.end && r.start < reservation.end)
            .cloned()
            .collect();
        if !offenders.is_empty() {
            return Err(offenders);
        }
        let id = reservation.id.clone();
        self.reservations.push(reservation);
        Ok(id)
    }
}
