#![forbid(unsafe_code)]
//! Creneau — moteur de disponibilité et de réservation de cuisines partagées (sans BD).
//!
//! - Stockage fichiers (JSON/CSV).
//! - Gabarit hebdomadaire + exceptions datées (algèbre d'intervalles).
//! - Découpage en créneaux, détection de conflits, mutations gardées.
//! - Heures murales locales au lieu ; fuseau IANA appliqué à la
//!   classification seulement.

pub mod engine;
pub mod io;
pub mod model;
pub mod notification;
pub mod storage;
pub mod temporal;
pub mod template;

pub use engine::{BookingError, ConflictEntry, Engine, SlotOptions, UpsertOutcome, Window};
pub use model::{
    ChefId, Kitchen, KitchenId, OverrideId, OverrideSegment, Registry, Reservation,
    ReservationId, ReservationStatus, SegmentKind, WeeklyRule,
};
pub use notification::{prepare_notice, Notice, NoticeRenderer, TextNotice};
pub use storage::{JsonStorage, Storage};
pub use temporal::{classify, kitchen_tz, time_until_start, TemporalState};
pub use template::{
    apply_template, export_template_json, load_template_from_file, preview_windows, DayHours,
    TemplateInfo, TemplateStore, WeekTemplate,
};
