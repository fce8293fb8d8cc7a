#![forbid(unsafe_code)]
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use creneau::{
    classify, kitchen_tz, time_until_start, BookingError, ChefId, Engine, Kitchen, KitchenId,
    Reservation, ReservationStatus, TemporalState,
};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn reservation(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Reservation {
    Reservation::new(
        KitchenId::new("k"),
        ChefId::new("chef"),
        date,
        start,
        end,
        ReservationStatus::Confirmed,
    )
    .unwrap()
}

// America/St_Johns : UTC−3:30 en hiver. 12:00 UTC → 08:30 locale.
const ST_JOHNS: &str = "America/St_Johns";

#[test]
fn kitchen_tz_falls_back_to_utc() {
    let named = Kitchen::new("A", Some(ST_JOHNS.to_string()));
    assert_eq!(kitchen_tz(&named).name(), ST_JOHNS);

    let absent = Kitchen::new("B", None);
    assert_eq!(kitchen_tz(&absent), chrono_tz::Tz::UTC);

    let garbled = Kitchen::new("C", Some("Mars/Olympus".to_string()));
    assert_eq!(kitchen_tz(&garbled), chrono_tz::Tz::UTC);
}

#[test]
fn classification_uses_kitchen_local_wall_clock() {
    let tz: chrono_tz::Tz = ST_JOHNS.parse().unwrap();
    let now = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap(); // 08:30 locale
    let date = d(2026, 1, 5);

    // end ≤ now : passée
    assert_eq!(
        classify(&reservation(date, t(6, 0), t(8, 30)), tz, now),
        TemporalState::Past
    );
    // start ≤ now < end : en cours
    assert_eq!(
        classify(&reservation(date, t(8, 0), t(9, 0)), tz, now),
        TemporalState::Active
    );
    assert_eq!(
        classify(&reservation(date, t(8, 30), t(9, 0)), tz, now),
        TemporalState::Active
    );
    // start > now : à venir — même si l'horloge UTC lit déjà 12:00
    assert_eq!(
        classify(&reservation(date, t(9, 0), t(10, 0)), tz, now),
        TemporalState::Upcoming
    );
}

#[test]
fn time_until_start_is_signed() {
    let tz: chrono_tz::Tz = ST_JOHNS.parse().unwrap();
    let now = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap(); // 08:30 locale
    let date = d(2026, 1, 5);

    let upcoming = reservation(date, t(10, 30), t(12, 0));
    assert_eq!(time_until_start(&upcoming, tz, now), Duration::hours(2));

    let started = reservation(date, t(8, 0), t(12, 0));
    assert_eq!(time_until_start(&started, tz, now), Duration::minutes(-30));
}

#[test]
fn past_start_in_kitchen_zone_is_rejected() {
    let mut engine = Engine::new();
    let kitchen = engine.add_kitchen("Terre-Neuve", Some(ST_JOHNS.to_string()));
    let date = d(2026, 1, 5);
    engine
        .upsert_override(
            &kitchen,
            date,
            creneau::SegmentKind::Open,
            t(6, 0),
            t(22, 0),
            None,
        )
        .unwrap();
    let now = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap(); // 08:30 locale

    // 08:00 locale est déjà passée
    let err = engine
        .create_reservation(
            &kitchen,
            &ChefId::new("chef-ana"),
            date,
            t(8, 0),
            t(9, 0),
            None,
            ReservationStatus::Pending,
            now,
        )
        .unwrap_err();
    assert!(matches!(err, BookingError::PastTime { .. }));

    // 09:00 locale est à venir, même si 09:00 UTC est derrière nous
    engine
        .create_reservation(
            &kitchen,
            &ChefId::new("chef-ana"),
            date,
            t(9, 0),
            t(10, 0),
            None,
            ReservationStatus::Pending,
            now,
        )
        .unwrap();
}

#[test]
fn double_booking_is_rejected_before_and_at_commit() {
    let mut engine = Engine::new();
    let kitchen = engine.add_kitchen("Cuisine Centrale", None);
    let date = d(2026, 1, 8);
    engine
        .upsert_override(
            &kitchen,
            date,
            creneau::SegmentKind::Open,
            t(9, 0),
            t(17, 0),
            None,
        )
        .unwrap();
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();

    engine
        .create_reservation(
            &kitchen,
            &ChefId::new("chef-ana"),
            date,
            t(10, 0),
            t(11, 0),
            None,
            ReservationStatus::Pending,
            now,
        )
        .unwrap();

    // pré-vérification côté moteur
    let err = engine
        .create_reservation(
            &kitchen,
            &ChefId::new("chef-bo"),
            date,
            t(10, 30),
            t(11, 30),
            None,
            ReservationStatus::Confirmed,
            now,
        )
        .unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));

    // filet du registre : une écriture directe qui saute la pré-vérification
    // est refusée par la contrainte d'exclusion
    let sneaky = Reservation::new(
        kitchen.clone(),
        ChefId::new("chef-cy"),
        date,
        t(10, 30),
        t(11, 30),
        ReservationStatus::Confirmed,
    )
    .unwrap();
    let offenders = engine.registry_mut().commit_reservation(sneaky).unwrap_err();
    assert_eq!(offenders.len(), 1);
    assert_eq!(engine.registry().reservations.len(), 1);
}

#[test]
fn back_to_back_reservations_do_not_conflict() {
    let mut engine = Engine::new();
    let kitchen = engine.add_kitchen("Cuisine Centrale", None);
    let date = d(2026, 1, 8);
    engine
        .upsert_override(
            &kitchen,
            date,
            creneau::SegmentKind::Open,
            t(9, 0),
            t(17, 0),
            None,
        )
        .unwrap();
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();

    // [10, 11) puis [11, 12) : bornes demi-ouvertes, pas de chevauchement
    for (s, e) in [(t(10, 0), t(11, 0)), (t(11, 0), t(12, 0))] {
        engine
            .create_reservation(
                &kitchen,
                &ChefId::new("chef-ana"),
                date,
                s,
                e,
                None,
                ReservationStatus::Confirmed,
                now,
            )
            .unwrap();
    }
}

#[test]
fn cancelled_is_terminal() {
    let mut engine = Engine::new();
    let kitchen = engine.add_kitchen("Cuisine Centrale", None);
    let date = d(2026, 1, 8);
    engine
        .upsert_override(
            &kitchen,
            date,
            creneau::SegmentKind::Open,
            t(9, 0),
            t(17, 0),
            None,
        )
        .unwrap();
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();

    let id = engine
        .create_reservation(
            &kitchen,
            &ChefId::new("chef-ana"),
            date,
            t(10, 0),
            t(11, 0),
            None,
            ReservationStatus::Pending,
            now,
        )
        .unwrap();

    engine.confirm_reservation(&id).unwrap();
    engine.cancel_reservation(&id).unwrap();

    assert!(matches!(
        engine.confirm_reservation(&id),
        Err(BookingError::StatusInvalid(_))
    ));
    assert!(matches!(
        engine.cancel_reservation(&id),
        Err(BookingError::StatusInvalid(_))
    ));
}

#[test]
fn invalid_ranges_and_statuses_are_rejected_up_front() {
    let mut engine = Engine::new();
    let kitchen = engine.add_kitchen("Cuisine Centrale", None);
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    let date = d(2026, 1, 8);

    let err = engine
        .create_reservation(
            &kitchen,
            &ChefId::new("chef-ana"),
            date,
            t(11, 0),
            t(10, 0),
            None,
            ReservationStatus::Pending,
            now,
        )
        .unwrap_err();
    assert!(matches!(err, BookingError::InvalidTimeRange));

    let err = engine
        .create_reservation(
            &kitchen,
            &ChefId::new("chef-ana"),
            date,
            t(10, 0),
            t(11, 0),
            None,
            ReservationStatus::Cancelled,
            now,
        )
        .unwrap_err();
    assert!(matches!(err, BookingError::StatusInvalid(_)));
    assert!(engine.registry().reservations.is_empty());
}

#[test]
fn engine_classify_uses_reservation_kitchen_zone() {
    let mut engine = Engine::new();
    let kitchen = engine.add_kitchen("Terre-Neuve", Some(ST_JOHNS.to_string()));
    let date = d(2026, 1, 5);
    engine
        .upsert_override(
            &kitchen,
            date,
            creneau::SegmentKind::Open,
            t(6, 0),
            t(22, 0),
            None,
        )
        .unwrap();
    let created_at = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    let id = engine
        .create_reservation(
            &kitchen,
            &ChefId::new("chef-ana"),
            date,
            t(9, 0),
            t(10, 0),
            None,
            ReservationStatus::Confirmed,
            created_at,
        )
        .unwrap();

    let noon_utc = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap(); // 08:30 locale
    assert_eq!(engine.classify(&id, noon_utc).unwrap(), TemporalState::Upcoming);

    let later = Utc.with_ymd_and_hms(2026, 1, 5, 13, 0, 0).unwrap(); // 09:30 locale
    assert_eq!(engine.classify(&id, later).unwrap(), TemporalState::Active);

    let evening = Utc.with_ymd_and_hms(2026, 1, 5, 14, 0, 0).unwrap(); // 10:30 locale
    assert_eq!(engine.classify(&id, evening).unwrap(), TemporalState::Past);
}
