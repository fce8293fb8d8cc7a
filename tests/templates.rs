#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use creneau::{
    apply_template, preview_windows, BookingError, ChefId, DayHours, Engine, ReservationStatus,
    SlotOptions, TemplateStore, WeekTemplate,
};
use tempfile::tempdir;

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn weekday_hours() -> WeekTemplate {
    WeekTemplate {
        id: "semaine-9-17".into(),
        name: "Semaine 09:00–17:00".into(),
        description: Some("Ouvert lundi–vendredi".into()),
        days: (1..=5)
            .map(|weekday| DayHours {
                weekday,
                is_open: true,
                open: t(9, 0),
                close: t(17, 0),
            })
            .collect(),
        metadata: None,
    }
}

#[test]
fn save_and_load_template_roundtrip() {
    let dir = tempdir().unwrap();
    let store = TemplateStore::new(dir.path());
    let template = weekday_hours();
    store.save(&template).unwrap();

    let loaded = store.load(&template.id).unwrap();
    assert_eq!(loaded.id, template.id);
    assert_eq!(loaded.days.len(), template.days.len());

    let infos = store.list().unwrap();
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].template.id, template.id);
}

#[test]
fn template_validation_rejects_duplicates_and_bad_hours() {
    let mut template = weekday_hours();
    template.days.push(DayHours {
        weekday: 1,
        is_open: true,
        open: t(8, 0),
        close: t(12, 0),
    });
    assert!(template.validate().is_err());

    let mut template = weekday_hours();
    template.days[0].close = t(8, 0);
    assert!(template.validate().is_err());

    let mut template = weekday_hours();
    template.days[0].weekday = 9;
    assert!(template.validate().is_err());
}

#[test]
fn preview_resolves_each_date_through_the_template() {
    let template = weekday_hours();
    // vendredi 2026-01-09 → lundi 2026-01-12
    let days = preview_windows(&template, d(2026, 1, 9), d(2026, 1, 12)).unwrap();
    assert_eq!(days.len(), 4);

    let (friday, windows) = &days[0];
    assert_eq!(*friday, d(2026, 1, 9));
    assert_eq!(windows, &vec![(t(9, 0), t(17, 0))]);

    // samedi et dimanche absents du gabarit : fermés
    assert!(days[1].1.is_empty());
    assert!(days[2].1.is_empty());
    assert_eq!(days[3].1, vec![(t(9, 0), t(17, 0))]);
}

#[test]
fn apply_template_sets_weekly_rules() {
    let mut engine = Engine::new();
    let kitchen = engine.add_kitchen("Cuisine Centrale", None);
    apply_template(&mut engine, &kitchen, &weekday_hours(), d(2026, 1, 1)).unwrap();

    assert_eq!(engine.registry().weekly_rules.len(), 5);
    let slots = engine
        .available_slots(&kitchen, d(2026, 1, 5), SlotOptions::default())
        .unwrap();
    assert_eq!(slots.len(), 16);
}

#[test]
fn apply_template_is_all_or_nothing_under_conflict() {
    let mut engine = Engine::new();
    let kitchen = engine.add_kitchen("Cuisine Centrale", None);
    apply_template(&mut engine, &kitchen, &weekday_hours(), d(2026, 1, 1)).unwrap();
    engine
        .create_reservation(
            &kitchen,
            &ChefId::new("chef-ana"),
            d(2026, 1, 6), // mardi
            t(9, 0),
            t(10, 0),
            None,
            ReservationStatus::Confirmed,
            Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap(),
        )
        .unwrap();

    // gabarit démarrant à 10:00 : orpheline la réservation du mardi
    let mut late = weekday_hours();
    for day in &mut late.days {
        day.open = t(10, 0);
    }
    let err = apply_template(&mut engine, &kitchen, &late, d(2026, 1, 1)).unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));

    // aucune règle n'a bougé, pas même celles d'autres jours
    for rule in &engine.registry().weekly_rules {
        assert_eq!(rule.open, t(9, 0));
    }
}
