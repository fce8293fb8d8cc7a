use chrono::NaiveTime;

/// Test de chevauchement demi-ouvert [start, end).
pub(super) fn overlaps(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// [start, end) entièrement contenu dans la fenêtre.
pub(super) fn window_contains(
    window: (NaiveTime, NaiveTime),
    start: NaiveTime,
    end: NaiveTime,
) -> bool {
    window.0 <= start && end <= window.1
}

/// Minutes écoulées depuis minuit.
pub(super) fn minutes_of(t: NaiveTime) -> u32 {
    use chrono::Timelike;
    t.num_seconds_from_midnight() / 60
}

pub(super) fn time_at_minutes(m: u32) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(m * 60, 0).unwrap_or(NaiveTime::MIN)
}
