use crate::model::{weekday_of, KitchenId, OverrideSegment, Registry, SegmentKind};
use chrono::{NaiveDate, NaiveTime};

/// Fenêtre ouverte [start, end) en heure locale.
pub type Window = (NaiveTime, NaiveTime);

/// Fenêtres utilisables d'une journée : exceptions datées si elles existent
/// (elles remplacent intégralement le gabarit), sinon règle hebdomadaire.
pub(super) fn day_windows(registry: &Registry, kitchen: &KitchenId, date: NaiveDate) -> Vec<Window> {
    let segments: Vec<&OverrideSegment> = registry.overrides_for(kitchen, date).collect();
    if !segments.is_empty() {
        return windows_from_segments(segments.into_iter());
    }
    weekly_windows(registry, kitchen, date)
}

/// Règle hebdomadaire seule : fermé → rien, ouvert → une fenêtre.
pub(super) fn weekly_windows(
    registry: &Registry,
    kitchen: &KitchenId,
    date: NaiveDate,
) -> Vec<Window> {
    match registry.weekly_rule(kitchen, weekday_of(date)) {
        Some(rule) if rule.is_open => vec![(rule.open, rule.close)],
        _ => Vec::new(),
    }
}

/// Algèbre d'intervalles sur un jeu d'exceptions : union des bases `Open`
/// puis soustraction des découpes `Block`.
pub(super) fn windows_from_segments<'a, I>(segments: I) -> Vec<Window>
where
    I: Iterator<Item = &'a OverrideSegment>,
{
    let mut opens = Vec::new();
    let mut blocks = Vec::new();
    for seg in segments {
        match seg.kind {
            SegmentKind::Open => opens.push((seg.start, seg.end)),
            SegmentKind::Block => blocks.push((seg.start, seg.end)),
        }
    }
    subtract(union(opens), &blocks)
}

/// Union de segments : tri par début, fusion des chevauchants et adjacents.
/// Des bases dupliquées ou sécantes doivent devenir une seule fenêtre avant
/// toute soustraction.
fn union(mut segments: Vec<Window>) -> Vec<Window> {
    if segments.is_empty() {
        return segments;
    }
    segments.sort();
    let mut merged: Vec<Window> = Vec::with_capacity(segments.len());
    for (start, end) in segments {
        match merged.last_mut() {
            Some(last) if start <= last.1 => {
                if end > last.1 {
                    last.1 = end;
                }
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Soustraction d'intervalles : retire chaque découpe de chaque fenêtre,
/// en conservant les restes non vides.
fn subtract(windows: Vec<Window>, blocks: &[Window]) -> Vec<Window> {
    let mut out = windows;
    for &(b_start, b_end) in blocks {
        let mut next = Vec::with_capacity(out.len() + 1);
        for (w_start, w_end) in out {
            if b_end <= w_start || w_end <= b_start {
                next.push((w_start, w_end));
                continue;
            }
            if w_start < b_start {
                next.push((w_start, b_start));
            }
            if b_end < w_end {
                next.push((b_end, w_end));
            }
        }
        out = next;
    }
    out
}
