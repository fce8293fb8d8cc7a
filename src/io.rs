use crate::model::{ChefId, KitchenId, Registry, Reservation, ReservationStatus};
use anyhow::{anyhow, bail, Context};
use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Résout une cuisine par id ou par nom.
pub fn resolve_kitchen(registry: &Registry, raw: &str) -> anyhow::Result<KitchenId> {
    let as_id = KitchenId::new(raw);
    if registry.find_kitchen(&as_id).is_some() {
        return Ok(as_id);
    }
    registry
        .find_kitchen_by_name(raw)
        .map(|k| k.id.clone())
        .ok_or_else(|| anyhow!("unknown kitchen: {raw}"))
}

/// Import de réservations depuis CSV :
/// header `kitchen,chef,date,start,end[,status][,notes]`
///
/// La colonne `kitchen` accepte un id ou un nom et se résout contre le
/// registre ; une cuisine inconnue fait échouer l'import.
pub fn import_reservations_csv<P: AsRef<Path>>(
    path: P,
    registry: &Registry,
) -> anyhow::Result<Vec<Reservation>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let kitchen = rec.get(0).context("missing kitchen")?.trim();
        let chef = rec.get(1).context("missing chef")?.trim();
        if kitchen.is_empty() || chef.is_empty() {
            bail!("invalid reservation row (empty kitchen or chef)");
        }
        let kitchen = resolve_kitchen(registry, kitchen)?;
        let date = parse_date(rec.get(2).context("missing date")?.trim())?;
        let start = parse_time(rec.get(3).context("missing start")?.trim())?;
        let end = parse_time(rec.get(4).context("missing end")?.trim())?;
        let status = match rec.get(5).map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_status(raw)
                .with_context(|| format!("invalid status for chef {chef} on {date}"))?,
            None => ReservationStatus::Pending,
        };
        let mut r = Reservation::new(kitchen, ChefId::new(chef), date, start, end, status)
            .map_err(anyhow::Error::msg)?;
        if let Some(notes) = rec.get(6) {
            let notes = notes.trim();
            if !notes.is_empty() {
                r.notes = Some(notes.to_string());
            }
        }
        out.push(r);
    }
    Ok(out)
}

pub fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

pub fn parse_time(raw: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .with_context(|| format!("invalid time: {raw}"))
}

fn parse_status(raw: &str) -> anyhow::Result<ReservationStatus> {
    match raw.to_ascii_lowercase().as_str() {
        "pending" | "p" => Ok(ReservationStatus::Pending),
        "confirmed" | "c" => Ok(ReservationStatus::Confirmed),
        "cancelled" | "canceled" | "x" => Ok(ReservationStatus::Cancelled),
        _ => bail!("expected pending / confirmed / cancelled"),
    }
}

fn status_label(status: ReservationStatus) -> &'static str {
    match status {
        ReservationStatus::Pending => "pending",
        ReservationStatus::Confirmed => "confirmed",
        ReservationStatus::Cancelled => "cancelled",
    }
}

/// Export JSON du registre (jolie mise en forme)
pub fn export_registry_json<P: AsRef<Path>>(path: P, registry: &Registry) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(registry)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des réservations :
/// header `id,kitchen,chef,date,start,end,status`
pub fn export_reservations_csv<P: AsRef<Path>>(path: P, registry: &Registry) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["id", "kitchen", "chef", "date", "start", "end", "status"])?;
    for r in &registry.reservations {
        let kitchen = registry
            .find_kitchen(&r.kitchen)
            .map(|k| k.name.as_str())
            .unwrap_or_else(|| r.kitchen.as_str());
        w.write_record([
            r.id.as_str(),
            kitchen,
            r.chef.as_str(),
            r.date.format("%Y-%m-%d").to_string().as_str(),
            r.start.format("%H:%M").to_string().as_str(),
            r.end.format("%H:%M").to_string().as_str(),
            status_label(r.status),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des créneaux d'une journée : header `date,start,granularity_minutes`
pub fn export_slots_csv<P: AsRef<Path>>(
    path: P,
    date: NaiveDate,
    slots: &[NaiveTime],
    granularity_minutes: u32,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "start", "granularity_minutes"])?;
    let date_s = date.format("%Y-%m-%d").to_string();
    let g = granularity_minutes.to_string();
    for slot in slots {
        w.write_record([
            date_s.as_str(),
            slot.format("%H:%M").to_string().as_str(),
            g.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
