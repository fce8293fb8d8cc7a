use crate::engine::{BookingError, Engine, Window};
use crate::model::{weekday_of, KitchenId};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Gabarit d'horaires hebdomadaires réutilisable entre cuisines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub days: Vec<DayHours>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl WeekTemplate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            bail!("template id cannot be empty");
        }
        if self.name.trim().is_empty() {
            bail!("template name cannot be empty");
        }
        if self.days.is_empty() {
            bail!("template must define at least one day");
        }
        for day in &self.days {
            day.validate()?;
        }
        for (i, a) in self.days.iter().enumerate() {
            if self.days.iter().skip(i + 1).any(|b| b.weekday == a.weekday) {
                bail!("template defines weekday {} twice", a.weekday);
            }
        }
        Ok(())
    }

    fn day(&self, weekday: u8) -> Option<&DayHours> {
        self.days.iter().find(|d| d.weekday == weekday)
    }
}

/// Horaires d'un jour de semaine (0 = dimanche … 6 = samedi).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayHours {
    pub weekday: u8,
    pub is_open: bool,
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl DayHours {
    fn validate(&self) -> Result<()> {
        if self.weekday > 6 {
            bail!("weekday must be in 0..=6 (0 = Sunday)");
        }
        if self.is_open && self.close <= self.open {
            bail!("close must be strictly after open");
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TemplateInfo {
    pub template: WeekTemplate,
    pub path: PathBuf,
    pub modified: Option<DateTime<Utc>>,
}

/// Gestion simple des gabarits persistés sur disque.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    base_dir: PathBuf,
}

impl TemplateStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            base_dir: dir.as_ref().to_path_buf(),
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("creating template directory {}", self.base_dir.display()))
    }

    pub fn save(&self, template: &WeekTemplate) -> Result<PathBuf> {
        template.validate()?;
        self.ensure_dir()?;
        let path = self.base_dir.join(format!("{}.json", template.id));
        let json = serde_json::to_string_pretty(template)?;
        fs::write(&path, json).with_context(|| format!("writing template {}", path.display()))?;
        Ok(path)
    }

    pub fn load(&self, id: &str) -> Result<WeekTemplate> {
        let path = self.base_dir.join(format!("{id}.json"));
        let data =
            fs::read(&path).with_context(|| format!("reading template {}", path.display()))?;
        let template: WeekTemplate = serde_json::from_slice(&data)
            .with_context(|| format!("parsing template {}", path.display()))?;
        template.validate()?;
        Ok(template)
    }

    pub fn list(&self) -> Result<Vec<TemplateInfo>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }
        let mut infos = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let data = fs::read(&path)?;
            let template: WeekTemplate = match serde_json::from_slice(&data) {
                Ok(t) => t,
                Err(err) => {
                    eprintln!(
                        "Warning: could not parse template {}: {err}",
                        path.display()
                    );
                    continue;
                }
            };
            let modified = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .ok()
                .map(DateTime::<Utc>::from);
            infos.push(TemplateInfo {
                template,
                path,
                modified,
            });
        }
        infos.sort_by(|a, b| a.template.id.cmp(&b.template.id));
        Ok(infos)
    }
}

/// Applique un gabarit aux règles hebdomadaires d'une cuisine, tout ou
/// rien : chaque jour est d'abord joué sur une copie du registre pour
/// passer la garde de conflit, puis l'ensemble est posé sur le vrai.
pub fn apply_template(
    engine: &mut Engine,
    kitchen: &KitchenId,
    template: &WeekTemplate,
    from_date: NaiveDate,
) -> Result<(), BookingError> {
    template
        .validate()
        .map_err(|_| BookingError::Validation("template failed validation"))?;

    let mut scratch = Engine::from_registry(engine.registry().clone());
    for day in &template.days {
        scratch.set_weekly_rule(
            kitchen,
            day.weekday,
            day.is_open,
            day.open,
            day.close,
            from_date,
        )?;
    }
    for day in &template.days {
        engine.set_weekly_rule(
            kitchen,
            day.weekday,
            day.is_open,
            day.open,
            day.close,
            from_date,
        )?;
    }
    Ok(())
}

/// Prévisualise les fenêtres ouvertes d'un gabarit sur une plage de dates
/// (sans exceptions datées : gabarit seul).
pub fn preview_windows(
    template: &WeekTemplate,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<(NaiveDate, Vec<Window>)>> {
    if end < start {
        bail!("end date must be after start date");
    }
    template.validate()?;

    let mut out = Vec::new();
    let mut current = start;
    while current <= end {
        let windows = match template.day(weekday_of(current)) {
            Some(day) if day.is_open => vec![(day.open, day.close)],
            _ => Vec::new(),
        };
        out.push((current, windows));
        current = current.succ_opt().context("date overflow")?;
    }
    Ok(out)
}

pub fn export_template_json<P: AsRef<Path>>(path: P, template: &WeekTemplate) -> Result<()> {
    let json = serde_json::to_string_pretty(template)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_template_from_file<P: AsRef<Path>>(path: P) -> Result<WeekTemplate> {
    let data = fs::read(&path)?;
    let template: WeekTemplate = serde_json::from_slice(&data)?;
    template.validate()?;
    Ok(template)
}
