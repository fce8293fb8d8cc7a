#![forbid(unsafe_code)]
use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use creneau::{
    io,
    model::{ChefId, OverrideId, ReservationId, ReservationStatus, SegmentKind},
    notification::{prepare_notice, TextNotice},
    storage::{JsonStorage, Storage},
    template::{apply_template, load_template_from_file},
    BookingError, Engine, SlotOptions,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de réservation de cuisines (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du registre
    #[arg(long, global = true, default_value = "registry.json")]
    registry: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Déclarer une cuisine
    AddKitchen {
        #[arg(long)]
        name: String,
        /// Fuseau IANA du lieu (ex. "America/St_Johns") ; UTC sinon
        #[arg(long)]
        timezone: Option<String>,
    },

    /// Poser les horaires hebdomadaires d'un jour
    SetHours {
        #[arg(long)]
        kitchen: String,
        /// 0 = dimanche … 6 = samedi
        #[arg(long)]
        weekday: u8,
        /// Jour fermé (open/close ignorés)
        #[arg(long, default_value_t = false)]
        closed: bool,
        /// HH:MM
        #[arg(long, default_value = "09:00")]
        open: String,
        /// HH:MM
        #[arg(long, default_value = "17:00")]
        close: String,
        /// Garde de conflit à partir de cette date (YYYY-MM-DD)
        #[arg(long)]
        from: String,
    },

    /// Appliquer un gabarit hebdomadaire depuis un fichier JSON
    ApplyTemplate {
        #[arg(long)]
        kitchen: String,
        #[arg(long)]
        template: String,
        /// Garde de conflit à partir de cette date (YYYY-MM-DD)
        #[arg(long)]
        from: String,
    },

    /// Lister les créneaux réservables d'une journée
    Slots {
        #[arg(long)]
        kitchen: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Pas des créneaux en minutes (>= 1)
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
        granularity: u32,
        /// Export CSV des créneaux (optionnel)
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Poser une base ouverte datée (remplace le gabarit hebdomadaire ce jour-là)
    OverrideOpen {
        #[arg(long)]
        kitchen: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM
        #[arg(long)]
        start: String,
        /// HH:MM
        #[arg(long)]
        end: String,
        #[arg(long)]
        reason: Option<String>,
    },

    /// Poser une découpe fermée datée
    OverrideBlock {
        #[arg(long)]
        kitchen: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM
        #[arg(long)]
        start: String,
        /// HH:MM
        #[arg(long)]
        end: String,
        #[arg(long)]
        reason: Option<String>,
    },

    /// Supprimer une exception datée
    DeleteOverride {
        #[arg(long)]
        id: String,
    },

    /// Réserver une cuisine
    Reserve {
        #[arg(long)]
        kitchen: String,
        #[arg(long)]
        chef: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM
        #[arg(long)]
        start: String,
        /// HH:MM
        #[arg(long)]
        end: String,
        #[arg(long)]
        notes: Option<String>,
        /// Statut initial confirmé (politique du canal de création)
        #[arg(long, default_value_t = false)]
        confirmed: bool,
    },

    /// Confirmer une réservation
    Confirm {
        #[arg(long)]
        id: String,
    },

    /// Annuler une réservation
    Cancel {
        #[arg(long)]
        id: String,
    },

    /// Importer des réservations depuis un CSV
    ImportReservations {
        #[arg(long)]
        csv: String,
    },

    /// Lister les réservations et optionnellement exporter
    List {
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Classer une réservation : past / active / upcoming
    Classify {
        #[arg(long)]
        id: String,
    },

    /// Générer un rappel texte pour la prochaine réservation d'un chef
    Notify {
        #[arg(long)]
        chef: String,
        /// Fichier de sortie (texte brut)
        #[arg(long)]
        out: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.registry)?;
    let mut engine = match storage.load() {
        Ok(r) => Engine::from_registry(r),
        Err(_) => Engine::new(),
    };

    // Les deux sous-commandes d'exception partagent le même bras ci-dessous.
    let override_kind = if matches!(cli.cmd, Commands::OverrideBlock { .. }) {
        SegmentKind::Block
    } else {
        SegmentKind::Open
    };

    let code = match cli.cmd {
        Commands::AddKitchen { name, timezone } => {
            let id = engine.add_kitchen(&name, timezone);
            storage.save(engine.registry())?;
            println!("{}", id.as_str());
            0
        }
        Commands::SetHours {
            kitchen,
            weekday,
            closed,
            open,
            close,
            from,
        } => {
            let kitchen = io::resolve_kitchen(engine.registry(), &kitchen)?;
            let open = io::parse_time(&open)?;
            let close = io::parse_time(&close)?;
            let from = io::parse_date(&from)?;
            match engine.set_weekly_rule(&kitchen, weekday, !closed, open, close, from) {
                Ok(()) => {
                    storage.save(engine.registry())?;
                    0
                }
                Err(err) => report(err)?,
            }
        }
        Commands::ApplyTemplate {
            kitchen,
            template,
            from,
        } => {
            let kitchen = io::resolve_kitchen(engine.registry(), &kitchen)?;
            let template = load_template_from_file(&template)?;
            let from = io::parse_date(&from)?;
            match apply_template(&mut engine, &kitchen, &template, from) {
                Ok(()) => {
                    storage.save(engine.registry())?;
                    0
                }
                Err(err) => report(err)?,
            }
        }
        Commands::Slots {
            kitchen,
            date,
            granularity,
            out_csv,
        } => {
            let kitchen = io::resolve_kitchen(engine.registry(), &kitchen)?;
            let date = io::parse_date(&date)?;
            let opts = SlotOptions {
                granularity_minutes: granularity,
            };
            let slots = engine.available_slots(&kitchen, date, opts)?;
            if let Some(path) = out_csv {
                io::export_slots_csv(path, date, &slots, granularity)?;
            }
            for slot in &slots {
                println!("{}", slot.format("%H:%M"));
            }
            0
        }
        Commands::OverrideOpen {
            kitchen,
            date,
            start,
            end,
            reason,
        }
        | Commands::OverrideBlock {
            kitchen,
            date,
            start,
            end,
            reason,
        } => {
            let kitchen = io::resolve_kitchen(engine.registry(), &kitchen)?;
            let date = io::parse_date(&date)?;
            let start = io::parse_time(&start)?;
            let end = io::parse_time(&end)?;
            match engine.upsert_override(&kitchen, date, override_kind, start, end, reason) {
                Ok(outcome) => {
                    storage.save(engine.registry())?;
                    println!("{}", outcome.id().as_str());
                    0
                }
                Err(err) => report(err)?,
            }
        }
        Commands::DeleteOverride { id } => {
            match engine.delete_override(&OverrideId::new(id)) {
                Ok(_) => {
                    storage.save(engine.registry())?;
                    0
                }
                Err(err) => report(err)?,
            }
        }
        Commands::Reserve {
            kitchen,
            chef,
            date,
            start,
            end,
            notes,
            confirmed,
        } => {
            let kitchen = io::resolve_kitchen(engine.registry(), &kitchen)?;
            let date = io::parse_date(&date)?;
            let start = io::parse_time(&start)?;
            let end = io::parse_time(&end)?;
            let status = if confirmed {
                ReservationStatus::Confirmed
            } else {
                ReservationStatus::Pending
            };
            match engine.create_reservation(
                &kitchen,
                &ChefId::new(chef),
                date,
                start,
                end,
                notes,
                status,
                Utc::now(),
            ) {
                Ok(id) => {
                    storage.save(engine.registry())?;
                    println!("{}", id.as_str());
                    0
                }
                Err(err) => report(err)?,
            }
        }
        Commands::Confirm { id } => {
            engine.confirm_reservation(&ReservationId::new(id))?;
            storage.save(engine.registry())?;
            0
        }
        Commands::Cancel { id } => {
            engine.cancel_reservation(&ReservationId::new(id))?;
            storage.save(engine.registry())?;
            0
        }
        Commands::ImportReservations { csv } => {
            let reservations = io::import_reservations_csv(csv, engine.registry())?;
            let mut rejected = 0usize;
            for r in reservations {
                if engine.registry_mut().commit_reservation(r).is_err() {
                    rejected += 1;
                }
            }
            storage.save(engine.registry())?;
            if rejected > 0 {
                eprintln!("{rejected} row(s) rejected by the exclusion constraint");
                2
            } else {
                0
            }
        }
        Commands::List { out_json, out_csv } => {
            if let Some(path) = out_json {
                io::export_registry_json(path, engine.registry())?;
            }
            if let Some(path) = out_csv {
                io::export_reservations_csv(path, engine.registry())?;
            }
            // impression compacte
            for r in &engine.registry().reservations {
                let kitchen = engine
                    .registry()
                    .find_kitchen(&r.kitchen)
                    .map(|k| k.name.as_str())
                    .unwrap_or("-");
                println!(
                    "{} | {} | {} {} → {} | {:?} | {}",
                    r.id.as_str(),
                    kitchen,
                    r.date.format("%Y-%m-%d"),
                    r.start.format("%H:%M"),
                    r.end.format("%H:%M"),
                    r.status,
                    r.chef.as_str()
                );
            }
            0
        }
        Commands::Classify { id } => {
            let state = engine.classify(&ReservationId::new(id), Utc::now())?;
            println!("{state:?}");
            0
        }
        Commands::Notify { chef, out } => {
            let renderer = TextNotice;
            let notice = prepare_notice(engine.registry(), &ChefId::new(chef), Utc::now(), &renderer)?;
            std::fs::write(&out, notice.content)?;
            println!(
                "Notice generated for {} (reservation {}), starts in {} h",
                notice.chef.as_str(),
                notice.reservation.as_str(),
                notice.starts_in.num_hours()
            );
            0
        }
    };

    std::process::exit(code);
}

/// Conflits : détail ligne par ligne et code retour 2 ; le reste remonte.
fn report(err: BookingError) -> Result<i32> {
    match err {
        BookingError::Conflict(entries) => {
            eprintln!("Conflict with {} active reservation(s):", entries.len());
            for e in &entries {
                eprintln!(
                    "  {} | chef {} | {} {} → {}",
                    e.reservation.as_str(),
                    e.chef.as_str(),
                    e.date.format("%Y-%m-%d"),
                    e.start.format("%H:%M"),
                    e.end.format("%H:%M")
                );
            }
            // Code 2 = refus de mutation pour cause de conflit
            Ok(2)
        }
        other => Err(other.into()),
    }
}
