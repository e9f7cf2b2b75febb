//! Terminal front-end for FitLog trackers.
//!
//! # Responsibility
//! - Drive the same core use-cases the mobile UI uses, against a local file.
//! - Keep confirmation of destructive commands on this side of the core.

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use fitlog_core::db::open_db;
use fitlog_core::{
    init_logging, ChartConfig, KvTrackerRepository, ObservationDate, SqliteKeyValueStore,
    TrackerDefinition, TrackerId, TrackerLog, TrackerService,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fitlog")]
#[command(about = "Record custom fitness metrics and inspect their progress")]
#[command(version)]
struct Cli {
    /// SQLite file holding tracker data
    #[arg(long, global = true, env = "FITLOG_DB_PATH", default_value = "fitlog.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "FITLOG_LOG_DIR")]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new tracker
    Create {
        name: String,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        goal: Option<f64>,
    },
    /// List registered trackers
    List,
    /// Record a value; the date defaults to today
    Record {
        tracker: String,
        value: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove the value recorded for one day
    Delete { tracker: String, date: String },
    /// Delete a tracker and all of its values
    Remove {
        tracker: String,
        /// Required: the deletion cannot be undone
        #[arg(long)]
        yes: bool,
    },
    /// Print chart series, labels and axis range
    Chart {
        tracker: String,
        #[arg(long)]
        max_labels: Option<u32>,
        #[arg(long)]
        segments: Option<u32>,
        /// Emit the chart payload as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show first/latest value, change and distance to goal
    Summary { tracker: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        init_logging(&cli.log_level, log_dir).context("failed to initialize logging")?;
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let store = SqliteKeyValueStore::try_new(&conn)?;

    let config = match &cli.command {
        Command::Chart {
            max_labels,
            segments,
            ..
        } => ChartConfig::from_overrides(*max_labels, *segments),
        _ => ChartConfig::default(),
    };
    let service = TrackerService::with_chart_config(KvTrackerRepository::new(store), config);
    run(&service, cli.command)
}

fn run(
    service: &TrackerService<KvTrackerRepository<SqliteKeyValueStore<'_>>>,
    command: Command,
) -> Result<()> {
    match command {
        Command::Create { name, unit, goal } => {
            let created = service.create_tracker(&TrackerDefinition { name, unit, goal })?;
            println!("created {}", created.name);
        }
        Command::List => {
            let trackers = service.list_trackers();
            if trackers.is_empty() {
                println!("no trackers");
            }
            for tracker in trackers {
                println!(
                    "{}\tunit={}\tgoal={}",
                    tracker.name,
                    tracker.unit.as_deref().unwrap_or("-"),
                    tracker
                        .goal
                        .map_or_else(|| "-".to_string(), |goal| goal.to_string())
                );
            }
        }
        Command::Record {
            tracker,
            value,
            date,
        } => {
            let date = match date {
                Some(raw) => ObservationDate::parse(&raw)?,
                None => ObservationDate::from_naive(Local::now().date_naive()),
            };
            let log = service.record_observation(&TrackerId::from_name(&tracker)?, date, &value)?;
            print_log(&log);
        }
        Command::Delete { tracker, date } => {
            let log = service.delete_observation(
                &TrackerId::from_name(&tracker)?,
                ObservationDate::parse(&date)?,
            )?;
            print_log(&log);
        }
        Command::Remove { tracker, yes } => {
            if !yes {
                bail!("refusing to delete `{tracker}` without --yes");
            }
            service.delete_tracker(&tracker)?;
            println!("deleted {tracker}");
        }
        Command::Summary { tracker } => {
            let summary = service.summarize(&tracker)?;
            match (summary.first, summary.latest) {
                (Some(first), Some(latest)) => {
                    println!("first {} {}", first.date, first.value);
                    println!("latest {} {}", latest.date, latest.value);
                }
                _ => println!("no values yet"),
            }
            if let Some(change) = summary.change {
                println!("change {change:+}");
            }
            if let Some(remaining) = summary.goal_remaining {
                println!("to goal {remaining:+}");
            }
        }
        Command::Chart { tracker, json, .. } => {
            let chart = service.chart_data(&TrackerId::from_name(&tracker)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&chart)?);
                return Ok(());
            }
            println!(
                "axis min={} max={} step={} segments={}",
                chart.axis.min, chart.axis.max, chart.axis.step, chart.axis.segments
            );
            for (point, label) in chart.series.iter().zip(&chart.labels) {
                println!("{:>5}  {}  {}", label, point.date, point.value);
            }
        }
    }
    Ok(())
}

fn print_log(log: &TrackerLog) {
    for (date, value) in log.iter() {
        println!("{date}  {value}");
    }
}
