//! LiftLog - Strength Training History
//!
//! Command-line entry point.
//!
//! ```bash
//! # Import a workout-log export and detect new records
//! liftlog import workouts.csv
//!
//! # Export stored strength workouts
//! liftlog export backup.csv
//!
//! # List current personal records
//! liftlog records
//!
//! # Rebuild all records from stored workouts
//! liftlog recalculate
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use liftlog::exercises::ExerciseResolver;
use liftlog::records::PrDetector;
use liftlog::storage::config::{self, AppConfig};
use liftlog::storage::{Database, WorkoutStore};
use liftlog::workouts::{export_csv_to_file, generate_csv_filename, HistoryImporter};

#[derive(Parser)]
#[command(name = "liftlog", version, about = "Strength training history and personal records")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database file override
    #[arg(long, global = true, env = "LIFTLOG_DATABASE")]
    database: Option<PathBuf>,

    /// Configuration file override
    #[arg(long, global = true, env = "LIFTLOG_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Import a workout-log CSV export
    Import {
        /// File to import
        file: PathBuf,
    },

    /// Export strength workouts to CSV
    Export {
        /// Output file (defaults to a timestamped name in the current directory)
        file: Option<PathBuf>,
    },

    /// List current personal records
    Records,

    /// Rebuild personal records from all stored workouts
    Recalculate,

    /// Show the effective configuration
    Config {
        /// Write it to the configuration file
        #[arg(long)]
        write: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::get_config_path);
    let app_config = config::load_config_from(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Command::Config { write } = cli.command {
        return show_config(&app_config, &config_path, write);
    }

    let db_path = cli.database.clone().unwrap_or_else(|| app_config.database_path());
    let db = Database::open(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    tracing::debug!("Using database {}", db_path.display());

    match cli.command {
        Command::Import { file } => import(&db, &app_config, &file),
        Command::Export { file } => export(&db, file),
        Command::Records => records(&db, &app_config),
        Command::Recalculate => recalculate(&db, &app_config),
        Command::Config { .. } => Ok(()),
    }
}

fn import(db: &Database, app_config: &AppConfig, file: &Path) -> anyhow::Result<()> {
    let mut resolver = ExerciseResolver::load(db).context("Failed to load exercise catalog")?;
    let importer = HistoryImporter::new(app_config.import.clone());

    let mut outcome = importer
        .import_file(file, &mut resolver)
        .with_context(|| format!("Failed to import {}", file.display()))?;
    outcome.workouts.sort_by_key(|w| w.started_at);

    let detector = PrDetector::new(db, app_config.records.clone());
    let mut new_records = 0;
    for workout in &outcome.workouts {
        db.save_workout(workout)
            .with_context(|| format!("Failed to save workout '{}'", workout.title))?;
        new_records += detector.detect(workout)?.len();
    }

    let report = &outcome.report;
    println!(
        "Imported {} workouts ({} rows, {} skipped, {} weights corrected, {} sets dropped)",
        outcome.workouts.len(),
        report.total_rows,
        report.skipped_rows,
        report.corrected_weights,
        report.dropped_sets
    );
    if !report.created_exercises.is_empty() {
        println!("New exercises: {}", report.created_exercises.join(", "));
    }
    for warning in &report.warnings {
        println!("  warning: {}", warning);
    }
    println!("{} new personal records", new_records);

    Ok(())
}

fn export(db: &Database, file: Option<PathBuf>) -> anyhow::Result<()> {
    let workouts = db.fetch_all_workouts()?;
    let path = file.unwrap_or_else(|| PathBuf::from(generate_csv_filename(chrono::Utc::now())));

    export_csv_to_file(&workouts, &path)
        .with_context(|| format!("Failed to export to {}", path.display()))?;
    println!("Exported {} workouts to {}", workouts.len(), path.display());

    Ok(())
}

fn records(db: &Database, app_config: &AppConfig) -> anyhow::Result<()> {
    let detector = PrDetector::new(db, app_config.records.clone());
    let records = detector.current_records()?;

    if records.is_empty() {
        println!("No personal records yet");
    }
    for record in records {
        println!(
            "{:<32} {:>7.1} kg  ({} kg x {}, {})",
            record.exercise_name,
            record.estimated_one_rep_max,
            record.weight_kg,
            record.reps,
            record.achieved_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}

fn recalculate(db: &Database, app_config: &AppConfig) -> anyhow::Result<()> {
    let workouts = db.fetch_all_workouts()?;
    let detector = PrDetector::new(db, app_config.records.clone());

    let records = detector
        .recalculate_all(&workouts)
        .context("Failed to recalculate personal records")?;
    println!(
        "Recalculated {} records from {} workouts",
        records.len(),
        workouts.len()
    );

    Ok(())
}

fn show_config(app_config: &AppConfig, path: &Path, write: bool) -> anyhow::Result<()> {
    println!("{}", toml::to_string_pretty(app_config)?);

    if write {
        config::save_config_to(app_config, path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
