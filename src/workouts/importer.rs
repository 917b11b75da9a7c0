//! Workout history import pipeline.
//!
//! Text goes through [`parse_csv`], then [`OutlierCorrector`], then
//! [`WorkoutAssembler`]. Workouts come back unsaved; persisting them and
//! running record detection is up to the caller.

use std::io::ErrorKind;
use std::path::Path;

use crate::exercises::resolver::ExerciseResolver;
use crate::storage::config::ImportSettings;
use crate::storage::repository::ExerciseStore;
use crate::workouts::assembler::WorkoutAssembler;
use crate::workouts::outliers::OutlierCorrector;
use crate::workouts::parser_csv::parse_csv;
use crate::workouts::types::{ImportError, ImportOutcome, ImportReport};

/// Runs a complete import.
#[derive(Debug, Clone, Default)]
pub struct HistoryImporter {
    settings: ImportSettings,
}

impl HistoryImporter {
    pub fn new(settings: ImportSettings) -> Self {
        Self { settings }
    }

    /// Import an export held in memory.
    pub fn import_str<S: ExerciseStore + ?Sized>(
        &self,
        content: &str,
        resolver: &mut ExerciseResolver<'_, S>,
    ) -> Result<ImportOutcome, ImportError> {
        let parsed = parse_csv(content)?;
        let mut report = ImportReport {
            total_rows: parsed.total_rows,
            skipped_rows: parsed.skipped_rows(),
            warnings: parsed.warnings,
            ..Default::default()
        };

        let corrected = OutlierCorrector::new(self.settings.outliers.clone()).correct(&parsed.rows);
        report.corrected_weights = corrected.count();

        let created_before = resolver.created().len();
        let assembled = WorkoutAssembler::new(self.settings.date_locales.clone())
            .assemble(&corrected.rows, resolver)?;

        report.dropped_sets = assembled.dropped_sets;
        report.warnings.extend(assembled.warnings);
        report.created_exercises = resolver.created()[created_before..].to_vec();

        tracing::info!(
            "Imported {} workouts from {} rows ({} skipped, {} weights corrected, {} sets dropped)",
            assembled.workouts.len(),
            report.total_rows,
            report.skipped_rows,
            report.corrected_weights,
            report.dropped_sets
        );

        Ok(ImportOutcome {
            workouts: assembled.workouts,
            report,
        })
    }

    /// Import an export from disk.
    pub fn import_file<S: ExerciseStore + ?Sized>(
        &self,
        path: &Path,
        resolver: &mut ExerciseResolver<'_, S>,
    ) -> Result<ImportOutcome, ImportError> {
        let metadata = std::fs::metadata(path).map_err(|e| io_error(e, path))?;

        let size_mb = metadata.len() as f64 / (1024.0 * 1024.0);
        if size_mb > self.settings.max_file_size_mb {
            return Err(ImportError::TooLarge {
                size_mb,
                max_mb: self.settings.max_file_size_mb,
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| io_error(e, path))?;
        tracing::info!("Importing workout history from {}", path.display());

        self.import_str(&content, resolver)
    }
}

fn io_error(e: std::io::Error, path: &Path) -> ImportError {
    match e.kind() {
        ErrorKind::NotFound => ImportError::FileNotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => ImportError::AccessDenied(path.to_path_buf()),
        _ => ImportError::IoError(e.to_string()),
    }
}
