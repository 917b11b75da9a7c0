//! CSV export of strength workouts in the import wire format.
//!
//! The output is accepted unchanged by [`crate::workouts::parser_csv`].
//! Cardio sessions are skipped since the format carries no schema for them.

use chrono::{DateTime, Utc};
use std::path::Path;
use thiserror::Error;

use crate::workouts::dates::format_workout_time;
use crate::workouts::types::{format_weight, Workout, WorkoutKind, EXPORT_COLUMNS};

/// Errors from writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing exportable
    #[error("No strength workouts to export")]
    NoData,

    /// Failed to write export data
    #[error("Failed to write data: {0}")]
    WriteFailed(String),
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::WriteFailed(e.to_string())
    }
}

/// Serialize workouts to CSV, newest first, one line per set.
pub fn serialize(workouts: &[Workout]) -> String {
    let mut strength: Vec<&Workout> = workouts
        .iter()
        .filter(|w| w.kind == WorkoutKind::Strength)
        .collect();
    strength.sort_by(|a, b| b.started_at.cmp(&a.started_at));

    let mut lines = vec![EXPORT_COLUMNS.join(",")];

    for workout in strength {
        let start_time = format_workout_time(&workout.started_at);
        let end_time = format_workout_time(&workout.ended_at());
        let description = workout.notes.clone().unwrap_or_default();

        for exercise in &workout.exercises {
            for set in &exercise.sets {
                let fields = [
                    workout.title.clone(),
                    start_time.clone(),
                    end_time.clone(),
                    description.clone(),
                    exercise.exercise.name.clone(),
                    exercise.superset_group.clone().unwrap_or_default(),
                    exercise.notes.clone().unwrap_or_default(),
                    set.index.to_string(),
                    set.set_type.clone().unwrap_or_default(),
                    format_weight(set.weight_kg),
                    set.reps.to_string(),
                    set.distance_km.map_or(String::new(), |v| v.to_string()),
                    set.duration_seconds.map_or(String::new(), |v| v.to_string()),
                    set.rpe.map_or(String::new(), |v| v.to_string()),
                ];
                let escaped: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
                lines.push(escaped.join(","));
            }
        }
    }

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

/// Quote a field containing a comma, quote or line break.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Export workouts to a CSV file.
pub fn export_csv_to_file(workouts: &[Workout], path: &Path) -> Result<(), ExportError> {
    if !workouts.iter().any(|w| w.kind == WorkoutKind::Strength) {
        return Err(ExportError::NoData);
    }

    std::fs::write(path, serialize(workouts))?;
    tracing::info!("Exported {} workouts to {}", workouts.len(), path.display());
    Ok(())
}

/// Default filename for an export made at `now`.
pub fn generate_csv_filename(now: DateTime<Utc>) -> String {
    format!("liftlog_{}.csv", now.format("%Y%m%d_%H%M%S"))
}
