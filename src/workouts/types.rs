//! Workout types, import rows and error enums.
//!
//! A [`Row`] is one data line of a workout-log export. Known columns are
//! held in typed fields and anything else lands in an overflow map so the
//! rest of the pipeline never performs stringly-typed lookups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use crate::exercises::types::ExerciseCatalogEntry;
use crate::storage::DatabaseError;

/// Columns an import file must declare.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "title",
    "start_time",
    "end_time",
    "exercise_title",
    "set_index",
    "weight_kg",
    "reps",
];

/// Full column list of the wire format, in export order.
pub const EXPORT_COLUMNS: [&str; 14] = [
    "title",
    "start_time",
    "end_time",
    "description",
    "exercise_title",
    "superset_id",
    "exercise_notes",
    "set_index",
    "set_type",
    "weight_kg",
    "reps",
    "distance_km",
    "duration_seconds",
    "rpe",
];

/// Parsed header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Column names in file order (trimmed)
    pub columns: Vec<String>,
}

impl Header {
    /// Create a header from column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Number of declared columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the header declares no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Required columns that are not present.
    pub fn missing_required(&self) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .filter(|required| self.index_of(required).is_none())
            .map(|required| required.to_string())
            .collect()
    }
}

/// One parsed data line.
///
/// Values are the raw strings from the file. Typed accessors interpret
/// them; rows are never mutated, corrections produce new rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    /// 1-based physical line number in the source file
    pub line: usize,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
    pub exercise_title: String,
    pub superset_id: String,
    pub exercise_notes: String,
    pub set_index: String,
    pub set_type: String,
    pub weight_kg: String,
    pub reps: String,
    pub distance_km: String,
    pub duration_seconds: String,
    pub rpe: String,
    /// Unrecognized columns, keyed by header name
    pub extra: BTreeMap<String, String>,
}

impl Row {
    /// Build a row from split fields. `fields` must have one entry per header column.
    pub fn from_fields(header: &Header, fields: Vec<String>, line: usize) -> Self {
        let mut row = Row {
            line,
            ..Default::default()
        };

        for (column, value) in header.columns.iter().zip(fields) {
            match column.as_str() {
                "title" => row.title = value,
                "start_time" => row.start_time = value,
                "end_time" => row.end_time = value,
                "description" => row.description = value,
                "exercise_title" => row.exercise_title = value,
                "superset_id" => row.superset_id = value,
                "exercise_notes" => row.exercise_notes = value,
                "set_index" => row.set_index = value,
                "set_type" => row.set_type = value,
                "weight_kg" => row.weight_kg = value,
                "reps" => row.reps = value,
                "distance_km" => row.distance_km = value,
                "duration_seconds" => row.duration_seconds = value,
                "rpe" => row.rpe = value,
                _ => {
                    row.extra.insert(column.clone(), value);
                }
            }
        }

        row
    }

    /// Weight in kilograms. Empty means bodyweight (0); `None` if unparseable.
    pub fn weight(&self) -> Option<f64> {
        let raw = self.weight_kg.trim();
        if raw.is_empty() {
            return Some(0.0);
        }
        raw.parse::<f64>()
            .ok()
            .filter(|w| w.is_finite() && *w >= 0.0)
    }

    /// Repetition count as written, `None` if missing or unparseable.
    pub fn reps(&self) -> Option<i64> {
        let raw = self.reps.trim();
        raw.parse::<i64>().ok().or_else(|| {
            // Some exporters write "5.0"
            raw.parse::<f64>()
                .ok()
                .filter(|r| r.fract() == 0.0 && r.is_finite())
                .map(|r| r as i64)
        })
    }

    /// Set position within its exercise.
    pub fn set_index(&self) -> Option<u32> {
        self.set_index.trim().parse().ok()
    }

    pub fn rpe(&self) -> Option<f32> {
        self.rpe.trim().parse().ok()
    }

    pub fn distance_km(&self) -> Option<f64> {
        self.distance_km.trim().parse().ok()
    }

    pub fn duration_seconds(&self) -> Option<u32> {
        self.duration_seconds.trim().parse().ok()
    }

    /// Workout identity key of the source format.
    pub fn workout_key(&self) -> (String, String) {
        (self.title.clone(), self.start_time.clone())
    }

    /// Copy of this row with a different weight.
    pub fn with_weight(&self, weight_kg: f64) -> Self {
        Self {
            weight_kg: format_weight(weight_kg),
            ..self.clone()
        }
    }
}

/// Render a weight without a trailing `.0` for whole numbers.
pub fn format_weight(weight_kg: f64) -> String {
    if weight_kg.fract() == 0.0 {
        format!("{:.0}", weight_kg)
    } else {
        weight_kg.to_string()
    }
}

/// Kind of training session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutKind {
    /// Resistance training with sets, reps and load
    #[default]
    Strength,
    /// Cardio or conditioning session
    Cardio,
}

impl std::fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkoutKind::Strength => write!(f, "Strength"),
            WorkoutKind::Cardio => write!(f, "Cardio"),
        }
    }
}

/// A single set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    /// Source `set_index`
    pub index: u32,
    /// Repetitions (always positive)
    pub reps: u32,
    /// External load in kilograms, 0 for bodyweight
    pub weight_kg: f64,
    /// Imported sets are always completed
    pub completed: bool,
    pub notes: Option<String>,
    /// e.g. "warmup", "failure"
    pub set_type: Option<String>,
    /// Rate of perceived exertion
    pub rpe: Option<f32>,
    pub distance_km: Option<f64>,
    pub duration_seconds: Option<u32>,
}

impl WorkoutSet {
    /// Create a completed set.
    pub fn new(index: u32, reps: u32, weight_kg: f64) -> Self {
        Self {
            index,
            reps,
            weight_kg,
            completed: true,
            notes: None,
            set_type: None,
            rpe: None,
            distance_km: None,
            duration_seconds: None,
        }
    }
}

/// An exercise performed within a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub exercise: ExerciseCatalogEntry,
    /// 0-based position within the workout
    pub order: u32,
    /// Exercises sharing a group were supersetted
    pub superset_group: Option<String>,
    pub notes: Option<String>,
    pub sets: Vec<WorkoutSet>,
}

/// One training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Unique identifier
    pub id: Uuid,
    /// Session title
    pub title: String,
    pub kind: WorkoutKind,
    pub started_at: DateTime<Utc>,
    pub duration_seconds: u32,
    pub notes: Option<String>,
    /// Ordered exercises
    pub exercises: Vec<WorkoutExercise>,
}

impl Workout {
    /// Create an empty strength workout.
    pub fn new(title: String, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            kind: WorkoutKind::Strength,
            started_at,
            duration_seconds: 0,
            notes: None,
            exercises: Vec::new(),
        }
    }

    /// End of the session.
    pub fn ended_at(&self) -> DateTime<Utc> {
        self.started_at + chrono::Duration::seconds(i64::from(self.duration_seconds))
    }

    /// Total number of sets across all exercises.
    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }
}

/// Fatal import errors.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("The file is empty")]
    EmptyFile,

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid header, missing required columns: {}", .0.join(", "))]
    MissingRequiredColumns(Vec<String>),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Access denied: {0}")]
    AccessDenied(PathBuf),

    #[error("File too large: {size_mb:.1}MB exceeds maximum {max_mb:.1}MB")]
    TooLarge { size_mb: f64, max_mb: f64 },

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Non-fatal, row-local problems encountered during import.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportWarning {
    /// Row skipped because its field count differs from the header
    FieldCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// Row skipped because a quoted field was never closed
    MalformedQuotes { line: usize },
    /// Date could not be parsed and was replaced by the import time
    UnparseableDate { line: usize, value: String },
    /// Row kept but no set was built from it
    DroppedSet { line: usize, reason: String },
}

impl std::fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportWarning::FieldCountMismatch {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {}: expected {} fields, found {}",
                line, expected, found
            ),
            ImportWarning::MalformedQuotes { line } => {
                write!(f, "line {}: unterminated quoted field", line)
            }
            ImportWarning::UnparseableDate { line, value } => {
                write!(f, "line {}: unparseable date '{}'", line, value)
            }
            ImportWarning::DroppedSet { line, reason } => {
                write!(f, "line {}: set dropped ({})", line, reason)
            }
        }
    }
}

/// Summary of an import run, for reporting to the user.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Data lines seen (excluding header and blank lines)
    pub total_rows: usize,
    /// Lines that could not be parsed into a row
    pub skipped_rows: usize,
    /// Weights rewritten by outlier correction
    pub corrected_weights: usize,
    /// Rows that did not produce a set
    pub dropped_sets: usize,
    /// Catalog entries synthesized for unknown exercise names
    pub created_exercises: Vec<String>,
    pub warnings: Vec<ImportWarning>,
}

/// Result of a successful import.
#[derive(Debug)]
pub struct ImportOutcome {
    pub workouts: Vec<Workout>,
    pub report: ImportReport,
}
