//! Database operations using rusqlite.
//!
//! Implements the repository traits for the exercise catalog, workouts and
//! personal records.

use crate::exercises::types::{Equipment, ExerciseCatalogEntry, ExerciseCategory, MuscleGroup};
use crate::records::types::PersonalRecord;
use crate::storage::repository::{ExerciseStore, RecordStore, WorkoutStore};
use crate::storage::schema::{CURRENT_VERSION, SCHEMA, SCHEMA_VERSION_TABLE};
use crate::workouts::types::{Workout, WorkoutExercise, WorkoutKind};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Database wrapper for SQLite operations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::IoError(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Initialize the database schema.
    fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        let current_version = self.get_schema_version()?;

        if current_version < CURRENT_VERSION {
            self.migrate(current_version)?;
        }

        Ok(())
    }

    /// Get the current schema version.
    fn get_schema_version(&self) -> Result<i32, DatabaseError> {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(version) => Ok(version),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// Run database migrations.
    fn migrate(&self, from_version: i32) -> Result<(), DatabaseError> {
        if from_version < 1 {
            self.conn
                .execute_batch(SCHEMA)
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            self.conn
                .execute(
                    "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
                    [CURRENT_VERSION],
                )
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            tracing::info!("Database migrated to version {}", CURRENT_VERSION);
        }

        Ok(())
    }

    /// Number of stored workouts.
    pub fn count_workouts(&self) -> Result<usize, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM workouts", [], |row| row.get(0))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        Ok(count as usize)
    }

    fn query_workouts(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Workout>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params, WorkoutRow::from_row)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut workouts = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            workouts.push(row.into_workout()?);
        }
        Ok(workouts)
    }
}

const WORKOUT_COLUMNS: &str =
    "id, title, kind, started_at, duration_seconds, notes, exercises_json";

impl ExerciseStore for Database {
    fn fetch_all_exercises(&self) -> Result<Vec<ExerciseCatalogEntry>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, category, muscle_groups_json, equipment, is_custom
                 FROM exercises ORDER BY created_at, rowid",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ExerciseRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    category: row.get(2)?,
                    muscle_groups_json: row.get(3)?,
                    equipment: row.get(4)?,
                    is_custom: row.get(5)?,
                })
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut exercises = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            exercises.push(row.into_entry()?);
        }
        Ok(exercises)
    }

    fn save_exercise(&self, entry: &ExerciseCatalogEntry) -> Result<(), DatabaseError> {
        let muscle_groups_json = serde_json::to_string(&entry.muscle_groups)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

        self.conn
            .execute(
                "INSERT INTO exercises (id, name, category, muscle_groups_json, equipment, is_custom, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    category = excluded.category,
                    muscle_groups_json = excluded.muscle_groups_json,
                    equipment = excluded.equipment,
                    is_custom = excluded.is_custom",
                params![
                    entry.id.to_string(),
                    entry.name,
                    entry.category.as_str(),
                    muscle_groups_json,
                    entry.equipment.as_str(),
                    entry.is_custom as i32,
                    timestamp(&Utc::now()),
                ],
            )
            .map_err(write_error)?;

        Ok(())
    }
}

impl RecordStore for Database {
    fn fetch_all_personal_records(&self) -> Result<Vec<PersonalRecord>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, exercise_id, exercise_name, estimated_one_rep_max, weight_kg, reps,
                 achieved_at, workout_id FROM personal_records ORDER BY achieved_at, rowid",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(RecordRow {
                    id: row.get(0)?,
                    exercise_id: row.get(1)?,
                    exercise_name: row.get(2)?,
                    estimated_one_rep_max: row.get(3)?,
                    weight_kg: row.get(4)?,
                    reps: row.get(5)?,
                    achieved_at: row.get(6)?,
                    workout_id: row.get(7)?,
                })
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            records.push(row.into_record()?);
        }
        Ok(records)
    }

    fn save_personal_record(&self, record: &PersonalRecord) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO personal_records (id, exercise_id, exercise_name, estimated_one_rep_max,
                 weight_kg, reps, achieved_at, workout_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.id.to_string(),
                    record.exercise_id.to_string(),
                    record.exercise_name,
                    record.estimated_one_rep_max,
                    record.weight_kg,
                    record.reps,
                    timestamp(&record.achieved_at),
                    record.workout_id.to_string(),
                ],
            )
            .map_err(write_error)?;

        Ok(())
    }

    fn delete_personal_record(&self, record: &PersonalRecord) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "DELETE FROM personal_records WHERE id = ?1",
                params![record.id.to_string()],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    fn delete_personal_records_for_workout(
        &self,
        workout_id: Uuid,
    ) -> Result<usize, DatabaseError> {
        self.conn
            .execute(
                "DELETE FROM personal_records WHERE workout_id = ?1",
                params![workout_id.to_string()],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }
}

impl WorkoutStore for Database {
    fn save_workout(&self, workout: &Workout) -> Result<(), DatabaseError> {
        let exercises_json = serde_json::to_string(&workout.exercises)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

        let kind = match workout.kind {
            WorkoutKind::Strength => "strength",
            WorkoutKind::Cardio => "cardio",
        };

        self.conn
            .execute(
                "INSERT OR REPLACE INTO workouts (id, title, kind, started_at, duration_seconds,
                 notes, exercises_json, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    workout.id.to_string(),
                    workout.title,
                    kind,
                    timestamp(&workout.started_at),
                    workout.duration_seconds,
                    workout.notes,
                    exercises_json,
                    timestamp(&Utc::now()),
                ],
            )
            .map_err(write_error)?;

        Ok(())
    }

    fn fetch_workout(&self, id: Uuid) -> Result<Option<Workout>, DatabaseError> {
        let sql = format!("SELECT {} FROM workouts WHERE id = ?1", WORKOUT_COLUMNS);
        let result = self
            .conn
            .query_row(&sql, params![id.to_string()], WorkoutRow::from_row);

        match result {
            Ok(row) => Ok(Some(row.into_workout()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    fn delete_workout(&self, id: Uuid) -> Result<(), DatabaseError> {
        let affected = self
            .conn
            .execute("DELETE FROM workouts WHERE id = ?1", params![id.to_string()])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        if affected == 0 {
            return Err(DatabaseError::NotFound(format!("Workout {}", id)));
        }

        Ok(())
    }

    fn fetch_workouts_by_date_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Workout>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM workouts WHERE started_at >= ?1 AND started_at <= ?2
             ORDER BY started_at, rowid",
            WORKOUT_COLUMNS
        );
        self.query_workouts(&sql, params![timestamp(&from), timestamp(&to)])
    }

    fn fetch_all_workouts(&self) -> Result<Vec<Workout>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM workouts ORDER BY started_at, rowid",
            WORKOUT_COLUMNS
        );
        self.query_workouts(&sql, [])
    }
}

/// Sortable UTC timestamp.
fn timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::DeserializationError(format!("Invalid {} date: {}", field, e)))
}

fn parse_uuid(value: &str, field: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(value)
        .map_err(|e| DatabaseError::DeserializationError(format!("Invalid {} UUID: {}", field, e)))
}

/// Map a write failure, keeping constraint violations distinguishable.
fn write_error(e: rusqlite::Error) -> DatabaseError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DatabaseError::ConstraintViolation(e.to_string())
        }
        _ => DatabaseError::QueryFailed(e.to_string()),
    }
}

/// Internal struct for reading exercise rows.
struct ExerciseRow {
    id: String,
    name: String,
    category: String,
    muscle_groups_json: String,
    equipment: String,
    is_custom: i32,
}

impl ExerciseRow {
    fn into_entry(self) -> Result<ExerciseCatalogEntry, DatabaseError> {
        let category = ExerciseCategory::from_str_opt(&self.category).ok_or_else(|| {
            DatabaseError::DeserializationError(format!("Unknown category: {}", self.category))
        })?;

        let equipment = Equipment::from_str_opt(&self.equipment).ok_or_else(|| {
            DatabaseError::DeserializationError(format!("Unknown equipment: {}", self.equipment))
        })?;

        let muscle_groups: Vec<MuscleGroup> = serde_json::from_str(&self.muscle_groups_json)
            .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?;

        Ok(ExerciseCatalogEntry {
            id: parse_uuid(&self.id, "exercise")?,
            name: self.name,
            category,
            muscle_groups,
            equipment,
            is_custom: self.is_custom != 0,
        })
    }
}

/// Internal struct for reading workout rows.
struct WorkoutRow {
    id: String,
    title: String,
    kind: String,
    started_at: String,
    duration_seconds: u32,
    notes: Option<String>,
    exercises_json: String,
}

impl WorkoutRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(WorkoutRow {
            id: row.get(0)?,
            title: row.get(1)?,
            kind: row.get(2)?,
            started_at: row.get(3)?,
            duration_seconds: row.get(4)?,
            notes: row.get(5)?,
            exercises_json: row.get(6)?,
        })
    }

    fn into_workout(self) -> Result<Workout, DatabaseError> {
        let kind = match self.kind.as_str() {
            "strength" => WorkoutKind::Strength,
            "cardio" => WorkoutKind::Cardio,
            other => {
                return Err(DatabaseError::DeserializationError(format!(
                    "Unknown workout kind: {}",
                    other
                )))
            }
        };

        let exercises: Vec<WorkoutExercise> = serde_json::from_str(&self.exercises_json)
            .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?;

        Ok(Workout {
            id: parse_uuid(&self.id, "workout")?,
            title: self.title,
            kind,
            started_at: parse_timestamp(&self.started_at, "started_at")?,
            duration_seconds: self.duration_seconds,
            notes: self.notes,
            exercises,
        })
    }
}

/// Internal struct for reading personal record rows.
struct RecordRow {
    id: String,
    exercise_id: String,
    exercise_name: String,
    estimated_one_rep_max: f64,
    weight_kg: f64,
    reps: u32,
    achieved_at: String,
    workout_id: String,
}

impl RecordRow {
    fn into_record(self) -> Result<PersonalRecord, DatabaseError> {
        Ok(PersonalRecord {
            id: parse_uuid(&self.id, "record")?,
            exercise_id: parse_uuid(&self.exercise_id, "exercise")?,
            exercise_name: self.exercise_name,
            estimated_one_rep_max: self.estimated_one_rep_max,
            weight_kg: self.weight_kg,
            reps: self.reps,
            achieved_at: parse_timestamp(&self.achieved_at, "achieved_at")?,
            workout_id: parse_uuid(&self.workout_id, "workout")?,
        })
    }
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}
