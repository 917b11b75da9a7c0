//! Persistence collaborator interfaces.
//!
//! The import and record pipelines only ever talk to storage through these
//! traits. [`crate::storage::Database`] implements all of them.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::exercises::types::ExerciseCatalogEntry;
use crate::records::types::PersonalRecord;
use crate::storage::DatabaseError;
use crate::workouts::types::Workout;

/// Exercise catalog storage.
pub trait ExerciseStore {
    /// All catalog entries, built-in and custom.
    fn fetch_all_exercises(&self) -> Result<Vec<ExerciseCatalogEntry>, DatabaseError>;

    /// Insert or update an entry. Names are unique ignoring case.
    fn save_exercise(&self, entry: &ExerciseCatalogEntry) -> Result<(), DatabaseError>;
}

/// Personal record storage.
pub trait RecordStore {
    /// Every stored record, current and superseded.
    fn fetch_all_personal_records(&self) -> Result<Vec<PersonalRecord>, DatabaseError>;

    fn save_personal_record(&self, record: &PersonalRecord) -> Result<(), DatabaseError>;

    fn delete_personal_record(&self, record: &PersonalRecord) -> Result<(), DatabaseError>;

    /// Remove records earned by one workout. Returns how many were removed.
    fn delete_personal_records_for_workout(&self, workout_id: Uuid)
        -> Result<usize, DatabaseError>;
}

/// Workout storage.
pub trait WorkoutStore {
    fn save_workout(&self, workout: &Workout) -> Result<(), DatabaseError>;

    fn fetch_workout(&self, id: Uuid) -> Result<Option<Workout>, DatabaseError>;

    fn delete_workout(&self, id: Uuid) -> Result<(), DatabaseError>;

    /// Workouts started within `[from, to]`, oldest first.
    fn fetch_workouts_by_date_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Workout>, DatabaseError>;

    /// All workouts, oldest first.
    fn fetch_all_workouts(&self) -> Result<Vec<Workout>, DatabaseError>;
}
