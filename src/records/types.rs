//! Personal record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reps at which the Brzycki formula stops being meaningful.
pub const BRZYCKI_REP_LIMIT: u32 = 37;

/// A personal record earned by one set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    /// Unique identifier
    pub id: Uuid,
    /// Catalog entry the record belongs to
    pub exercise_id: Uuid,
    /// Exercise name at the time the record was set
    pub exercise_name: String,
    /// Estimated one-rep max that earned the record
    pub estimated_one_rep_max: f64,
    /// Actual load of the set
    pub weight_kg: f64,
    /// Actual reps of the set
    pub reps: u32,
    /// Start of the workout that produced it
    pub achieved_at: DateTime<Utc>,
    /// Workout that produced it
    pub workout_id: Uuid,
}

/// Brzycki one-rep max estimate: `weight * 36 / (37 - reps)`.
///
/// `None` for non-positive weight, zero reps, or reps at or above 37.
pub fn estimate_one_rep_max(weight_kg: f64, reps: u32) -> Option<f64> {
    if weight_kg.is_nan() || weight_kg <= 0.0 || reps == 0 || reps >= BRZYCKI_REP_LIMIT {
        return None;
    }
    Some(weight_kg * 36.0 / f64::from(BRZYCKI_REP_LIMIT - reps))
}
