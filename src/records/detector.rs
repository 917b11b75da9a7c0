//! Personal record detection.
//!
//! For every exercise in a strength workout the completed set with the
//! highest estimated one-rep max is compared against the current record.
//! A new record is stored only when it is strictly higher, so records for an
//! exercise never decrease over a replay.
//!
//! Older records are kept as history; the current one is the highest.

use std::collections::HashMap;
use uuid::Uuid;

use crate::records::types::{estimate_one_rep_max, PersonalRecord};
use crate::storage::config::RecordSettings;
use crate::storage::repository::RecordStore;
use crate::storage::DatabaseError;
use crate::workouts::types::{Workout, WorkoutKind};

/// Best set of one exercise within a workout.
#[derive(Debug, Clone, PartialEq)]
pub struct SetCandidate {
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub weight_kg: f64,
    pub reps: u32,
    pub estimated_one_rep_max: f64,
}

/// Detects and stores personal records.
pub struct PrDetector<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    settings: RecordSettings,
}

impl<'a, S: RecordStore + ?Sized> PrDetector<'a, S> {
    /// Create a detector backed by a record store.
    pub fn new(store: &'a S, settings: RecordSettings) -> Self {
        Self { store, settings }
    }

    /// Current record per exercise.
    pub fn current_records(&self) -> Result<Vec<PersonalRecord>, DatabaseError> {
        let mut records: Vec<PersonalRecord> = current_by_exercise(
            self.store.fetch_all_personal_records()?,
        )
        .into_values()
        .collect();
        records.sort_by(|a, b| a.exercise_name.cmp(&b.exercise_name));
        Ok(records)
    }

    /// Current record for one exercise.
    pub fn current_record(
        &self,
        exercise_id: Uuid,
    ) -> Result<Option<PersonalRecord>, DatabaseError> {
        let records = self
            .store
            .fetch_all_personal_records()?
            .into_iter()
            .filter(|r| r.exercise_id == exercise_id)
            .collect();
        Ok(current_by_exercise(records).remove(&exercise_id))
    }

    /// Best qualifying set per exercise, in the order exercises appear.
    pub fn best_candidates(&self, workout: &Workout) -> Vec<SetCandidate> {
        let mut best: Vec<SetCandidate> = Vec::new();

        for exercise in &workout.exercises {
            for set in &exercise.sets {
                if !set.completed || set.reps >= self.settings.max_reps {
                    continue;
                }
                let Some(estimate) = estimate_one_rep_max(set.weight_kg, set.reps) else {
                    continue;
                };

                let candidate = SetCandidate {
                    exercise_id: exercise.exercise.id,
                    exercise_name: exercise.exercise.name.clone(),
                    weight_kg: set.weight_kg,
                    reps: set.reps,
                    estimated_one_rep_max: estimate,
                };

                let existing = best
                    .iter()
                    .position(|c| c.exercise_id == candidate.exercise_id);
                match existing {
                    // Strictly greater keeps the first of equal sets
                    Some(i) if estimate > best[i].estimated_one_rep_max => best[i] = candidate,
                    Some(_) => {}
                    None => best.push(candidate),
                }
            }
        }

        best
    }

    /// Store and return new records earned by a workout.
    pub fn detect(&self, workout: &Workout) -> Result<Vec<PersonalRecord>, DatabaseError> {
        if workout.kind != WorkoutKind::Strength {
            return Ok(Vec::new());
        }

        let candidates = self.best_candidates(workout);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let current = current_by_exercise(self.store.fetch_all_personal_records()?);
        let mut new_records = Vec::new();

        for candidate in candidates {
            let beats_current = current
                .get(&candidate.exercise_id)
                .map_or(true, |record| {
                    candidate.estimated_one_rep_max > record.estimated_one_rep_max
                });
            if !beats_current {
                continue;
            }

            let record = PersonalRecord {
                id: Uuid::new_v4(),
                exercise_id: candidate.exercise_id,
                exercise_name: candidate.exercise_name,
                estimated_one_rep_max: candidate.estimated_one_rep_max,
                weight_kg: candidate.weight_kg,
                reps: candidate.reps,
                achieved_at: workout.started_at,
                workout_id: workout.id,
            };
            self.store.save_personal_record(&record)?;

            tracing::info!(
                "New record: {} {}kg x {} (est. 1RM {:.1}kg)",
                record.exercise_name,
                record.weight_kg,
                record.reps,
                record.estimated_one_rep_max
            );
            new_records.push(record);
        }

        Ok(new_records)
    }

    /// Replace the records of a single (edited) workout.
    pub fn recalculate(&self, workout: &Workout) -> Result<Vec<PersonalRecord>, DatabaseError> {
        let removed = self.store.delete_personal_records_for_workout(workout.id)?;
        tracing::debug!("Removed {} records of workout {}", removed, workout.id);
        self.detect(workout)
    }

    /// Drop every record and rebuild them from `workouts`.
    ///
    /// Workouts are replayed oldest first regardless of input order, since
    /// the resulting records depend on replay order.
    pub fn recalculate_all(
        &self,
        workouts: &[Workout],
    ) -> Result<Vec<PersonalRecord>, DatabaseError> {
        for record in self.store.fetch_all_personal_records()? {
            self.store.delete_personal_record(&record)?;
        }

        let mut ordered: Vec<&Workout> = workouts.iter().collect();
        ordered.sort_by_key(|w| w.started_at);

        let mut records = Vec::new();
        for workout in ordered {
            records.extend(self.detect(workout)?);
        }

        tracing::info!(
            "Recalculated records over {} workouts: {} records",
            workouts.len(),
            records.len()
        );

        Ok(records)
    }
}

/// Highest record per exercise; the earliest wins a tie.
fn current_by_exercise(records: Vec<PersonalRecord>) -> HashMap<Uuid, PersonalRecord> {
    let mut current: HashMap<Uuid, PersonalRecord> = HashMap::new();
    for record in records {
        let keep_existing = current.get(&record.exercise_id).is_some_and(|existing| {
            existing.estimated_one_rep_max > record.estimated_one_rep_max
                || (existing.estimated_one_rep_max == record.estimated_one_rep_max
                    && existing.achieved_at <= record.achieved_at)
        });
        if !keep_existing {
            current.insert(record.exercise_id, record);
        }
    }
    current
}
