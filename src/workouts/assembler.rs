//! Builds Workout → Exercise → Set trees from corrected rows.
//!
//! Rows are grouped by `(title, start_time)`, the only workout identity the
//! export has. Groups are emitted in key order. Inside a group exercises keep
//! the order in which they first appear and sets follow `set_index`.
//!
//! A row without positive reps yields no set, an exercise without sets is
//! left out, and a group without exercises yields no workout.

use chrono::Utc;
use std::collections::{BTreeMap, HashMap};

use crate::exercises::resolver::ExerciseResolver;
use crate::storage::repository::ExerciseStore;
use crate::storage::DatabaseError;
use crate::workouts::dates::{parse_workout_time_utc, DateLocale};
use crate::workouts::types::{ImportWarning, Row, Workout, WorkoutExercise, WorkoutSet};

/// Output of [`WorkoutAssembler::assemble`].
#[derive(Debug, Clone, Default)]
pub struct AssembledWorkouts {
    pub workouts: Vec<Workout>,
    /// Rows that did not produce a set
    pub dropped_sets: usize,
    pub warnings: Vec<ImportWarning>,
}

impl AssembledWorkouts {
    fn drop_set(&mut self, row: &Row, reason: String) {
        self.dropped_sets += 1;
        self.warnings.push(ImportWarning::DroppedSet {
            line: row.line,
            reason,
        });
    }
}

/// Groups rows into workouts.
#[derive(Debug, Clone)]
pub struct WorkoutAssembler {
    locales: Vec<DateLocale>,
}

impl Default for WorkoutAssembler {
    fn default() -> Self {
        Self::new(DateLocale::defaults())
    }
}

impl WorkoutAssembler {
    /// Create an assembler parsing dates with the given locales, in order.
    pub fn new(locales: Vec<DateLocale>) -> Self {
        Self { locales }
    }

    /// Assemble workouts, resolving each exercise title once per workout.
    pub fn assemble<S: ExerciseStore + ?Sized>(
        &self,
        rows: &[Row],
        resolver: &mut ExerciseResolver<'_, S>,
    ) -> Result<AssembledWorkouts, DatabaseError> {
        let mut groups: BTreeMap<(String, String), Vec<&Row>> = BTreeMap::new();
        for row in rows {
            groups.entry(row.workout_key()).or_default().push(row);
        }

        let mut result = AssembledWorkouts::default();

        for ((title, start_time), group) in groups {
            match self.assemble_group(&group, resolver, &mut result)? {
                Some(workout) => result.workouts.push(workout),
                None => tracing::debug!(
                    "Workout '{}' at '{}' has no valid sets, skipped",
                    title,
                    start_time
                ),
            }
        }

        Ok(result)
    }

    fn assemble_group<S: ExerciseStore + ?Sized>(
        &self,
        group: &[&Row],
        resolver: &mut ExerciseResolver<'_, S>,
        result: &mut AssembledWorkouts,
    ) -> Result<Option<Workout>, DatabaseError> {
        let Some(first) = group.first() else {
            return Ok(None);
        };

        let mut exercises = Vec::new();
        for (exercise_title, mut rows) in split_by_exercise(group) {
            if exercise_title.trim().is_empty() {
                for row in &rows {
                    tracing::warn!("Line {}: row without exercise title", row.line);
                    result.drop_set(row, "missing exercise title".to_string());
                }
                continue;
            }

            rows.sort_by_key(|row| row.set_index().unwrap_or(u32::MAX));

            let sets: Vec<WorkoutSet> = rows
                .iter()
                .filter_map(|row| self.build_set(row, result))
                .collect();
            if sets.is_empty() {
                tracing::debug!("Exercise '{}' has no valid sets, skipped", exercise_title);
                continue;
            }

            let lead = rows[0];
            exercises.push(WorkoutExercise {
                exercise: resolver.resolve(exercise_title)?,
                order: exercises.len() as u32,
                superset_group: non_empty(&lead.superset_id),
                notes: non_empty(&lead.exercise_notes),
                sets,
            });
        }

        if exercises.is_empty() {
            return Ok(None);
        }

        let started_at = match parse_workout_time_utc(&first.start_time, &self.locales) {
            Some(time) => time,
            None => {
                tracing::warn!(
                    "Line {}: unparseable start time '{}', using now",
                    first.line,
                    first.start_time
                );
                result.warnings.push(ImportWarning::UnparseableDate {
                    line: first.line,
                    value: first.start_time.clone(),
                });
                Utc::now()
            }
        };

        let ended_at = match parse_workout_time_utc(&first.end_time, &self.locales) {
            Some(time) => time,
            None => {
                tracing::warn!(
                    "Line {}: unparseable end time '{}', assuming zero duration",
                    first.line,
                    first.end_time
                );
                result.warnings.push(ImportWarning::UnparseableDate {
                    line: first.line,
                    value: first.end_time.clone(),
                });
                started_at
            }
        };

        let mut workout = Workout::new(first.title.trim().to_string(), started_at);
        workout.duration_seconds = (ended_at - started_at)
            .num_seconds()
            .clamp(0, i64::from(u32::MAX)) as u32;
        workout.notes = non_empty(&first.description);
        workout.exercises = exercises;

        Ok(Some(workout))
    }

    /// One set per row, or `None` (recorded in `result`) if the row is unusable.
    fn build_set(&self, row: &Row, result: &mut AssembledWorkouts) -> Option<WorkoutSet> {
        let reps = match row.reps().or_else(|| row.reps.trim().is_empty().then_some(0)) {
            Some(reps) if reps > 0 => u32::try_from(reps).ok(),
            Some(_) => {
                tracing::debug!("Line {}: set without repetitions dropped", row.line);
                result.drop_set(row, "no repetitions".to_string());
                return None;
            }
            None => None,
        };
        let Some(reps) = reps else {
            tracing::warn!("Line {}: unparseable reps '{}'", row.line, row.reps);
            result.drop_set(row, format!("unparseable reps '{}'", row.reps));
            return None;
        };

        let Some(weight_kg) = row.weight() else {
            tracing::warn!("Line {}: unparseable weight '{}'", row.line, row.weight_kg);
            result.drop_set(row, format!("unparseable weight '{}'", row.weight_kg));
            return None;
        };

        let mut set = WorkoutSet::new(row.set_index().unwrap_or(0), reps, weight_kg);
        set.set_type = non_empty(&row.set_type);
        set.rpe = row.rpe();
        set.distance_km = row.distance_km();
        set.duration_seconds = row.duration_seconds();
        Some(set)
    }
}

/// Rows per exercise title, in first-seen order.
fn split_by_exercise<'r>(group: &[&'r Row]) -> Vec<(&'r str, Vec<&'r Row>)> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut split: Vec<(&str, Vec<&Row>)> = Vec::new();

    for &row in group {
        let title = row.exercise_title.as_str();
        match positions.get(title) {
            Some(&i) => split[i].1.push(row),
            None => {
                positions.insert(title, split.len());
                split.push((title, vec![row]));
            }
        }
    }

    split
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
