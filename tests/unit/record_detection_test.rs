//! Unit tests for personal record detection.

use chrono::{DateTime, TimeZone, Utc};
use liftlog::exercises::types::{ExerciseCatalogEntry, ExerciseCategory, MuscleGroup};
use liftlog::records::detector::PrDetector;
use liftlog::records::types::estimate_one_rep_max;
use liftlog::storage::config::RecordSettings;
use liftlog::storage::{Database, RecordStore};
use liftlog::workouts::types::{Workout, WorkoutExercise, WorkoutKind, WorkoutSet};

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, d, 18, 0, 0).unwrap()
}

fn bench() -> ExerciseCatalogEntry {
    ExerciseCatalogEntry::new("Bench Press", ExerciseCategory::Barbell, vec![MuscleGroup::Chest])
}

fn create_workout(started_at: DateTime<Utc>, exercise: &ExerciseCatalogEntry, sets: &[(f64, u32)]) -> Workout {
    let mut workout = Workout::new("Push".to_string(), started_at);
    workout.exercises.push(WorkoutExercise {
        exercise: exercise.clone(),
        order: 0,
        superset_group: None,
        notes: None,
        sets: sets
            .iter()
            .enumerate()
            .map(|(i, (weight, reps))| WorkoutSet::new(i as u32, *reps, *weight))
            .collect(),
    });
    workout
}

#[test]
fn test_best_set_becomes_record() {
    let db = Database::open_in_memory().unwrap();
    let detector = PrDetector::new(&db, RecordSettings::default());
    let workout = create_workout(day(1), &bench(), &[(80.0, 5), (82.0, 5), (85.0, 5), (80.0, 5)]);

    let records = detector.detect(&workout).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].weight_kg, 85.0);
    assert_eq!(records[0].reps, 5);
    assert_eq!(records[0].achieved_at, day(1));
    assert_eq!(records[0].workout_id, workout.id);
    assert_eq!(db.fetch_all_personal_records().unwrap().len(), 1);
}

#[test]
fn test_weaker_workout_earns_nothing() {
    let db = Database::open_in_memory().unwrap();
    let detector = PrDetector::new(&db, RecordSettings::default());
    let exercise = bench();

    detector
        .detect(&create_workout(day(1), &exercise, &[(100.0, 5)]))
        .unwrap();
    let records = detector
        .detect(&create_workout(day(2), &exercise, &[(95.0, 5)]))
        .unwrap();

    assert!(records.is_empty());
}

#[test]
fn test_equal_estimate_is_not_a_record() {
    let db = Database::open_in_memory().unwrap();
    let detector = PrDetector::new(&db, RecordSettings::default());
    let exercise = bench();

    detector
        .detect(&create_workout(day(1), &exercise, &[(100.0, 5)]))
        .unwrap();
    let records = detector
        .detect(&create_workout(day(2), &exercise, &[(100.0, 5)]))
        .unwrap();

    assert!(records.is_empty());
}

#[test]
fn test_higher_estimate_supersedes() {
    let db = Database::open_in_memory().unwrap();
    let detector = PrDetector::new(&db, RecordSettings::default());
    let exercise = bench();

    detector
        .detect(&create_workout(day(1), &exercise, &[(100.0, 5)]))
        .unwrap();
    // Fewer kilos, more reps, higher estimate
    let records = detector
        .detect(&create_workout(day(2), &exercise, &[(95.0, 8)]))
        .unwrap();

    assert_eq!(records.len(), 1);
    let current = detector.current_record(exercise.id).unwrap().unwrap();
    assert_eq!(current.weight_kg, 95.0);
    assert_eq!(current.reps, 8);
    assert_eq!(detector.current_records().unwrap().len(), 1);
}

#[test]
fn test_sets_beyond_rep_limit_ignored() {
    let db = Database::open_in_memory().unwrap();
    let detector = PrDetector::new(&db, RecordSettings::default());

    let records = detector
        .detect(&create_workout(day(1), &bench(), &[(100.0, 37), (40.0, 40)]))
        .unwrap();
    assert!(records.is_empty());

    let records = detector
        .detect(&create_workout(day(2), &bench(), &[(100.0, 36)]))
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].estimated_one_rep_max, estimate_one_rep_max(100.0, 36).unwrap());
}

#[test]
fn test_bodyweight_and_incomplete_sets_ignored() {
    let db = Database::open_in_memory().unwrap();
    let detector = PrDetector::new(&db, RecordSettings::default());
    let mut workout = create_workout(day(1), &bench(), &[(0.0, 12), (120.0, 3)]);
    workout.exercises[0].sets[1].completed = false;

    assert!(detector.detect(&workout).unwrap().is_empty());
}

#[test]
fn test_cardio_workout_ignored() {
    let db = Database::open_in_memory().unwrap();
    let detector = PrDetector::new(&db, RecordSettings::default());
    let mut workout = create_workout(day(1), &bench(), &[(100.0, 5)]);
    workout.kind = WorkoutKind::Cardio;

    assert!(detector.detect(&workout).unwrap().is_empty());
}

#[test]
fn test_lower_rep_limit_setting() {
    let db = Database::open_in_memory().unwrap();
    let detector = PrDetector::new(&db, RecordSettings { max_reps: 13 });

    let records = detector
        .detect(&create_workout(day(1), &bench(), &[(60.0, 15), (70.0, 10)]))
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].reps, 10);
}

#[test]
fn test_recalculate_after_edit() {
    let db = Database::open_in_memory().unwrap();
    let detector = PrDetector::new(&db, RecordSettings::default());
    let mut workout = create_workout(day(1), &bench(), &[(100.0, 5)]);
    detector.detect(&workout).unwrap();

    // Typo fixed after the fact
    workout.exercises[0].sets[0].weight_kg = 90.0;
    let records = detector.recalculate(&workout).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].weight_kg, 90.0);
    assert_eq!(db.fetch_all_personal_records().unwrap().len(), 1);
}
