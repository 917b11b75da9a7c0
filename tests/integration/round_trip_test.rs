//! Integration tests for export followed by re-import.

use chrono::{TimeZone, Utc};
use liftlog::exercises::resolver::ExerciseResolver;
use liftlog::exercises::types::{ExerciseCatalogEntry, ExerciseCategory, MuscleGroup};
use liftlog::storage::Database;
use liftlog::workouts::exporter_csv::{export_csv_to_file, serialize};
use liftlog::workouts::importer::HistoryImporter;
use liftlog::workouts::types::{Workout, WorkoutExercise, WorkoutKind, WorkoutSet};

fn exercise(
    name: &str,
    order: u32,
    superset: Option<&str>,
    sets: &[(f64, u32)],
) -> WorkoutExercise {
    WorkoutExercise {
        exercise: ExerciseCatalogEntry::new(name, ExerciseCategory::Barbell, vec![MuscleGroup::FullBody]),
        order,
        superset_group: superset.map(str::to_string),
        notes: None,
        sets: sets
            .iter()
            .enumerate()
            .map(|(i, (weight, reps))| WorkoutSet::new(i as u32, *reps, *weight))
            .collect(),
    }
}

fn sample_workouts() -> Vec<Workout> {
    let mut upper = Workout::new(
        "Upper, heavy".to_string(),
        Utc.with_ymd_and_hms(2025, 2, 4, 16, 21, 0).unwrap(),
    );
    upper.duration_seconds = 3600;
    upper.notes = Some("Said \"light weight\" twice".to_string());
    upper.exercises = vec![
        exercise("Overhead Press", 0, None, &[(40.0, 8), (45.0, 6), (47.5, 5)]),
        exercise("Chin Up", 1, Some("1"), &[(0.0, 10), (0.0, 8)]),
        exercise("Barbell Row", 2, Some("1"), &[(60.0, 10), (62.5, 10)]),
    ];
    upper.exercises[0].sets[2].rpe = Some(9.5);
    upper.exercises[0].sets[2].set_type = Some("failure".to_string());

    let mut lower = Workout::new(
        "Lower".to_string(),
        Utc.with_ymd_and_hms(2025, 2, 6, 7, 5, 0).unwrap(),
    );
    lower.duration_seconds = 45 * 60;
    lower.exercises = vec![
        exercise("Squat", 0, None, &[(100.0, 5), (100.0, 5), (102.5, 5)]),
        exercise("Romanian Deadlift", 1, None, &[(80.0, 8), (80.0, 8)]),
    ];

    vec![upper, lower]
}

#[test]
fn test_round_trip_preserves_structure() {
    let original = sample_workouts();
    let csv = serialize(&original);

    let db = Database::open_in_memory().unwrap();
    let mut resolver = ExerciseResolver::load(&db).unwrap();
    let outcome = HistoryImporter::default()
        .import_str(&csv, &mut resolver)
        .expect("Exported CSV should import");

    assert_eq!(outcome.report.skipped_rows, 0);
    assert_eq!(outcome.report.dropped_sets, 0);
    assert_eq!(outcome.report.corrected_weights, 0);
    assert_eq!(outcome.workouts.len(), original.len());

    for before in &original {
        let after = outcome
            .workouts
            .iter()
            .find(|w| w.title == before.title)
            .expect("Workout should survive the round trip");

        assert_eq!(after.started_at, before.started_at);
        assert_eq!(after.duration_seconds, before.duration_seconds);
        assert_eq!(after.notes, before.notes);
        assert_eq!(after.exercises.len(), before.exercises.len());

        for (a, b) in after.exercises.iter().zip(&before.exercises) {
            assert_eq!(a.exercise.name, b.exercise.name);
            assert_eq!(a.order, b.order);
            assert_eq!(a.superset_group, b.superset_group);
            assert_eq!(a.sets.len(), b.sets.len());

            for (sa, sb) in a.sets.iter().zip(&b.sets) {
                assert_eq!(sa.reps, sb.reps);
                assert!((sa.weight_kg - sb.weight_kg).abs() < 1e-9);
                assert_eq!(sa.rpe, sb.rpe);
                assert_eq!(sa.set_type, sb.set_type);
            }
        }
    }
}

#[test]
fn test_export_skips_cardio() {
    let mut workouts = sample_workouts();
    workouts[1].kind = WorkoutKind::Cardio;

    let csv = serialize(&workouts);

    assert_eq!(csv.lines().count(), 1 + workouts[0].total_sets());
    assert!(!csv.contains("Lower"));
}

#[test]
fn test_exported_file_imports() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv");
    export_csv_to_file(&sample_workouts(), &path).unwrap();

    let db = Database::open_in_memory().unwrap();
    let mut resolver = ExerciseResolver::load(&db).unwrap();
    let outcome = HistoryImporter::default()
        .import_file(&path, &mut resolver)
        .unwrap();

    let total_sets: usize = outcome.workouts.iter().map(Workout::total_sets).sum();
    assert_eq!(total_sets, 12);
    assert_eq!(outcome.report.created_exercises.len(), 5);
}
