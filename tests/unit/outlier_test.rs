//! Unit tests for weight outlier correction.

use liftlog::storage::config::OutlierSettings;
use liftlog::workouts::outliers::OutlierCorrector;
use liftlog::workouts::parser_csv::parse_csv;
use liftlog::workouts::types::Row;

const HEADER: &str = "title,start_time,end_time,exercise_title,set_index,weight_kg,reps";

/// Rows for one session, one per `(exercise, weight)`.
fn rows(sets: &[(&str, &str)]) -> Vec<Row> {
    let mut content = format!("{}\n", HEADER);
    for (i, (exercise, weight)) in sets.iter().enumerate() {
        content.push_str(&format!(
            "Session,\"4 Feb 2025, 16:21\",\"4 Feb 2025, 17:21\",{},{},{},5\n",
            exercise, i, weight
        ));
    }
    parse_csv(&content).expect("Should parse rows").rows
}

fn weights(rows: &[Row]) -> Vec<f64> {
    rows.iter().filter_map(Row::weight).collect()
}

#[test]
fn test_extra_zero_corrected() {
    let input = rows(&[
        ("Bench Press", "80"),
        ("Bench Press", "82"),
        ("Bench Press", "85"),
        ("Bench Press", "800"),
    ]);

    let result = OutlierCorrector::default().correct(&input);

    assert_eq!(weights(&result.rows), vec![80.0, 82.0, 85.0, 80.0]);
    assert_eq!(result.count(), 1);
    assert_eq!(result.corrections[0].line, 5);
    assert_eq!(result.corrections[0].original_kg, 800.0);
    assert_eq!(result.corrections[0].corrected_kg, 80.0);
}

#[test]
fn test_threshold_is_exclusive() {
    let at_threshold = rows(&[
        ("Squat", "50"),
        ("Squat", "50"),
        ("Squat", "50"),
        ("Squat", "250"),
    ]);
    let result = OutlierCorrector::default().correct(&at_threshold);
    assert_eq!(weights(&result.rows), vec![50.0, 50.0, 50.0, 250.0]);

    let above_threshold = rows(&[
        ("Squat", "50"),
        ("Squat", "50"),
        ("Squat", "50"),
        ("Squat", "260"),
    ]);
    let result = OutlierCorrector::default().correct(&above_threshold);
    assert_eq!(weights(&result.rows), vec![50.0, 50.0, 50.0, 26.0]);
}

#[test]
fn test_two_samples_never_corrected() {
    let input = rows(&[("Deadlift", "140"), ("Deadlift", "1400")]);

    let result = OutlierCorrector::default().correct(&input);

    assert_eq!(result.count(), 0);
    assert_eq!(result.rows, input);
}

#[test]
fn test_implausible_candidate_left_alone() {
    // 5000 / 10 = 500 is still far above the 3x ceiling
    let input = rows(&[
        ("Curl", "12"),
        ("Curl", "12"),
        ("Curl", "14"),
        ("Curl", "5000"),
    ]);

    let result = OutlierCorrector::default().correct(&input);
    assert_eq!(result.count(), 0);
}

#[test]
fn test_exercises_grouped_by_raw_title() {
    let input = rows(&[
        ("Row", "60"),
        ("Row", "62"),
        ("Row", "64"),
        ("Leg Press", "600"),
        ("Leg Press", "620"),
        ("Leg Press", "640"),
    ]);

    let result = OutlierCorrector::default().correct(&input);

    // Leg press is heavy on its own, not an outlier of rows
    assert_eq!(result.count(), 0);
}

#[test]
fn test_bodyweight_rows_ignored() {
    let input = rows(&[
        ("Pull Up", ""),
        ("Pull Up", "0"),
        ("Pull Up", "10"),
        ("Pull Up", "10"),
        ("Pull Up", "10"),
        ("Pull Up", "100"),
    ]);

    let result = OutlierCorrector::default().correct(&input);

    assert_eq!(result.count(), 1);
    assert_eq!(result.rows[0].weight_kg, "");
    assert_eq!(result.rows[5].weight(), Some(10.0));
}

#[test]
fn test_second_pass_changes_nothing() {
    let input = rows(&[
        ("Bench Press", "80"),
        ("Bench Press", "82"),
        ("Bench Press", "85"),
        ("Bench Press", "800"),
    ]);
    let corrector = OutlierCorrector::default();

    let first = corrector.correct(&input);
    let second = corrector.correct(&first.rows);

    assert_eq!(second.count(), 0);
    assert_eq!(second.rows, first.rows);
}

#[test]
fn test_second_pass_changes_nothing_after_cascade() {
    let input = rows(&[
        ("Squat", "20"),
        ("Squat", "20"),
        ("Squat", "20"),
        ("Squat", "100"),
        ("Squat", "100"),
        ("Squat", "450"),
        ("Squat", "600"),
    ]);
    let corrector = OutlierCorrector::default();

    let first = corrector.correct(&input);
    assert_eq!(
        weights(&first.rows),
        vec![20.0, 20.0, 20.0, 100.0, 100.0, 45.0, 60.0]
    );
    let corrected: Vec<(f64, f64)> = first
        .corrections
        .iter()
        .map(|c| (c.original_kg, c.corrected_kg))
        .collect();
    assert_eq!(corrected, vec![(600.0, 60.0), (450.0, 45.0)]);

    let second = corrector.correct(&first.rows);
    assert_eq!(second.count(), 0);
    assert_eq!(second.rows, first.rows);
}

#[test]
fn test_custom_settings() {
    let settings = OutlierSettings {
        min_samples: 2,
        ..Default::default()
    };
    let input = rows(&[("Deadlift", "140"), ("Deadlift", "1400")]);

    let result = OutlierCorrector::new(settings).correct(&input);

    // Median of two is 770, so 1400 is no spike
    assert_eq!(result.count(), 0);
    assert_eq!(result.rows.len(), 2);
}
