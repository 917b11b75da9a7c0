//! Unit tests for the workout-log CSV parser.

use liftlog::workouts::parser_csv::parse_csv;
use liftlog::workouts::types::{ImportError, ImportWarning};

/// Sample export with every wire-format column.
const SAMPLE_EXPORT: &str = r#"title,start_time,end_time,description,exercise_title,superset_id,exercise_notes,set_index,set_type,weight_kg,reps,distance_km,duration_seconds,rpe
"Push Day","4 Feb 2025, 16:21","4 Feb 2025, 17:21","Felt strong, slept well",Bench Press (Barbell),,,0,warmup,60,10,,,
"Push Day","4 Feb 2025, 16:21","4 Feb 2025, 17:21","Felt strong, slept well",Bench Press (Barbell),,"Pause ""1 sec"" at chest",1,normal,80,5,,,8.5
"Push Day","4 Feb 2025, 16:21","4 Feb 2025, 17:21","Felt strong, slept well",Triceps Pushdown,1,,0,normal,25,12,,,
"#;

#[test]
fn test_parse_sample_export() {
    let parsed = parse_csv(SAMPLE_EXPORT).expect("Should parse export");

    assert_eq!(parsed.header.len(), 14);
    assert_eq!(parsed.rows.len(), 3);
    assert_eq!(parsed.total_rows, 3);
    assert_eq!(parsed.skipped_rows(), 0);
    assert!(parsed.warnings.is_empty());
}

#[test]
fn test_quoted_fields() {
    let parsed = parse_csv(SAMPLE_EXPORT).expect("Should parse export");
    let row = &parsed.rows[1];

    assert_eq!(row.title, "Push Day");
    assert_eq!(row.start_time, "4 Feb 2025, 16:21");
    assert_eq!(row.description, "Felt strong, slept well");
    assert_eq!(row.exercise_notes, "Pause \"1 sec\" at chest");
    assert_eq!(row.rpe(), Some(8.5));
}

#[test]
fn test_line_numbers_are_one_based() {
    let parsed = parse_csv(SAMPLE_EXPORT).expect("Should parse export");
    let lines: Vec<usize> = parsed.rows.iter().map(|r| r.line).collect();

    assert_eq!(lines, vec![2, 3, 4]);
}

#[test]
fn test_typed_accessors() {
    let parsed = parse_csv(SAMPLE_EXPORT).expect("Should parse export");
    let row = &parsed.rows[0];

    assert_eq!(row.weight(), Some(60.0));
    assert_eq!(row.reps(), Some(10));
    assert_eq!(row.set_index(), Some(0));
    assert_eq!(row.distance_km(), None);
}

#[test]
fn test_unknown_columns_kept_aside() {
    let content = "gym,title,start_time,end_time,exercise_title,set_index,weight_kg,reps\n\
                   Downtown,Legs,\"5 Feb 2025, 10:00\",\"5 Feb 2025, 11:00\",Squat,0,100,5\n";

    let parsed = parse_csv(content).expect("Should parse export");
    let row = &parsed.rows[0];

    assert_eq!(row.title, "Legs");
    assert_eq!(row.extra.get("gym").map(String::as_str), Some("Downtown"));
}

#[test]
fn test_field_count_mismatch_is_skipped() {
    let content = "title,start_time,end_time,exercise_title,set_index,weight_kg,reps\n\
                   Legs,\"5 Feb 2025, 10:00\",\"5 Feb 2025, 11:00\",Squat,0,100,5\n\
                   Legs,5 Feb 2025, 10:00,5 Feb 2025, 11:00,Squat,1,100,5\n\
                   Legs,\"5 Feb 2025, 10:00\",\"5 Feb 2025, 11:00\",Squat,2,100,5\n";

    let parsed = parse_csv(content).expect("One bad row must not abort the import");

    assert_eq!(parsed.rows.len(), 2);
    assert_eq!(parsed.total_rows, 3);
    assert_eq!(parsed.skipped_rows(), 1);
    assert_eq!(
        parsed.warnings,
        vec![ImportWarning::FieldCountMismatch {
            line: 3,
            expected: 7,
            found: 9,
        }]
    );
}

#[test]
fn test_unterminated_quote_is_skipped() {
    let content = "title,start_time,end_time,exercise_title,set_index,weight_kg,reps\n\
                   Legs,\"5 Feb 2025, 10:00\",\"5 Feb 2025, 11:00\",Squat,0,100,\"5\n";

    let parsed = parse_csv(content).expect("Should parse export");

    assert!(parsed.rows.is_empty());
    assert_eq!(parsed.warnings, vec![ImportWarning::MalformedQuotes { line: 2 }]);
}

#[test]
fn test_blank_lines_ignored() {
    let content = "\n\ntitle,start_time,end_time,exercise_title,set_index,weight_kg,reps\n\n\
                   Legs,\"5 Feb 2025, 10:00\",\"5 Feb 2025, 11:00\",Squat,0,100,5\n\n";

    let parsed = parse_csv(content).expect("Should parse export");

    assert_eq!(parsed.rows.len(), 1);
    assert_eq!(parsed.total_rows, 1);
    assert_eq!(parsed.rows[0].line, 5);
}

#[test]
fn test_empty_input() {
    assert!(matches!(parse_csv(""), Err(ImportError::EmptyFile)));
    assert!(matches!(parse_csv("  \n\n"), Err(ImportError::EmptyFile)));
}

#[test]
fn test_missing_required_columns() {
    let result = parse_csv("title,start_time,exercise_title,weight_kg\nA,B,C,D\n");

    match result {
        Err(ImportError::MissingRequiredColumns(missing)) => {
            assert_eq!(missing, vec!["end_time", "set_index", "reps"]);
        }
        other => panic!("Expected MissingRequiredColumns, got {:?}", other),
    }
}

#[test]
fn test_header_only() {
    let parsed = parse_csv("title,start_time,end_time,exercise_title,set_index,weight_kg,reps\n")
        .expect("Header without rows is valid");

    assert!(parsed.rows.is_empty());
    assert_eq!(parsed.total_rows, 0);
}
