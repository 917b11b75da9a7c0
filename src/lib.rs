//! LiftLog - Strength Training History
//!
//! Imports workout-log CSV exports into structured workouts, repairs
//! mistyped weights, resolves exercise names against a local catalog and
//! derives personal records from estimated one-rep maxes.

pub mod exercises;
pub mod records;
pub mod storage;
pub mod workouts;

// Re-export commonly used types
pub use exercises::resolver::ExerciseResolver;
pub use records::detector::PrDetector;
pub use storage::database::Database;
pub use workouts::importer::HistoryImporter;
