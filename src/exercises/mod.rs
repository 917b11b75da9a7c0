//! Exercise catalog types and name resolution.

pub mod resolver;
pub mod types;

pub use resolver::{ExerciseResolver, MatchKind};
pub use types::{Equipment, ExerciseCatalogEntry, ExerciseCategory, MuscleGroup};
