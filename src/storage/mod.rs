//! Storage module for database and configuration.

pub mod config;
pub mod database;
pub mod repository;
pub mod schema;

pub use config::{AppConfig, ConfigError, ImportSettings, OutlierSettings, RecordSettings};
pub use database::{Database, DatabaseError};
pub use repository::{ExerciseStore, RecordStore, WorkoutStore};
