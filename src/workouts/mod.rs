//! Workout module: history import, assembly and export.

pub mod assembler;
pub mod dates;
pub mod exporter_csv;
pub mod importer;
pub mod outliers;
pub mod parser_csv;
pub mod types;

pub use assembler::{AssembledWorkouts, WorkoutAssembler};
pub use dates::DateLocale;
pub use exporter_csv::{export_csv_to_file, generate_csv_filename, serialize, ExportError};
pub use importer::HistoryImporter;
pub use outliers::{Correction, CorrectionResult, OutlierCorrector};
pub use parser_csv::{parse_csv, ParsedFile};
pub use types::{
    Header, ImportError, ImportOutcome, ImportReport, ImportWarning, Row, Workout,
    WorkoutExercise, WorkoutKind, WorkoutSet,
};
