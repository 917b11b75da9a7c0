//! Personal record estimation and detection.

pub mod detector;
pub mod types;

pub use detector::{PrDetector, SetCandidate};
pub use types::{estimate_one_rep_max, PersonalRecord};
