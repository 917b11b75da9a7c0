//! Weight outlier correction.
//!
//! Repairs the "extra trailing zero" entry error (440 logged instead of 44).
//! Rows are grouped by their raw exercise title and a weight is rewritten
//! only when it is far above the exercise median *and* dividing it by ten
//! lands back inside the normal population. Other typo classes are left
//! alone on purpose.
//!
//! Only `weight_kg` is ever rewritten. Corrected rows are new values; the
//! input slice is not touched.

use std::collections::HashMap;

use crate::storage::config::OutlierSettings;
use crate::workouts::types::Row;

/// A single rewritten weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub line: usize,
    pub exercise: String,
    pub original_kg: f64,
    pub corrected_kg: f64,
}

/// Rows after correction plus what changed.
#[derive(Debug, Clone)]
pub struct CorrectionResult {
    pub rows: Vec<Row>,
    pub corrections: Vec<Correction>,
}

impl CorrectionResult {
    /// Number of rewritten weights.
    pub fn count(&self) -> usize {
        self.corrections.len()
    }
}

/// Per-exercise statistical weight repair.
#[derive(Debug, Clone, Default)]
pub struct OutlierCorrector {
    settings: OutlierSettings,
}

impl OutlierCorrector {
    /// Create a corrector with the given thresholds.
    pub fn new(settings: OutlierSettings) -> Self {
        Self { settings }
    }

    /// Median positive weight per exercise title, for exercises with enough samples.
    pub fn medians(&self, rows: &[Row]) -> HashMap<String, f64> {
        let mut samples: HashMap<&str, Vec<f64>> = HashMap::new();
        for row in rows {
            if let Some(weight) = row.weight().filter(|w| *w > 0.0) {
                samples
                    .entry(row.exercise_title.as_str())
                    .or_default()
                    .push(weight);
            }
        }

        samples
            .into_iter()
            .filter(|(_, weights)| weights.len() >= self.settings.min_samples)
            .filter_map(|(exercise, mut weights)| {
                median(&mut weights).map(|m| (exercise.to_string(), m))
            })
            .collect()
    }

    /// Correct until a pass changes nothing.
    ///
    /// A correction lowers the exercise median, which can expose another
    /// spike, so single passes are repeated, at most once per row.
    pub fn correct(&self, rows: &[Row]) -> CorrectionResult {
        let mut result = self.correct_pass(rows);
        if result.corrections.is_empty() {
            return result;
        }

        for _ in 0..rows.len() {
            let pass = self.correct_pass(&result.rows);
            if pass.corrections.is_empty() {
                break;
            }
            result.rows = pass.rows;
            result.corrections.extend(pass.corrections);
        }

        result
    }

    /// One pass against the medians of `rows`.
    fn correct_pass(&self, rows: &[Row]) -> CorrectionResult {
        let medians = self.medians(rows);
        let mut corrections = Vec::new();

        let rows = rows
            .iter()
            .map(|row| {
                let Some(median) = medians.get(&row.exercise_title) else {
                    return row.clone();
                };
                let Some(weight) = row.weight().filter(|w| *w > 0.0) else {
                    return row.clone();
                };

                match self.candidate(weight, *median) {
                    Some(corrected) => {
                        tracing::debug!(
                            "Line {}: corrected {} weight {}kg -> {}kg (median {}kg)",
                            row.line,
                            row.exercise_title,
                            weight,
                            corrected,
                            median
                        );
                        corrections.push(Correction {
                            line: row.line,
                            exercise: row.exercise_title.clone(),
                            original_kg: weight,
                            corrected_kg: corrected,
                        });
                        row.with_weight(corrected)
                    }
                    None => row.clone(),
                }
            })
            .collect();

        CorrectionResult { rows, corrections }
    }

    /// Corrected weight if `weight` looks like a slipped decimal.
    fn candidate(&self, weight: f64, median: f64) -> Option<f64> {
        if weight <= median * self.settings.spike_factor {
            return None;
        }

        let candidate = weight / self.settings.divisor;
        let plausible = candidate > median * self.settings.accept_low
            && candidate < median * self.settings.accept_high;

        plausible.then_some(candidate)
    }
}

/// Median of a sample. Sorts in place.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
