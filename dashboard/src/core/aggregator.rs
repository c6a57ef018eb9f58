//! Summary statistics over measurements
//!
//! Pure business logic for filtering readings and computing mean and sample
//! standard deviation at place and country granularity.

use serde::Serialize;

use shared::{Measurement, Threshold};
use crate::types::PlaceValues;

/// Mean and sample standard deviation of a collection of values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub mean: f64,
    /// Standard deviation with Bessel's correction (n - 1 divisor)
    pub std_dev: f64,
    pub count: usize,
}

/// Per-place means and their aggregate for one country
#[derive(Debug, Clone, PartialEq)]
pub struct CountryAverages {
    /// Mean of each place that has at least one measurement
    pub place_means: Vec<f64>,
    pub summary: Option<Summary>,
}

/// Measurements whose value is at or above the threshold, in their original order
pub fn filter_at_or_above(records: &[Measurement], threshold: Threshold) -> Vec<Measurement> {
    records
        .iter()
        .filter(|record| record.value >= threshold.value())
        .cloned()
        .collect()
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean and sample standard deviation.
///
/// Returns `None` when there are fewer than two values: the sample standard
/// deviation divides by n - 1 and is undefined for a single value.
pub fn summary_statistics(values: &[f64]) -> Option<Summary> {
    if values.len() < 2 {
        return None;
    }

    let mean = mean(values)?;
    let squared_deviations: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    let std_dev = (squared_deviations / (values.len() - 1) as f64).sqrt();

    Some(Summary {
        mean,
        std_dev,
        count: values.len(),
    })
}

/// Two-level country aggregate: the mean of each place, then the summary of those means.
///
/// Places without measurements contribute nothing.
pub fn country_averages(places: &[PlaceValues]) -> CountryAverages {
    let place_means: Vec<f64> = places
        .iter()
        .filter_map(|place| mean(&place.values))
        .collect();

    let summary = summary_statistics(&place_means);

    CountryAverages { place_means, summary }
}
