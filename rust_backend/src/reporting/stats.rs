use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Count, spread and quartiles of a numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` below two values
    pub std_dev: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summarize `values`, ignoring NaN. Returns `None` when nothing is left.
pub fn describe(values: &[f64]) -> Option<NumericSummary> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std_dev = (count > 1).then(|| {
        let variance = sorted
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / (count - 1) as f64;
        variance.sqrt()
    });

    Some(NumericSummary {
        count,
        mean,
        std_dev,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

/// Linear-interpolated quantile of an already sorted, non-empty slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Occurrences of each value, most frequent first, ties by value
pub fn value_counts<'a, I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        let key = value.unwrap_or(MISSING_LABEL).to_string();
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// Label used for missing categorical values
pub const MISSING_LABEL: &str = "<missing>";
