use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::domain::PricedTransaction;
use crate::core::error::{DropReason, PipelineError, PipelineResult};

/// Plausible range of the price per square metre, both ends exclusive.
///
/// The defaults encode a market judgment for residential sales: anything at or
/// below 500 or at or above 15,000 per square metre is treated as a data-entry
/// error or an atypical sale such as a partial-ownership transfer.
///
/// # Examples
///
/// ```
/// use dvf_clean::transformations::outliers::OutlierBounds;
///
/// let bounds = OutlierBounds::default();
/// assert!(bounds.contains(3000.0));
/// assert!(!bounds.contains(500.0));
/// assert!(!bounds.contains(15_000.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierBounds {
    #[serde(default = "default_lower")]
    pub lower: f64,
    #[serde(default = "default_upper")]
    pub upper: f64,
}

fn default_lower() -> f64 {
    500.0
}

fn default_upper() -> f64 {
    15_000.0
}

impl Default for OutlierBounds {
    fn default() -> Self {
        Self {
            lower: default_lower(),
            upper: default_upper(),
        }
    }
}

impl OutlierBounds {
    pub fn new(lower: f64, upper: f64) -> PipelineResult<Self> {
        let bounds = Self { lower, upper };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() {
            return Err(PipelineError::Config(format!(
                "outlier bounds must be finite, got ({}, {})",
                self.lower, self.upper
            )));
        }
        if self.lower >= self.upper {
            return Err(PipelineError::Config(format!(
                "outlier lower bound {} must be below upper bound {}",
                self.lower, self.upper
            )));
        }
        Ok(())
    }

    pub fn contains(&self, value: f64) -> bool {
        value > self.lower && value < self.upper
    }
}

/// Transactions kept by [`remove_outliers`]
#[derive(Debug, Clone, Default)]
pub struct OutlierOutcome {
    pub transactions: Vec<PricedTransaction>,
    pub dropped_below: usize,
    pub dropped_above: usize,
}

impl OutlierOutcome {
    pub fn removed(&self) -> usize {
        self.dropped_below + self.dropped_above
    }

    pub fn drops(&self) -> Vec<(DropReason, usize)> {
        vec![
            (DropReason::MetricBelowRange, self.dropped_below),
            (DropReason::MetricAboveRange, self.dropped_above),
        ]
    }
}

/// Keep the transactions whose `prix_m2` lies strictly inside `bounds`
pub fn remove_outliers(
    transactions: Vec<PricedTransaction>,
    bounds: &OutlierBounds,
) -> OutlierOutcome {
    info!(
        "Price/m2 constraints: {} < p < {}",
        bounds.lower, bounds.upper
    );

    let mut outcome = OutlierOutcome::default();
    for transaction in transactions {
        if bounds.contains(transaction.prix_m2) {
            outcome.transactions.push(transaction);
        } else if transaction.prix_m2 <= bounds.lower {
            outcome.dropped_below += 1;
        } else {
            outcome.dropped_above += 1;
        }
    }

    debug!("Removed {} outliers", outcome.removed());
    outcome
}
