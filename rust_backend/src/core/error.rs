//! Error types for the cleaning pipeline.

use std::fmt;
use std::path::PathBuf;

use polars::prelude::PolarsError;
use serde::{Deserialize, Serialize};

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Pipeline stage, used to say where a run failed and to label diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    LocalityFilter,
    RecordFilter,
    Aggregation,
    MetricDerivation,
    OutlierFilter,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::LocalityFilter => "locality filter",
            Stage::RecordFilter => "record filter",
            Stage::Aggregation => "aggregation",
            Stage::MetricDerivation => "metric derivation",
            Stage::OutlierFilter => "outlier filter",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A counted, expected exclusion of records by a stage.
///
/// Drops are not errors: each stage handles them locally and reports how many
/// records were excluded for which reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    TransactionType,
    PropertyType,
    MissingPrice,
    MissingTransactionId,
    NonPositiveArea,
    MetricBelowRange,
    MetricAboveRange,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DropReason::TransactionType => "transaction type not selected",
            DropReason::PropertyType => "property type not selected",
            DropReason::MissingPrice => "missing price",
            DropReason::MissingTransactionId => "missing transaction id",
            DropReason::NonPositiveArea => "non-positive built area",
            DropReason::MetricBelowRange => "price per m2 below lower bound",
            DropReason::MetricAboveRange => "price per m2 above upper bound",
        };
        f.write_str(label)
    }
}

/// Error type for pipeline operations
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Schema error in {stage}: missing required column(s): {}", .missing.join(", "))]
    Schema { stage: Stage, missing: Vec<String> },

    #[error("Empty result in {stage}: no records left")]
    EmptyResult { stage: Stage },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("DataFrame error: {0}")]
    Polars(#[from] PolarsError),
}

impl PipelineError {
    /// Stage the error belongs to, when it is tied to one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Schema { stage, .. } | PipelineError::EmptyResult { stage } => {
                Some(*stage)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_names_stage_and_columns() {
        let err = PipelineError::Schema {
            stage: Stage::RecordFilter,
            missing: vec!["valeur_fonciere".to_string(), "type_local".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("record filter"));
        assert!(message.contains("valeur_fonciere, type_local"));
        assert_eq!(err.stage(), Some(Stage::RecordFilter));
    }

    #[test]
    fn empty_result_names_stage() {
        let err = PipelineError::EmptyResult {
            stage: Stage::LocalityFilter,
        };
        assert_eq!(err.to_string(), "Empty result in locality filter: no records left");
    }

    #[test]
    fn config_error_has_no_stage() {
        assert_eq!(PipelineError::Config("bad".into()).stage(), None);
    }
}
