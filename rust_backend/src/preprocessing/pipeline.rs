use log::{info, warn};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::CleaningConfig;
use crate::core::columns;
use crate::core::domain::{PricedTransaction, RawRecord};
use crate::core::error::{DropReason, PipelineError, PipelineResult, Stage};
use crate::parsing::csv_parser;
use crate::transformations::{
    aggregate_transactions, derive_price_per_sqm, filter_records, remove_outliers,
    validate_schema,
};

/// Row counts of one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: Stage,
    pub entered: usize,
    pub survived: usize,
    /// Non-zero drop counts only
    pub drops: Vec<(DropReason, usize)>,
}

impl StageReport {
    fn new(stage: Stage, entered: usize, survived: usize, drops: Vec<(DropReason, usize)>) -> Self {
        let drops: Vec<_> = drops.into_iter().filter(|(_, count)| *count > 0).collect();
        for (reason, count) in &drops {
            warn!("{}: dropped {} ({})", stage, count, reason);
        }
        info!("{}: {} entered, {} survived", stage, entered, survived);
        Self {
            stage,
            entered,
            survived,
            drops,
        }
    }

    pub fn dropped(&self, reason: DropReason) -> usize {
        self.drops
            .iter()
            .filter(|(r, _)| *r == reason)
            .map(|(_, count)| count)
            .sum()
    }
}

/// Result of a cleaning run
#[derive(Debug, Clone)]
pub struct CleaningResult {
    pub transactions: Vec<PricedTransaction>,
    pub stages: Vec<StageReport>,
}

impl CleaningResult {
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }

    /// Serializable per-stage summary, without the transactions themselves
    pub fn summary(&self) -> CleaningSummary {
        CleaningSummary {
            input_rows: self.stages.first().map(|s| s.entered).unwrap_or(0),
            output_transactions: self.transactions.len(),
            stages: self.stages.clone(),
        }
    }
}

/// Per-stage counts of a run, written by `--summary-json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub input_rows: usize,
    pub output_transactions: usize,
    pub stages: Vec<StageReport>,
}

/// Filter → aggregate → derive → outlier-filter pipeline
pub struct CleaningPipeline {
    config: CleaningConfig,
}

impl CleaningPipeline {
    /// Create a new pipeline with default configuration
    pub fn new() -> Self {
        Self {
            config: CleaningConfig::default(),
        }
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(config: CleaningConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Clean a locality CSV file and write the result.
    ///
    /// # Arguments
    /// * `input_path` - Locality-filtered DVF CSV
    /// * `output_path` - Destination of the cleaned transactions
    ///
    /// # Returns
    /// CleaningResult with the cleaned transactions and per-stage counts
    pub fn process_file(&self, input_path: &Path, output_path: &Path) -> PipelineResult<CleaningResult> {
        info!("Loading {}...", input_path.display());
        let df = csv_parser::parse_dvf_csv(input_path)?;
        info!("Original shape: ({}, {})", df.height(), df.width());

        let result = self.process_dataframe(&df)?;

        info!("Saving to {}...", output_path.display());
        csv_parser::write_transactions_csv(&result.transactions, output_path)?;
        info!(
            "Done! Final dataset shape: ({}, {})",
            result.transactions.len(),
            columns::OUTPUT_ORDER.len()
        );
        Ok(result)
    }

    /// Check the schema, convert rows to records, then run the stages
    pub fn process_dataframe(&self, df: &DataFrame) -> PipelineResult<CleaningResult> {
        validate_schema(df, &columns::REQUIRED, Stage::RecordFilter)?;
        let records = csv_parser::dataframe_to_records(df)?;
        self.process_records(&records)
    }

    /// Run the four cleaning stages over already-typed records.
    ///
    /// Any stage that leaves no records stops the run with
    /// [`PipelineError::EmptyResult`] naming that stage.
    pub fn process_records(&self, records: &[RawRecord]) -> PipelineResult<CleaningResult> {
        let mut stages = Vec::with_capacity(4);

        let filtered = filter_records(records, &self.config.filter);
        stages.push(StageReport::new(
            Stage::RecordFilter,
            records.len(),
            filtered.records.len(),
            filtered.drops(),
        ));
        ensure_not_empty(filtered.records.len(), Stage::RecordFilter)?;

        let grouped = aggregate_transactions(&filtered.records, &self.config.aggregation);
        stages.push(StageReport::new(
            Stage::Aggregation,
            filtered.records.len(),
            grouped.transactions.len(),
            grouped.drops(),
        ));
        ensure_not_empty(grouped.transactions.len(), Stage::Aggregation)?;

        let grouped_count = grouped.transactions.len();
        let priced = derive_price_per_sqm(grouped.transactions);
        stages.push(StageReport::new(
            Stage::MetricDerivation,
            grouped_count,
            priced.transactions.len(),
            priced.drops(),
        ));
        ensure_not_empty(priced.transactions.len(), Stage::MetricDerivation)?;

        let priced_count = priced.transactions.len();
        let cleaned = remove_outliers(priced.transactions, &self.config.outliers);
        stages.push(StageReport::new(
            Stage::OutlierFilter,
            priced_count,
            cleaned.transactions.len(),
            cleaned.drops(),
        ));
        ensure_not_empty(cleaned.transactions.len(), Stage::OutlierFilter)?;

        Ok(CleaningResult {
            transactions: cleaned.transactions,
            stages,
        })
    }
}

impl Default for CleaningPipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_not_empty(count: usize, stage: Stage) -> PipelineResult<()> {
    if count == 0 {
        Err(PipelineError::EmptyResult { stage })
    } else {
        Ok(())
    }
}

/// Convenience function to clean a locality file with a given configuration
pub fn clean_file(
    input_path: &Path,
    output_path: &Path,
    config: CleaningConfig,
) -> PipelineResult<CleaningResult> {
    CleaningPipeline::with_config(config)?.process_file(input_path, output_path)
}
