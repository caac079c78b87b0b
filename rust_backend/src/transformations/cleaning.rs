use polars::prelude::*;

use crate::core::error::{PipelineError, PipelineResult, Stage};

/// Names from `required` that are not columns of `df`
pub fn missing_columns(df: &DataFrame, required: &[&str]) -> Vec<String> {
    let present: Vec<&str> = df
        .get_column_names()
        .iter()
        .map(|name| name.as_str())
        .collect();

    required
        .iter()
        .filter(|col| !present.contains(*col))
        .map(|col| col.to_string())
        .collect()
}

/// Fail with a schema error naming `stage` if any required column is absent
pub fn validate_schema(df: &DataFrame, required: &[&str], stage: Stage) -> PipelineResult<()> {
    let missing = missing_columns(df, required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::Schema { stage, missing })
    }
}
