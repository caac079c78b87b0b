use anyhow::{Context, Result};
use log::info;
use polars::prelude::*;
use std::path::Path;

use crate::config::LocalitySettings;
use crate::core::columns;
use crate::core::error::{PipelineError, PipelineResult, Stage};
use crate::parsing::csv_parser;

/// Result of loading a DVF file
#[derive(Debug)]
pub struct DvfLoadResult {
    pub dataframe: DataFrame,
    pub num_rows: usize,
    pub num_columns: usize,
}

impl DvfLoadResult {
    pub fn new(dataframe: DataFrame) -> Self {
        let num_rows = dataframe.height();
        let num_columns = dataframe.width();
        Self {
            dataframe,
            num_rows,
            num_columns,
        }
    }
}

/// Column used to select the target municipality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalityMatch {
    /// `code_commune` equals the configured INSEE code
    CommuneCode,
    /// Upper-cased `nom_commune` equals the configured name
    CommuneName,
}

/// Unified interface for loading and saving DVF data
pub struct DvfLoader;

impl DvfLoader {
    /// Load a DVF CSV file (auto-detects by extension)
    pub fn load_from_file(path: &Path) -> Result<DvfLoadResult> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .context("File has no extension")?;

        match extension.to_lowercase().as_str() {
            "csv" => Self::load_from_csv(path),
            _ => anyhow::bail!("Unsupported file format: {}", extension),
        }
    }

    /// Load a DVF CSV file
    pub fn load_from_csv(csv_path: &Path) -> Result<DvfLoadResult> {
        let df = csv_parser::parse_dvf_csv(csv_path)
            .with_context(|| format!("Failed to parse CSV file {}", csv_path.display()))?;

        let result = DvfLoadResult::new(df);
        info!(
            "Loaded successfully: {} rows, {} columns",
            result.num_rows, result.num_columns
        );
        Ok(result)
    }

    /// Which column [`DvfLoader::extract_locality`] will match on for `df`
    pub fn locality_match(df: &DataFrame) -> PipelineResult<LocalityMatch> {
        let has = |name: &str| df.column(name).is_ok();
        if has(columns::CODE_COMMUNE) {
            Ok(LocalityMatch::CommuneCode)
        } else if has(columns::NOM_COMMUNE) {
            Ok(LocalityMatch::CommuneName)
        } else {
            Err(PipelineError::Schema {
                stage: Stage::LocalityFilter,
                missing: vec![
                    columns::CODE_COMMUNE.to_string(),
                    columns::NOM_COMMUNE.to_string(),
                ],
            })
        }
    }

    /// Keep the rows of the configured municipality.
    ///
    /// Matches on `code_commune` when present, otherwise on the upper-cased
    /// `nom_commune`. An empty result is an error rather than an empty frame.
    pub fn extract_locality(
        df: &DataFrame,
        locality: &LocalitySettings,
    ) -> PipelineResult<DataFrame> {
        let mask: BooleanChunked = match Self::locality_match(df)? {
            LocalityMatch::CommuneCode => {
                let target = locality.commune_code.trim();
                let codes = df.column(columns::CODE_COMMUNE)?.cast(&DataType::String)?;
                codes
                    .str()?
                    .into_iter()
                    .map(|code| Some(code.map(str::trim) == Some(target)))
                    .collect()
            }
            LocalityMatch::CommuneName => {
                let target = locality.commune_name.trim().to_uppercase();
                let names = df.column(columns::NOM_COMMUNE)?.cast(&DataType::String)?;
                names
                    .str()?
                    .into_iter()
                    .map(|name| {
                        let upper = name.map(|n| n.trim().to_uppercase());
                        Some(upper.as_deref() == Some(target.as_str()))
                    })
                    .collect()
            }
        };

        let local = df.filter(&mask)?;
        info!(
            "Found {} sales in {} ({})",
            local.height(),
            locality.commune_name,
            locality.commune_code
        );

        if local.height() == 0 {
            return Err(PipelineError::EmptyResult {
                stage: Stage::LocalityFilter,
            });
        }
        Ok(local)
    }

    /// Save a DataFrame unchanged to CSV
    pub fn save_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
        csv_parser::write_dataframe_csv(df, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved: {} rows to {}", df.height(), path.display());
        Ok(())
    }
}
