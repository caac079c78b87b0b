//! Cleaning configuration file support.
//!
//! This module reads the pipeline configuration from a TOML file. Every
//! section is optional; missing keys take the documented defaults.
//!
//! ```toml
//! [locality]
//! commune_code = "33063"
//! commune_name = "BORDEAUX"
//!
//! [filter]
//! transaction_type = "Vente"
//! property_types = ["Maison", "Appartement"]
//!
//! [outliers]
//! lower = 500.0
//! upper = 15000.0
//!
//! [aggregation]
//! surface_reelle_bati = "sum"
//! valeur_fonciere = "take-first"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{PipelineError, PipelineResult};
use crate::transformations::{AggregationRules, OutlierBounds, RecordCriteria};

/// Name of the configuration file looked up by [`CleaningConfig::from_default_location`]
pub const DEFAULT_CONFIG_FILE: &str = "dvf-clean.toml";

/// Full pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleaningConfig {
    #[serde(default)]
    pub locality: LocalitySettings,
    #[serde(default)]
    pub filter: RecordCriteria,
    #[serde(default)]
    pub outliers: OutlierBounds,
    #[serde(default)]
    pub aggregation: AggregationRules,
}

/// Target municipality of the extraction step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalitySettings {
    /// INSEE code compared against `code_commune`
    #[serde(default = "default_commune_code")]
    pub commune_code: String,
    /// Upper-case name compared against `nom_commune` when there is no code column
    #[serde(default = "default_commune_name")]
    pub commune_name: String,
}

fn default_commune_code() -> String {
    "33063".to_string()
}

fn default_commune_name() -> String {
    "BORDEAUX".to_string()
}

impl Default for LocalitySettings {
    fn default() -> Self {
        Self {
            commune_code: default_commune_code(),
            commune_name: default_commune_name(),
        }
    }
}

impl CleaningConfig {
    /// Load configuration from a TOML file and validate it.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(CleaningConfig)` if the file parses and passes [`CleaningConfig::validate`]
    /// * `Err(PipelineError::Io)` if the file cannot be read
    /// * `Err(PipelineError::Config)` if it cannot be parsed or is invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> PipelineResult<Self> {
        let deserializer = toml::Deserializer::new(content);
        let config: CleaningConfig =
            serde_path_to_error::deserialize(deserializer).map_err(|e| {
                PipelineError::Config(format!(
                    "Failed to parse config at '{}': {}",
                    e.path(),
                    e.inner()
                ))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `dvf-clean.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    ///
    /// Falls back to the built-in defaults when no file is found.
    pub fn from_default_location() -> PipelineResult<Self> {
        match Self::find_default_file() {
            Some(path) => {
                log::info!("Loading cleaning config from {}", path.display());
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    fn find_default_file() -> Option<PathBuf> {
        [
            PathBuf::from(DEFAULT_CONFIG_FILE),
            PathBuf::from("rust_backend").join(DEFAULT_CONFIG_FILE),
        ]
        .into_iter()
        .find(|candidate| candidate.is_file())
    }

    /// Check the values that the type system cannot.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.filter.transaction_type.trim().is_empty() {
            return Err(PipelineError::Config(
                "filter.transaction_type must not be empty".to_string(),
            ));
        }
        if self.filter.property_types.is_empty() {
            return Err(PipelineError::Config(
                "filter.property_types must list at least one property type".to_string(),
            ));
        }
        if self.locality.commune_code.trim().is_empty()
            && self.locality.commune_name.trim().is_empty()
        {
            return Err(PipelineError::Config(
                "locality needs a commune_code or a commune_name".to_string(),
            ));
        }
        self.outliers.validate()
    }
}
