//! DVF cleaning pipeline.
//!
//! Turns the French open "Demandes de Valeurs Foncières" land-value exports
//! into one row per sale with a price per square metre, ready for analysis.
//!
//! The work happens in four stages run by
//! [`preprocessing::CleaningPipeline`]: record filter, transaction
//! aggregation, metric derivation and outlier filter. [`io`] extracts a
//! single municipality from a departmental file beforehand and [`reporting`]
//! describes the data at any point without changing it.

pub mod config;
pub mod core;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod reporting;
pub mod transformations;

pub use crate::config::CleaningConfig;
pub use crate::core::error::{PipelineError, PipelineResult, Stage};
pub use crate::preprocessing::{clean_file, CleaningPipeline, CleaningResult};
