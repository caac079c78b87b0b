//! High-level data loading utilities.
//!
//! This module combines the CSV parser with the locality extraction that
//! turns a departmental DVF file into the single-municipality file the
//! cleaning pipeline consumes.
//!
//! # Example
//!
//! ```no_run
//! use dvf_clean::config::LocalitySettings;
//! use dvf_clean::io::loaders::DvfLoader;
//! use std::path::Path;
//!
//! let raw = DvfLoader::load_from_file(Path::new("33.csv")).expect("Failed to load");
//! let local = DvfLoader::extract_locality(&raw.dataframe, &LocalitySettings::default())
//!     .expect("Failed to filter");
//! println!("Kept {} of {} rows", local.height(), raw.num_rows);
//! ```

pub mod loaders;

#[cfg(test)]
mod loaders_tests;

pub use loaders::{DvfLoadResult, DvfLoader, LocalityMatch};
