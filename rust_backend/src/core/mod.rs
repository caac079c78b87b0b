//! Core domain models for real-estate transaction cleaning.
//!
//! This module defines the record types that flow through the cleaning
//! pipeline, the source column names they are read from, and the error
//! taxonomy shared by every stage.

pub mod columns;
pub mod domain;
pub mod error;

pub use domain::{PricedTransaction, RawRecord, Transaction};
pub use error::{DropReason, PipelineError, PipelineResult, Stage};
