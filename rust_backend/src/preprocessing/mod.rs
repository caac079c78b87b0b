//! End-to-end cleaning of a locality file.
//!
//! [`CleaningPipeline`] validates the input schema, converts rows to typed
//! records and runs the filter, aggregation, metric and outlier stages in
//! that order, recording how many records entered and survived each one.

pub mod pipeline;

pub use pipeline::{clean_file, CleaningPipeline, CleaningResult, CleaningSummary, StageReport};
