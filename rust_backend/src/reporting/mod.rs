//! Diagnostic reports over raw and cleaned DVF data.
//!
//! Nothing here changes the data it looks at. Every function hands back a
//! value or a [`Report`] and leaves the output destination to the caller.

pub mod inspection;
pub mod report;
pub mod stats;
pub mod summary;

pub use inspection::{inspect_dataframe, Inspection};
pub use report::{Report, Section};
pub use stats::{describe, value_counts, NumericSummary, MISSING_LABEL};
pub use summary::{
    cleaning_report, describe_metric, summarize_locality, LocalitySummary, PriceSummary,
};
