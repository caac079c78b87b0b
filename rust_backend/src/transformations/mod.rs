//! Cleaning stages for DVF transaction records.
//!
//! Each stage is a pure function from one record collection to a fresh one,
//! returning the kept records together with per-reason drop counts.
//!
//! # Modules
//!
//! - [`cleaning`]: Schema checks on the loaded DataFrame
//! - [`filtering`]: Keep sales of houses and apartments that have a price
//! - [`aggregation`]: Collapse multi-lot sales into one transaction
//! - [`metrics`]: Derive the price per square metre
//! - [`outliers`]: Drop implausible prices per square metre
//!
//! # Example
//!
//! ```
//! use dvf_clean::core::domain::RawRecord;
//! use dvf_clean::transformations::{
//!     aggregate_transactions, derive_price_per_sqm, filter_records, remove_outliers,
//!     AggregationRules, OutlierBounds, RecordCriteria,
//! };
//!
//! let lot = |area: f64| RawRecord {
//!     id_mutation: Some("T1".to_string()),
//!     nature_mutation: Some("Vente".to_string()),
//!     type_local: Some("Maison".to_string()),
//!     valeur_fonciere: Some(300_000.0),
//!     surface_reelle_bati: Some(area),
//!     ..RawRecord::default()
//! };
//!
//! let filtered = filter_records(&[lot(80.0), lot(20.0)], &RecordCriteria::default());
//! let grouped = aggregate_transactions(&filtered.records, &AggregationRules::default());
//! let priced = derive_price_per_sqm(grouped.transactions);
//! let cleaned = remove_outliers(priced.transactions, &OutlierBounds::default());
//!
//! assert_eq!(cleaned.transactions[0].prix_m2, 3000.0);
//! ```

pub mod aggregation;
pub mod cleaning;
pub mod filtering;
pub mod metrics;
pub mod outliers;

pub use aggregation::{
    aggregate_transactions, AggregationOutcome, AggregationPolicy, AggregationRules,
    TransactionField,
};
pub use cleaning::{missing_columns, validate_schema};
pub use filtering::{filter_records, FilterOutcome, RecordCriteria};
pub use metrics::{derive_price_per_sqm, DerivationOutcome};
pub use outliers::{remove_outliers, OutlierBounds, OutlierOutcome};
