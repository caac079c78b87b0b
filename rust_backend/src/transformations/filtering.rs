use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::domain::RawRecord;
use crate::core::error::DropReason;

/// Selection criteria for the record filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordCriteria {
    /// Only rows whose `nature_mutation` equals this value are kept
    #[serde(default = "default_transaction_type")]
    pub transaction_type: String,
    /// Only rows whose `type_local` is one of these are kept
    #[serde(default = "default_property_types")]
    pub property_types: Vec<String>,
}

fn default_transaction_type() -> String {
    "Vente".to_string()
}

fn default_property_types() -> Vec<String> {
    vec!["Maison".to_string(), "Appartement".to_string()]
}

impl Default for RecordCriteria {
    fn default() -> Self {
        Self {
            transaction_type: default_transaction_type(),
            property_types: default_property_types(),
        }
    }
}

impl RecordCriteria {
    fn matches_transaction_type(&self, record: &RawRecord) -> bool {
        record.nature_mutation.as_deref() == Some(self.transaction_type.as_str())
    }

    fn matches_property_type(&self, record: &RawRecord) -> bool {
        record
            .type_local
            .as_deref()
            .map(|t| self.property_types.iter().any(|allowed| allowed == t))
            .unwrap_or(false)
    }
}

/// Records kept by [`filter_records`] and the count dropped by each predicate
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub records: Vec<RawRecord>,
    pub dropped_transaction_type: usize,
    pub dropped_property_type: usize,
    pub dropped_missing_price: usize,
}

impl FilterOutcome {
    pub fn drops(&self) -> Vec<(DropReason, usize)> {
        vec![
            (DropReason::TransactionType, self.dropped_transaction_type),
            (DropReason::PropertyType, self.dropped_property_type),
            (DropReason::MissingPrice, self.dropped_missing_price),
        ]
    }
}

/// Keep the records that have the configured transaction type, an allowed
/// property type and a price, in their original order.
///
/// Predicates apply in that order; a record rejected by one is counted
/// against that predicate only.
pub fn filter_records(records: &[RawRecord], criteria: &RecordCriteria) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for record in records {
        if !criteria.matches_transaction_type(record) {
            outcome.dropped_transaction_type += 1;
        } else if !criteria.matches_property_type(record) {
            outcome.dropped_property_type += 1;
        } else if !record.has_price() {
            outcome.dropped_missing_price += 1;
        } else {
            outcome.records.push(record.clone());
        }
    }

    debug!(
        "After filtering '{}': {}",
        criteria.transaction_type,
        records.len() - outcome.dropped_transaction_type
    );
    debug!(
        "After filtering property types {:?}: {}",
        criteria.property_types,
        records.len() - outcome.dropped_transaction_type - outcome.dropped_property_type
    );
    debug!("After dropping missing prices: {}", outcome.records.len());

    outcome
}
