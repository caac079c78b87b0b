//! Typed records for the cleaning pipeline.
//!
//! A [`RawRecord`] is one row of the source dataset: one cadastral lot touched
//! by a sale. Several rows may share an `id_mutation` when a single sale spans
//! multiple lots (a house and its garden, for instance). The aggregator folds
//! those rows into a single [`Transaction`], and the metric deriver wraps each
//! surviving transaction into a [`PricedTransaction`] once its built area is
//! known to be positive.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the source dataset.
///
/// Every field is optional because the source file has gaps in all of them.
/// Records are read once and never mutated by the pipeline.
///
/// # Examples
///
/// ```
/// use dvf_clean::core::domain::RawRecord;
///
/// let record = RawRecord {
///     id_mutation: Some("2023-1".to_string()),
///     nature_mutation: Some("Vente".to_string()),
///     type_local: Some("Maison".to_string()),
///     valeur_fonciere: Some(300_000.0),
///     surface_reelle_bati: Some(80.0),
///     ..RawRecord::default()
/// };
/// assert!(record.has_price());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id_mutation: Option<String>,
    pub date_mutation: Option<NaiveDate>,
    pub nature_mutation: Option<String>,
    pub valeur_fonciere: Option<f64>,
    pub type_local: Option<String>,
    pub code_postal: Option<String>,
    pub nom_commune: Option<String>,
    pub surface_reelle_bati: Option<f64>,
    pub nombre_pieces_principales: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl RawRecord {
    /// Returns `true` when the sale price is present and is a number.
    pub fn has_price(&self) -> bool {
        self.valeur_fonciere.is_some_and(|p| !p.is_nan())
    }

    /// Returns the grouping key as written in the source, treating blank
    /// identifiers as missing.
    pub fn transaction_id(&self) -> Option<&str> {
        self.id_mutation
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }
}

/// One legal sale, obtained by collapsing every [`RawRecord`] that shares an
/// `id_mutation`.
///
/// Fields follow the aggregation rule set: with the default rules the built
/// area and room count are sums over the constituent rows, everything else is
/// taken from the first row of the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id_mutation: String,
    pub date_mutation: Option<NaiveDate>,
    pub valeur_fonciere: Option<f64>,
    pub type_local: Option<String>,
    pub code_postal: Option<String>,
    pub nom_commune: Option<String>,
    pub surface_reelle_bati: Option<f64>,
    pub nombre_pieces_principales: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Transaction {
    /// Built area when it is strictly positive.
    pub fn positive_area(&self) -> Option<f64> {
        self.surface_reelle_bati.filter(|area| *area > 0.0)
    }
}

/// A [`Transaction`] carrying its price per square metre.
///
/// Only constructed by the metric deriver, so `surface_reelle_bati > 0` and
/// `prix_m2 == valeur_fonciere / surface_reelle_bati` always hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedTransaction {
    pub transaction: Transaction,
    pub prix_m2: f64,
}

impl PricedTransaction {
    pub(crate) fn new(transaction: Transaction, prix_m2: f64) -> Self {
        Self {
            transaction,
            prix_m2,
        }
    }

    pub fn id(&self) -> &str {
        &self.transaction.id_mutation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_transaction_ids_are_missing() {
        let mut record = RawRecord {
            id_mutation: Some("   ".to_string()),
            ..RawRecord::default()
        };
        assert_eq!(record.transaction_id(), None);

        record.id_mutation = Some(" 2023-42 ".to_string());
        assert_eq!(record.transaction_id(), Some(" 2023-42 "));
    }

    #[test]
    fn nan_price_is_not_a_price() {
        let record = RawRecord {
            valeur_fonciere: Some(f64::NAN),
            ..RawRecord::default()
        };
        assert!(!record.has_price());
    }

    #[test]
    fn positive_area_rejects_zero_and_missing() {
        let mut transaction = Transaction {
            id_mutation: "T".to_string(),
            date_mutation: None,
            valeur_fonciere: Some(1.0),
            type_local: None,
            code_postal: None,
            nom_commune: None,
            surface_reelle_bati: Some(0.0),
            nombre_pieces_principales: None,
            latitude: None,
            longitude: None,
        };
        assert_eq!(transaction.positive_area(), None);

        transaction.surface_reelle_bati = None;
        assert_eq!(transaction.positive_area(), None);

        transaction.surface_reelle_bati = Some(12.5);
        assert_eq!(transaction.positive_area(), Some(12.5));
    }
}
