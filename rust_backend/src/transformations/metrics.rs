use log::debug;

use crate::core::domain::{PricedTransaction, Transaction};
use crate::core::error::DropReason;

/// Transactions carrying a price per square metre
#[derive(Debug, Clone, Default)]
pub struct DerivationOutcome {
    pub transactions: Vec<PricedTransaction>,
    pub dropped_non_positive_area: usize,
    pub dropped_missing_price: usize,
}

impl DerivationOutcome {
    pub fn drops(&self) -> Vec<(DropReason, usize)> {
        vec![
            (DropReason::NonPositiveArea, self.dropped_non_positive_area),
            (DropReason::MissingPrice, self.dropped_missing_price),
        ]
    }
}

/// Compute `prix_m2 = valeur_fonciere / surface_reelle_bati`.
///
/// Transactions whose built area is zero, negative or missing are discarded
/// before any division takes place, so every returned metric is finite for a
/// finite price.
pub fn derive_price_per_sqm(transactions: Vec<Transaction>) -> DerivationOutcome {
    let mut outcome = DerivationOutcome::default();

    for transaction in transactions {
        let Some(area) = transaction.positive_area() else {
            outcome.dropped_non_positive_area += 1;
            continue;
        };
        let Some(price) = transaction.valeur_fonciere.filter(|p| !p.is_nan()) else {
            outcome.dropped_missing_price += 1;
            continue;
        };

        outcome
            .transactions
            .push(PricedTransaction::new(transaction, price / area));
    }

    if outcome.dropped_non_positive_area > 0 {
        debug!(
            "Removed {} transactions with non-positive built area",
            outcome.dropped_non_positive_area
        );
    }
    if outcome.dropped_missing_price > 0 {
        debug!(
            "Removed {} transactions without a price",
            outcome.dropped_missing_price
        );
    }
    debug!(
        "Calculated price per m2: {}",
        outcome.transactions.len()
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(id: &str, price: Option<f64>, area: Option<f64>) -> Transaction {
        Transaction {
            id_mutation: id.to_string(),
            date_mutation: None,
            valeur_fonciere: price,
            type_local: Some("Maison".to_string()),
            code_postal: None,
            nom_commune: None,
            surface_reelle_bati: area,
            nombre_pieces_principales: None,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn test_metric_is_price_over_area() {
        let outcome = derive_price_per_sqm(vec![transaction("T1", Some(300_000.0), Some(100.0))]);
        assert_eq!(outcome.transactions.len(), 1);
        assert_eq!(outcome.transactions[0].prix_m2, 3000.0);
        assert_eq!(outcome.transactions[0].id(), "T1");
    }

    #[test]
    fn test_zero_area_is_dropped_before_division() {
        let outcome = derive_price_per_sqm(vec![
            transaction("T4", Some(200_000.0), Some(0.0)),
            transaction("neg", Some(200_000.0), Some(-3.0)),
            transaction("none", Some(200_000.0), None),
        ]);
        assert!(outcome.transactions.is_empty());
        assert_eq!(outcome.dropped_non_positive_area, 3);
        assert_eq!(outcome.dropped_missing_price, 0);
    }

    #[test]
    fn test_missing_price_is_dropped() {
        let outcome = derive_price_per_sqm(vec![transaction("T", None, Some(10.0))]);
        assert!(outcome.transactions.is_empty());
        assert_eq!(outcome.dropped_missing_price, 1);
    }

    #[test]
    fn test_order_is_preserved() {
        let outcome = derive_price_per_sqm(vec![
            transaction("b", Some(10.0), Some(1.0)),
            transaction("a", Some(10.0), Some(0.0)),
            transaction("c", Some(10.0), Some(2.0)),
        ]);
        let ids: Vec<_> = outcome.transactions.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }
}
