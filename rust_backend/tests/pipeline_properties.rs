//! Property tests for the cleaning stages.

use dvf_clean::core::domain::{PricedTransaction, RawRecord};
use dvf_clean::preprocessing::CleaningPipeline;
use dvf_clean::transformations::{
    aggregate_transactions, derive_price_per_sqm, filter_records, remove_outliers,
    AggregationRules, OutlierBounds, RecordCriteria,
};
use proptest::prelude::*;
use std::collections::HashSet;

const NATURES: [&str; 3] = ["Vente", "Échange", "Adjudication"];
const TYPES: [&str; 3] = ["Maison", "Appartement", "Dépendance"];
const IDS: [&str; 7] = ["T0", "T1", " T1", "T1 ", "T2", "T3", "   "];

fn raw_record() -> impl Strategy<Value = RawRecord> {
    (
        0usize..IDS.len(),
        0usize..NATURES.len(),
        0usize..TYPES.len(),
        proptest::option::weighted(0.9, 1_000u32..2_000_000),
        proptest::option::weighted(0.9, 0u32..300),
        proptest::option::of(0i64..8),
    )
        .prop_map(|(id, nature, kind, price, area, rooms)| RawRecord {
            id_mutation: Some(IDS[id].to_string()),
            nature_mutation: Some(NATURES[nature].to_string()),
            type_local: Some(TYPES[kind].to_string()),
            valeur_fonciere: price.map(f64::from),
            surface_reelle_bati: area.map(f64::from),
            nombre_pieces_principales: rooms,
            ..RawRecord::default()
        })
}

fn as_sale(priced: &PricedTransaction) -> RawRecord {
    let t = &priced.transaction;
    RawRecord {
        id_mutation: Some(t.id_mutation.clone()),
        date_mutation: t.date_mutation,
        nature_mutation: Some("Vente".to_string()),
        valeur_fonciere: t.valeur_fonciere,
        type_local: t.type_local.clone(),
        code_postal: t.code_postal.clone(),
        nom_commune: t.nom_commune.clone(),
        surface_reelle_bati: t.surface_reelle_bati,
        nombre_pieces_principales: t.nombre_pieces_principales,
        latitude: t.latitude,
        longitude: t.longitude,
    }
}

proptest! {
    #[test]
    fn filter_keeps_only_matching_sales(records in prop::collection::vec(raw_record(), 0..40)) {
        let criteria = RecordCriteria::default();
        let outcome = filter_records(&records, &criteria);

        for record in &outcome.records {
            prop_assert_eq!(record.nature_mutation.as_deref(), Some("Vente"));
            prop_assert!(matches!(record.type_local.as_deref(), Some("Maison" | "Appartement")));
            prop_assert!(record.has_price());
        }
        prop_assert_eq!(
            outcome.records.len()
                + outcome.dropped_transaction_type
                + outcome.dropped_property_type
                + outcome.dropped_missing_price,
            records.len()
        );
    }

    #[test]
    fn one_transaction_per_distinct_id(records in prop::collection::vec(raw_record(), 0..40)) {
        let outcome = aggregate_transactions(&records, &AggregationRules::default());

        let distinct: HashSet<&str> = records
            .iter()
            .filter_map(|r| r.id_mutation.as_deref())
            .filter(|id| !id.trim().is_empty())
            .collect();
        prop_assert_eq!(outcome.transactions.len(), distinct.len());

        let ids: HashSet<&str> = outcome.transactions.iter().map(|t| t.id_mutation.as_str()).collect();
        prop_assert_eq!(ids, distinct);
    }

    #[test]
    fn area_is_summed_and_price_taken_first(records in prop::collection::vec(raw_record(), 1..40)) {
        let outcome = aggregate_transactions(&records, &AggregationRules::default());

        for transaction in &outcome.transactions {
            let group: Vec<&RawRecord> = records
                .iter()
                .filter(|r| r.id_mutation.as_deref() == Some(transaction.id_mutation.as_str()))
                .collect();

            let area: f64 = group.iter().filter_map(|r| r.surface_reelle_bati).sum();
            prop_assert_eq!(transaction.surface_reelle_bati, Some(area));

            let rooms: i64 = group.iter().filter_map(|r| r.nombre_pieces_principales).sum();
            prop_assert_eq!(transaction.nombre_pieces_principales, Some(rooms));

            prop_assert_eq!(transaction.valeur_fonciere, group[0].valeur_fonciere);
            prop_assert_eq!(&transaction.type_local, &group[0].type_local);
        }
    }

    #[test]
    fn metric_is_price_over_area(records in prop::collection::vec(raw_record(), 0..40)) {
        let grouped = aggregate_transactions(&records, &AggregationRules::default());
        let priced = derive_price_per_sqm(grouped.transactions);

        for p in &priced.transactions {
            let area = p.transaction.surface_reelle_bati.unwrap();
            let price = p.transaction.valeur_fonciere.unwrap();
            prop_assert!(area > 0.0);
            prop_assert_eq!(p.prix_m2, price / area);
        }
    }

    #[test]
    fn survivors_are_strictly_within_bounds(
        records in prop::collection::vec(raw_record(), 0..40),
        lower in 100.0f64..2_000.0,
        width in 1.0f64..20_000.0,
    ) {
        let bounds = OutlierBounds::new(lower, lower + width).unwrap();
        let grouped = aggregate_transactions(&records, &AggregationRules::default());
        let priced = derive_price_per_sqm(grouped.transactions);
        let before = priced.transactions.len();
        let outcome = remove_outliers(priced.transactions, &bounds);

        for p in &outcome.transactions {
            prop_assert!(p.prix_m2 > bounds.lower && p.prix_m2 < bounds.upper);
        }
        prop_assert_eq!(outcome.transactions.len() + outcome.removed(), before);
    }

    #[test]
    fn cleaning_is_idempotent(records in prop::collection::vec(raw_record(), 1..40)) {
        let pipeline = CleaningPipeline::new();
        if let Ok(first) = pipeline.process_records(&records) {
            let again: Vec<RawRecord> = first.transactions.iter().map(as_sale).collect();
            let second = pipeline.process_records(&again).unwrap();
            prop_assert_eq!(second.transactions, first.transactions);
        }
    }
}
