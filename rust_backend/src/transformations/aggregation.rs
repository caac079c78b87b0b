//! Collapse the rows of one sale into a single transaction.
//!
//! The source file has one row per cadastral lot, so a sale of a house with a
//! separate garden lot appears twice. Price, date and the categorical columns
//! are repeated identically on every row of the sale, while the built area and
//! the room count are split across them. Each output field is therefore reduced
//! by an explicit [`AggregationPolicy`] looked up in [`AggregationRules`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::columns;
use crate::core::domain::{RawRecord, Transaction};
use crate::core::error::{DropReason, PipelineError, PipelineResult};

/// How the values of one field are reduced across the rows of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationPolicy {
    /// Value of the first row of the group, in input order.
    ///
    /// A missing value on that row stays missing: later rows are not
    /// consulted, unlike a first-non-null reduction.
    TakeFirst,
    /// Arithmetic sum over the group; missing values count as zero
    Sum,
}

impl fmt::Display for AggregationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationPolicy::TakeFirst => f.write_str("take-first"),
            AggregationPolicy::Sum => f.write_str("sum"),
        }
    }
}

/// Transaction fields that carry an aggregation policy.
///
/// Serialized under the source column name so that a TOML `[aggregation]`
/// table reads like the input header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransactionField {
    #[serde(rename = "date_mutation")]
    SaleDate,
    #[serde(rename = "valeur_fonciere")]
    Price,
    #[serde(rename = "type_local")]
    PropertyType,
    #[serde(rename = "code_postal")]
    PostalCode,
    #[serde(rename = "nom_commune")]
    Municipality,
    #[serde(rename = "surface_reelle_bati")]
    BuiltArea,
    #[serde(rename = "nombre_pieces_principales")]
    Rooms,
    #[serde(rename = "latitude")]
    Latitude,
    #[serde(rename = "longitude")]
    Longitude,
}

impl TransactionField {
    pub const ALL: [TransactionField; 9] = [
        TransactionField::SaleDate,
        TransactionField::Price,
        TransactionField::PropertyType,
        TransactionField::PostalCode,
        TransactionField::Municipality,
        TransactionField::BuiltArea,
        TransactionField::Rooms,
        TransactionField::Latitude,
        TransactionField::Longitude,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            TransactionField::SaleDate => columns::DATE_MUTATION,
            TransactionField::Price => columns::VALEUR_FONCIERE,
            TransactionField::PropertyType => columns::TYPE_LOCAL,
            TransactionField::PostalCode => columns::CODE_POSTAL,
            TransactionField::Municipality => columns::NOM_COMMUNE,
            TransactionField::BuiltArea => columns::SURFACE_REELLE_BATI,
            TransactionField::Rooms => columns::NOMBRE_PIECES_PRINCIPALES,
            TransactionField::Latitude => columns::LATITUDE,
            TransactionField::Longitude => columns::LONGITUDE,
        }
    }

    /// Whether `sum` is meaningful for this field
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TransactionField::Price
                | TransactionField::BuiltArea
                | TransactionField::Rooms
                | TransactionField::Latitude
                | TransactionField::Longitude
        )
    }

    /// Policy used when the rule set does not override it
    pub fn default_policy(&self) -> AggregationPolicy {
        match self {
            TransactionField::BuiltArea | TransactionField::Rooms => AggregationPolicy::Sum,
            _ => AggregationPolicy::TakeFirst,
        }
    }
}

/// Per-field aggregation policies.
///
/// Fields without an explicit entry use [`TransactionField::default_policy`].
/// A rule set can never hold `sum` for a non-numeric field: construction
/// through [`AggregationRules::with_policy`] or deserialization rejects it.
///
/// # Examples
///
/// ```
/// use dvf_clean::transformations::aggregation::{
///     AggregationPolicy, AggregationRules, TransactionField,
/// };
///
/// let rules = AggregationRules::default();
/// assert_eq!(rules.policy(TransactionField::Price), AggregationPolicy::TakeFirst);
/// assert_eq!(rules.policy(TransactionField::BuiltArea), AggregationPolicy::Sum);
///
/// assert!(rules
///     .clone()
///     .with_policy(TransactionField::PropertyType, AggregationPolicy::Sum)
///     .is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<TransactionField, AggregationPolicy>",
    into = "BTreeMap<TransactionField, AggregationPolicy>"
)]
pub struct AggregationRules {
    overrides: BTreeMap<TransactionField, AggregationPolicy>,
}

impl AggregationRules {
    pub fn policy(&self, field: TransactionField) -> AggregationPolicy {
        self.overrides
            .get(&field)
            .copied()
            .unwrap_or_else(|| field.default_policy())
    }

    /// Return a copy of the rule set with `field` reduced by `policy`
    pub fn with_policy(
        mut self,
        field: TransactionField,
        policy: AggregationPolicy,
    ) -> PipelineResult<Self> {
        check_policy(field, policy).map_err(PipelineError::Config)?;
        self.overrides.insert(field, policy);
        Ok(self)
    }

    /// Effective policy of every field, in output order
    pub fn effective(&self) -> Vec<(TransactionField, AggregationPolicy)> {
        TransactionField::ALL
            .iter()
            .map(|field| (*field, self.policy(*field)))
            .collect()
    }
}

fn check_policy(field: TransactionField, policy: AggregationPolicy) -> Result<(), String> {
    if policy == AggregationPolicy::Sum && !field.is_numeric() {
        return Err(format!(
            "aggregation policy 'sum' is not allowed for non-numeric field '{}'",
            field.column()
        ));
    }
    Ok(())
}

impl TryFrom<BTreeMap<TransactionField, AggregationPolicy>> for AggregationRules {
    type Error = String;

    fn try_from(map: BTreeMap<TransactionField, AggregationPolicy>) -> Result<Self, Self::Error> {
        for (field, policy) in &map {
            check_policy(*field, *policy)?;
        }
        Ok(Self { overrides: map })
    }
}

impl From<AggregationRules> for BTreeMap<TransactionField, AggregationPolicy> {
    fn from(rules: AggregationRules) -> Self {
        rules.effective().into_iter().collect()
    }
}

/// Transactions built by [`aggregate_transactions`]
#[derive(Debug, Clone, Default)]
pub struct AggregationOutcome {
    pub transactions: Vec<Transaction>,
    /// Rows without a usable `id_mutation`, excluded before grouping
    pub dropped_missing_id: usize,
}

impl AggregationOutcome {
    pub fn drops(&self) -> Vec<(DropReason, usize)> {
        vec![(DropReason::MissingTransactionId, self.dropped_missing_id)]
    }
}

/// Group rows by `id_mutation` and reduce each group to one [`Transaction`].
///
/// Groups come out in the order their first row appears in `records`. Rows
/// whose identifier is missing or blank are dropped and counted rather than
/// gathered into a group of their own.
pub fn aggregate_transactions(records: &[RawRecord], rules: &AggregationRules) -> AggregationOutcome {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&RawRecord>)> = Vec::new();
    let mut dropped_missing_id = 0;

    for record in records {
        let Some(id) = record.transaction_id() else {
            dropped_missing_id += 1;
            continue;
        };

        match index.get(id) {
            Some(&position) => groups[position].1.push(record),
            None => {
                index.insert(id, groups.len());
                groups.push((id, vec![record]));
            }
        }
    }

    if dropped_missing_id > 0 {
        debug!("Dropped {} rows without a transaction id", dropped_missing_id);
    }

    let transactions: Vec<Transaction> = groups
        .iter()
        .map(|(id, group)| reduce_group(id, group, rules))
        .collect();

    debug!("Grouped into unique transactions: {}", transactions.len());

    AggregationOutcome {
        transactions,
        dropped_missing_id,
    }
}

fn reduce_group(id: &str, group: &[&RawRecord], rules: &AggregationRules) -> Transaction {
    let first = group[0];

    Transaction {
        id_mutation: id.to_string(),
        date_mutation: first.date_mutation,
        type_local: first.type_local.clone(),
        code_postal: first.code_postal.clone(),
        nom_commune: first.nom_commune.clone(),
        valeur_fonciere: reduce_f64(group, rules.policy(TransactionField::Price), |r| {
            r.valeur_fonciere
        }),
        surface_reelle_bati: reduce_f64(group, rules.policy(TransactionField::BuiltArea), |r| {
            r.surface_reelle_bati
        }),
        nombre_pieces_principales: reduce_i64(group, rules.policy(TransactionField::Rooms), |r| {
            r.nombre_pieces_principales
        }),
        latitude: reduce_f64(group, rules.policy(TransactionField::Latitude), |r| r.latitude),
        longitude: reduce_f64(group, rules.policy(TransactionField::Longitude), |r| r.longitude),
    }
}

fn reduce_f64(
    group: &[&RawRecord],
    policy: AggregationPolicy,
    value: impl Fn(&RawRecord) -> Option<f64>,
) -> Option<f64> {
    match policy {
        AggregationPolicy::TakeFirst => value(group[0]),
        AggregationPolicy::Sum => Some(
            group
                .iter()
                .filter_map(|r| value(r))
                .filter(|v| !v.is_nan())
                .sum(),
        ),
    }
}

fn reduce_i64(
    group: &[&RawRecord],
    policy: AggregationPolicy,
    value: impl Fn(&RawRecord) -> Option<i64>,
) -> Option<i64> {
    match policy {
        AggregationPolicy::TakeFirst => value(group[0]),
        AggregationPolicy::Sum => Some(
            group
                .iter()
                .filter_map(|r| value(r))
                .fold(0i64, i64::saturating_add),
        ),
    }
}
