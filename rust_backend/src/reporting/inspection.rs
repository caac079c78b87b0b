//! Missing-value and distribution inspection of a loaded DVF frame.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::columns;
use crate::core::error::PipelineResult;
use crate::reporting::report::Report;
use crate::reporting::stats::{describe, value_counts, NumericSummary};

/// Prices below this are flagged as suspicious
pub const LOW_PRICE_THRESHOLD: f64 = 1_000.0;
/// Prices above this are flagged as suspicious
pub const HIGH_PRICE_THRESHOLD: f64 = 10_000_000.0;

const NUMERIC_COLUMNS: [&str; 3] = [
    columns::VALEUR_FONCIERE,
    columns::SURFACE_REELLE_BATI,
    columns::SURFACE_TERRAIN,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    pub rows: usize,
    pub columns: usize,
    /// Percentage of missing values per column, highest first, zero rates omitted
    pub missing: Vec<(String, f64)>,
    pub transaction_types: Vec<(String, usize)>,
    /// Includes a bucket for missing property types
    pub property_types: Vec<(String, usize)>,
    pub numeric: Vec<(String, NumericSummary)>,
    pub unique_transactions: Option<usize>,
    pub low_prices: Option<usize>,
    pub high_prices: Option<usize>,
}

fn string_column(df: &DataFrame, name: &str) -> PipelineResult<Option<Vec<Option<String>>>> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let column = column.cast(&DataType::String)?;
    let values = column
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(Some(values))
}

pub(crate) fn float_values(df: &DataFrame, name: &str) -> PipelineResult<Option<Vec<f64>>> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let column = column.cast(&DataType::Float64)?;
    let values = column.f64()?.into_iter().flatten().collect();
    Ok(Some(values))
}

/// Inspect `df` without modifying it
pub fn inspect_dataframe(df: &DataFrame) -> PipelineResult<Inspection> {
    let rows = df.height();

    let mut missing: Vec<(String, f64)> = df
        .get_columns()
        .iter()
        .filter(|c| c.null_count() > 0)
        .map(|c| {
            let pct = c.null_count() as f64 / rows as f64 * 100.0;
            (c.name().to_string(), pct)
        })
        .collect();
    missing.sort_by(|a, b| b.1.total_cmp(&a.1));

    let transaction_types = string_column(df, columns::NATURE_MUTATION)?
        .map(|values| value_counts(values.iter().filter(|v| v.is_some()).map(|v| v.as_deref())))
        .unwrap_or_default();

    let property_types = string_column(df, columns::TYPE_LOCAL)?
        .map(|values| value_counts(values.iter().map(|v| v.as_deref())))
        .unwrap_or_default();

    let mut numeric = Vec::new();
    for name in NUMERIC_COLUMNS {
        if let Some(summary) = float_values(df, name)?.and_then(|values| describe(&values)) {
            numeric.push((name.to_string(), summary));
        }
    }

    let unique_transactions = string_column(df, columns::ID_MUTATION)?.map(|ids| {
        ids.iter()
            .flatten()
            .map(String::as_str)
            .collect::<HashSet<&str>>()
            .len()
    });

    let prices = float_values(df, columns::VALEUR_FONCIERE)?;
    let low_prices = prices
        .as_ref()
        .map(|p| p.iter().filter(|v| **v < LOW_PRICE_THRESHOLD).count());
    let high_prices = prices
        .as_ref()
        .map(|p| p.iter().filter(|v| **v > HIGH_PRICE_THRESHOLD).count());

    Ok(Inspection {
        rows,
        columns: df.width(),
        missing,
        transaction_types,
        property_types,
        numeric,
        unique_transactions,
        low_prices,
        high_prices,
    })
}

impl Inspection {
    pub fn to_report(&self, source: &str) -> Report {
        let mut report = Report::new(format!("Inspecting {}...", source));
        report
            .section("Shape")
            .line(format!("({}, {})", self.rows, self.columns));

        report.section("Missing Values (>0%)");
        for (column, pct) in &self.missing {
            report.line(format!("{}: {:.2}%", column, pct));
        }

        report.section("Nature Mutation");
        for (nature, count) in &self.transaction_types {
            report.line(format!("{}: {}", nature, count));
        }

        report.section("Type Local");
        for (kind, count) in &self.property_types {
            report.line(format!("{}: {}", kind, count));
        }

        report.section("Numeric Stats");
        for (column, summary) in &self.numeric {
            report.line(format!(
                "{}: count={} mean={:.2} std={} min={:.2} 25%={:.2} 50%={:.2} 75%={:.2} max={:.2}",
                column,
                summary.count,
                summary.mean,
                summary
                    .std_dev
                    .map(|s| format!("{:.2}", s))
                    .unwrap_or_else(|| "n/a".to_string()),
                summary.min,
                summary.q25,
                summary.median,
                summary.q75,
                summary.max,
            ));
        }

        if let Some(unique) = self.unique_transactions {
            report.section("Unique Mutations").line(unique.to_string());
        }

        if let (Some(low), Some(high)) = (self.low_prices, self.high_prices) {
            report
                .section("Price Flags")
                .line(format!("Prices < {}: {}", LOW_PRICE_THRESHOLD, low))
                .line(format!("Prices > {}: {}", HIGH_PRICE_THRESHOLD, high));
        }

        report
    }
}
