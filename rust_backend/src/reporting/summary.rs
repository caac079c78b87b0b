//! Locality and cleaning-run summaries.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::columns;
use crate::core::domain::PricedTransaction;
use crate::core::error::PipelineResult;
use crate::parsing::csv_parser::DATE_FORMAT;
use crate::preprocessing::CleaningResult;
use crate::reporting::report::Report;
use crate::reporting::stats::{describe, value_counts, NumericSummary};

/// Number of transaction types listed in a locality summary
pub const TOP_TRANSACTION_TYPES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalitySummary {
    pub rows: usize,
    pub price: Option<PriceSummary>,
    pub property_types: Vec<(String, usize)>,
    pub transaction_types: Vec<(String, usize)>,
    /// Sale count per year, oldest first
    pub years: Vec<(i32, usize)>,
}

fn price_summary(df: &DataFrame) -> PipelineResult<Option<PriceSummary>> {
    let Ok(column) = df.column(columns::VALEUR_FONCIERE) else {
        return Ok(None);
    };
    let column = column.cast(&DataType::Float64)?;
    let prices = column.f64()?;

    let summary = match (prices.mean(), prices.median(), prices.min(), prices.max()) {
        (Some(mean), Some(median), Some(min), Some(max)) => Some(PriceSummary {
            mean,
            median,
            min,
            max,
        }),
        _ => None,
    };
    Ok(summary)
}

fn text_counts(df: &DataFrame, name: &str) -> PipelineResult<Vec<(String, usize)>> {
    let Ok(column) = df.column(name) else {
        return Ok(Vec::new());
    };
    let column = column.cast(&DataType::String)?;
    Ok(value_counts(column.str()?.into_iter().filter(|v| v.is_some())))
}

fn year_counts(df: &DataFrame) -> PipelineResult<Vec<(i32, usize)>> {
    let Ok(column) = df.column(columns::DATE_MUTATION) else {
        return Ok(Vec::new());
    };
    let column = column.cast(&DataType::String)?;

    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    for raw in column.str()?.into_iter().flatten() {
        let raw = raw.trim();
        let date_part = raw.get(..10).unwrap_or(raw);
        if let Ok(date) = NaiveDate::parse_from_str(date_part, DATE_FORMAT) {
            *years.entry(date.year()).or_insert(0) += 1;
        }
    }
    Ok(years.into_iter().collect())
}

/// Summarize an extracted locality frame
pub fn summarize_locality(df: &DataFrame) -> PipelineResult<LocalitySummary> {
    let mut transaction_types = text_counts(df, columns::NATURE_MUTATION)?;
    transaction_types.truncate(TOP_TRANSACTION_TYPES);

    Ok(LocalitySummary {
        rows: df.height(),
        price: price_summary(df)?,
        property_types: text_counts(df, columns::TYPE_LOCAL)?,
        transaction_types,
        years: year_counts(df)?,
    })
}

/// Descriptive statistics of the price-per-square-metre column
pub fn describe_metric(transactions: &[PricedTransaction]) -> Option<NumericSummary> {
    let values: Vec<f64> = transactions.iter().map(|t| t.prix_m2).collect();
    describe(&values)
}

/// Format with a comma every three digits, no decimals
fn thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, digit) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if value < 0.0 && rounded != "0" {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

impl LocalitySummary {
    pub fn to_report(&self, locality: &str) -> Report {
        let mut report = Report::new(format!("{} Analysis", locality));
        report
            .section("Rows")
            .line(self.rows.to_string());

        if let Some(price) = &self.price {
            report
                .section("Price Stats")
                .line(format!("Mean: {} €", thousands(price.mean)))
                .line(format!("Median: {} €", thousands(price.median)))
                .line(format!("Min: {} €", thousands(price.min)))
                .line(format!("Max: {} €", thousands(price.max)));
        }

        report.section("Property Types");
        for (kind, count) in &self.property_types {
            report.line(format!("{}: {}", kind, count));
        }

        report.section("Top Transaction Types");
        for (nature, count) in &self.transaction_types {
            report.line(format!("{}: {}", nature, count));
        }

        report.section("Transactions per Year");
        for (year, count) in &self.years {
            report.line(format!("{}: {}", year, count));
        }

        report
    }
}

/// Per-stage counts of a run followed by the final metric distribution
pub fn cleaning_report(result: &CleaningResult) -> Report {
    let mut report = Report::new("Cleaning Summary");

    for stage in &result.stages {
        report
            .section(capitalize(stage.stage.as_str()))
            .line(format!("entered: {}", stage.entered))
            .line(format!("survived: {}", stage.survived));
        for (reason, count) in &stage.drops {
            report.line(format!("dropped ({}): {}", reason, count));
        }
    }

    if let Some(metric) = describe_metric(&result.transactions) {
        report
            .section("Prix m2 Stats")
            .line(format!("count: {}", metric.count))
            .line(format!("mean: {:.2}", metric.mean))
            .line(format!("min: {:.2}", metric.min))
            .line(format!("25%: {:.2}", metric.q25))
            .line(format!("50%: {:.2}", metric.median))
            .line(format!("75%: {:.2}", metric.q75))
            .line(format!("max: {:.2}", metric.max));
    }

    report
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
