use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

use crate::core::columns;
use crate::core::domain::{PricedTransaction, RawRecord};
use crate::core::error::{PipelineError, PipelineResult};

/// Date format of `date_mutation`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Columns read as strings whatever their inferred type
const STRING_COLUMNS: [&str; 7] = [
    columns::ID_MUTATION,
    columns::DATE_MUTATION,
    columns::NATURE_MUTATION,
    columns::TYPE_LOCAL,
    columns::CODE_POSTAL,
    columns::CODE_COMMUNE,
    columns::NOM_COMMUNE,
];

/// Numeric columns that should be Float64 (may be inferred as i64 if no decimal point)
const FLOAT_COLUMNS: [&str; 5] = [
    columns::VALEUR_FONCIERE,
    columns::SURFACE_REELLE_BATI,
    columns::SURFACE_TERRAIN,
    columns::LATITUDE,
    columns::LONGITUDE,
];

/// Parse a DVF CSV file into a Polars DataFrame
pub fn parse_dvf_csv(csv_path: &Path) -> PipelineResult<DataFrame> {
    if !csv_path.is_file() {
        return Err(PipelineError::Io {
            path: csv_path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
    }

    // Scan the whole file: commune codes such as "2A004" only show up far
    // into the departmental files.
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(csv_path.into()))?
        .finish()?;

    normalize_types(df)
}

/// Cast columns to the types the cleaning stages expect
pub fn normalize_types(df: DataFrame) -> PipelineResult<DataFrame> {
    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let has = |name: &str| column_names.iter().any(|c| c == name);

    let mut lazy_df = df.lazy();

    for col_name in STRING_COLUMNS {
        if has(col_name) {
            lazy_df = lazy_df.with_column(col(col_name).cast(DataType::String));
        }
    }

    for col_name in FLOAT_COLUMNS {
        if has(col_name) {
            lazy_df = lazy_df.with_column(col(col_name).cast(DataType::Float64));
        }
    }

    if has(columns::NOMBRE_PIECES_PRINCIPALES) {
        lazy_df = lazy_df.with_column(col(columns::NOMBRE_PIECES_PRINCIPALES).cast(DataType::Int64));
    }

    Ok(lazy_df.collect()?)
}

fn parse_date(raw: &str, row: usize) -> Option<NaiveDate> {
    // Some exports carry a time component; only the date part matters.
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    match NaiveDate::parse_from_str(date_part, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            debug!("Unparseable date_mutation '{}' at row {}: {}", raw, row, e);
            None
        }
    }
}

/// Convert a normalized DataFrame to [`RawRecord`]s.
///
/// Optional columns that are absent produce `None` fields. Required columns
/// are checked by the caller before conversion.
pub fn dataframe_to_records(df: &DataFrame) -> PipelineResult<Vec<RawRecord>> {
    let str_col = |name: &str| df.column(name).ok().and_then(|c| c.str().ok());
    let f64_col = |name: &str| df.column(name).ok().and_then(|c| c.f64().ok());

    let ids = str_col(columns::ID_MUTATION);
    let dates = str_col(columns::DATE_MUTATION);
    let natures = str_col(columns::NATURE_MUTATION);
    let types = str_col(columns::TYPE_LOCAL);
    let postal_codes = str_col(columns::CODE_POSTAL);
    let communes = str_col(columns::NOM_COMMUNE);
    let prices = f64_col(columns::VALEUR_FONCIERE);
    let areas = f64_col(columns::SURFACE_REELLE_BATI);
    let latitudes = f64_col(columns::LATITUDE);
    let longitudes = f64_col(columns::LONGITUDE);
    let rooms = df
        .column(columns::NOMBRE_PIECES_PRINCIPALES)
        .ok()
        .and_then(|c| c.i64().ok());

    let text = |ca: Option<&StringChunked>, i: usize| {
        ca.and_then(|col| col.get(i)).map(|s| s.to_string())
    };
    let number = |ca: Option<&Float64Chunked>, i: usize| ca.and_then(|col| col.get(i));

    let records = (0..df.height())
        .map(|i| RawRecord {
            id_mutation: text(ids, i),
            date_mutation: dates
                .and_then(|col| col.get(i))
                .and_then(|raw| parse_date(raw, i)),
            nature_mutation: text(natures, i),
            valeur_fonciere: number(prices, i),
            type_local: text(types, i),
            code_postal: text(postal_codes, i),
            nom_commune: text(communes, i),
            surface_reelle_bati: number(areas, i),
            nombre_pieces_principales: rooms.and_then(|col| col.get(i)),
            latitude: number(latitudes, i),
            longitude: number(longitudes, i),
        })
        .collect();

    Ok(records)
}

/// Convert cleaned transactions to a DataFrame in output column order
pub fn transactions_to_dataframe(transactions: &[PricedTransaction]) -> PipelineResult<DataFrame> {
    let n = transactions.len();

    let mut ids = Vec::with_capacity(n);
    let mut dates = Vec::with_capacity(n);
    let mut prices = Vec::with_capacity(n);
    let mut types = Vec::with_capacity(n);
    let mut postal_codes = Vec::with_capacity(n);
    let mut communes = Vec::with_capacity(n);
    let mut areas = Vec::with_capacity(n);
    let mut rooms = Vec::with_capacity(n);
    let mut latitudes = Vec::with_capacity(n);
    let mut longitudes = Vec::with_capacity(n);
    let mut prix_m2 = Vec::with_capacity(n);

    for priced in transactions {
        let t = &priced.transaction;
        ids.push(t.id_mutation.clone());
        dates.push(t.date_mutation.map(|d| d.format(DATE_FORMAT).to_string()));
        prices.push(t.valeur_fonciere);
        types.push(t.type_local.clone());
        postal_codes.push(t.code_postal.clone());
        communes.push(t.nom_commune.clone());
        areas.push(t.surface_reelle_bati);
        rooms.push(t.nombre_pieces_principales);
        latitudes.push(t.latitude);
        longitudes.push(t.longitude);
        prix_m2.push(priced.prix_m2);
    }

    let df = df!(
        columns::ID_MUTATION => ids,
        columns::DATE_MUTATION => dates,
        columns::VALEUR_FONCIERE => prices,
        columns::TYPE_LOCAL => types,
        columns::CODE_POSTAL => postal_codes,
        columns::NOM_COMMUNE => communes,
        columns::SURFACE_REELLE_BATI => areas,
        columns::NOMBRE_PIECES_PRINCIPALES => rooms,
        columns::LATITUDE => latitudes,
        columns::LONGITUDE => longitudes,
        columns::PRIX_M2 => prix_m2,
    )?;

    Ok(df)
}

/// Write a DataFrame as a comma-separated file with a header row
pub fn write_dataframe_csv(df: &mut DataFrame, path: &Path) -> PipelineResult<()> {
    let mut file = File::create(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)?;

    Ok(())
}

/// Write cleaned transactions to `path`
pub fn write_transactions_csv(transactions: &[PricedTransaction], path: &Path) -> PipelineResult<()> {
    let mut df = transactions_to_dataframe(transactions)?;
    write_dataframe_csv(&mut df, path)
}
