//! Readers and writers for DVF CSV files.
//!
//! # Example
//!
//! ```no_run
//! use dvf_clean::parsing::csv_parser::{dataframe_to_records, parse_dvf_csv};
//! use std::path::Path;
//!
//! let df = parse_dvf_csv(Path::new("bordeaux_data.csv")).expect("Failed to parse CSV");
//! let records = dataframe_to_records(&df).expect("Failed to convert rows");
//! println!("{} rows", records.len());
//! ```

pub mod csv_parser;


pub use csv_parser::{
    dataframe_to_records, parse_dvf_csv, transactions_to_dataframe, write_dataframe_csv,
    write_transactions_csv,
};
