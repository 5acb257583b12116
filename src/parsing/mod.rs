//! Loaders for delimited observation and exposure tables.
//!
//! Both inputs are flat delimited files (CSV or TSV, optionally gzipped) with
//! a required header row naming the columns:
//!
//! - **Exposure table**: a code column and a score column
//!   (defaults `soc_code`, `aioe`)
//! - **Observation table**: code, group, and weight columns, plus an optional
//!   group-title column (defaults `occ_code`, `group`, `weight`, `group_title`)
//!
//! Column names are configurable so extracts with different headers load
//! without preprocessing. Blank lines and `#` comments are skipped; parse
//! errors carry 1-based line numbers.

use thiserror::Error;

pub mod table;

pub use table::{
    detect_delimiter, load_exposure_file, load_exposure_text, load_observations_file,
    load_observations_text, ExposureColumns, ObservationColumns,
};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid table format: {0}")]
    InvalidFormat(String),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Too many rows: {0} exceeds maximum allowed")]
    TooManyRows(usize),
}
