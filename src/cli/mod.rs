//! Command-line interface for soc-exposure.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **match**: Score an observation table against an exposure table and
//!   report match quality
//! - **diagnose**: Summarize per-group composition and match provenance
//! - **aggregate**: Collapse to group-level weighted mean exposure
//!
//! ## Usage
//!
//! ```text
//! # Match ACS occupation codes against an exposure table
//! soc-exposure match acs.csv felten.csv
//!
//! # Keep the augmented table
//! soc-exposure match acs.csv felten.csv --out acs_scored.csv
//!
//! # JSON output for scripting
//! soc-exposure match acs.csv felten.csv --format json
//!
//! # Inspect the ten heaviest majors
//! soc-exposure diagnose acs.csv felten.csv
//!
//! # Inspect specific majors
//! soc-exposure diagnose acs.csv felten.csv --group 6212 --group 2102
//!
//! # Major-level exposure panel input
//! soc-exposure aggregate acs.csv felten.csv --out majors.csv
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::exposure::ExposureTable;
use crate::core::observation::ObservationTable;
use crate::matching::engine::MatchConfig;
use crate::parsing::{
    load_exposure_file, load_observations_file, ExposureColumns, ObservationColumns,
};

pub mod aggregate;
pub mod diagnose;
pub mod match_cmd;

#[derive(Parser)]
#[command(name = "soc-exposure")]
#[command(version)]
#[command(about = "Match masked and aggregated occupation codes to exposure scores")]
#[command(
    long_about = "soc-exposure links survey observation rows to a reference table of per-occupation exposure scores.\n\nPublished occupation codes are often masked (trailing X/Y letters) or aggregated (trailing zeros) and fail exact lookup. The matcher resolves them to the median score of the reference codes sharing a derived prefix, and reports exactly how every code was matched."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score an observation table and report match quality
    Match(match_cmd::MatchArgs),

    /// Summarize per-group composition and match provenance
    Diagnose(diagnose::DiagnoseArgs),

    /// Collapse to group-level weighted mean exposure
    Aggregate(aggregate::AggregateArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Input options shared by every subcommand
#[derive(clap::Args)]
pub struct InputArgs {
    /// Observation table (CSV/TSV, optionally gzipped)
    #[arg(required = true)]
    pub observations: PathBuf,

    /// Exposure reference table (CSV/TSV, optionally gzipped)
    #[arg(required = true)]
    pub exposure: PathBuf,

    /// Field delimiter (auto-detected from the file extension by default)
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Observation column holding the occupation code
    #[arg(long, default_value = "occ_code")]
    pub code_column: String,

    /// Observation column holding the group identifier
    #[arg(long, default_value = "group")]
    pub group_column: String,

    /// Observation column holding the sampling weight
    #[arg(long, default_value = "weight")]
    pub weight_column: String,

    /// Observation column holding the group title (used when present)
    #[arg(long, default_value = "group_title")]
    pub title_column: String,

    /// Exposure column holding the occupation code
    #[arg(long, default_value = "soc_code")]
    pub exposure_code_column: String,

    /// Exposure column holding the score
    #[arg(long, default_value = "aioe")]
    pub score_column: String,

    /// Letters treated as mask characters in occupation codes
    #[arg(long, default_value = "XY")]
    pub mask_chars: String,
}

impl InputArgs {
    /// Load both input tables.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or fails to parse.
    pub fn load(&self) -> anyhow::Result<(ObservationTable, ExposureTable)> {
        let observation_columns = ObservationColumns {
            code: self.code_column.clone(),
            group: self.group_column.clone(),
            weight: self.weight_column.clone(),
            title: self.title_column.clone(),
        };
        let exposure_columns = ExposureColumns {
            code: self.exposure_code_column.clone(),
            score: self.score_column.clone(),
        };

        let observations =
            load_observations_file(&self.observations, &observation_columns, self.delimiter)?;
        let exposure = load_exposure_file(&self.exposure, &exposure_columns, self.delimiter)?;
        Ok((observations, exposure))
    }

    /// Build the matcher configuration from the shared flags
    #[must_use]
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            mask_chars: self.mask_chars.to_ascii_uppercase().chars().collect(),
            ..MatchConfig::default()
        }
    }
}

/// Render an optional score for text output
pub(crate) fn fmt_score(score: Option<f64>) -> String {
    score.map_or_else(|| "n/a".to_string(), |s| format!("{s:.3}"))
}

/// Render an optional score for TSV output (empty field when absent)
pub(crate) fn fmt_score_tsv(score: Option<f64>) -> String {
    score.map_or_else(String::new, |s| format!("{s:.6}"))
}
