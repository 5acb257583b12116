//! Exposure matching engine for masked and aggregated occupation codes.
//!
//! This module provides the core matching functionality:
//!
//! - [`Matcher`]: Main entry point, populates an observation table's score column
//! - [`MatchRecord`]: Resolution of one distinct code, with provenance
//! - [`MatchReport`]: Aggregate match statistics for one run
//!
//! ## Matching Algorithm
//!
//! Matching runs as a single batch pass over the observation table:
//!
//! 1. **Exact pass**: every code is normalized (trim, upper-case) and looked up
//!    directly in the exposure table. An exact score always wins.
//! 2. **Prefix derivation**: each distinct unmatched code has its trailing mask
//!    letters stripped; a trailing zero run then selects one truncation
//!    (`000` → 3 chars, `00` → 4, `0` → 5).
//! 3. **Fuzzy resolution**: the unmatched code takes the **median** exposure
//!    score of all reference codes starting with the derived prefix. An empty
//!    candidate set leaves the code unmatched; there is no shorter-prefix retry.
//! 4. **Broadcast**: each resolved score is applied to every observation row
//!    bearing that code, and match statistics are tallied.
//!
//! ## Example
//!
//! ```rust
//! use soc_exposure::{ExposureTable, Matcher, Observation, ObservationTable};
//!
//! let exposure = ExposureTable::from_pairs([("2511", 0.2), ("2512", 0.6), ("2519", 0.9)]);
//! let mut table = ObservationTable::new(vec![Observation::new("251000", "6212", 40.0)]);
//!
//! let outcome = Matcher::new(&exposure).match_table(&mut table);
//!
//! assert_eq!(table.rows[0].score, Some(0.6)); // median of the "251" family
//! assert_eq!(outcome.report.fuzzy_rows, 1);
//! ```

pub mod engine;
pub mod prefix;
pub mod report;

pub use engine::{MatchConfig, MatchOutcome, MatchRecord, Matcher};
pub use report::MatchReport;
