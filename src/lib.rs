//! # soc-exposure
//!
//! A library for matching masked and aggregated occupation codes to
//! per-occupation exposure scores.
//!
//! Survey microdata publishes occupation codes with suppressed detail: a code
//! may end in mask letters ("5310XX") or be rolled up to a coarser category
//! with trailing zeros ("251000"). Neither form appears verbatim in a
//! reference exposure table keyed by detailed codes, so a plain join silently
//! drops exactly the observations the suppression was applied to.
//!
//! `soc-exposure` closes that gap: exact matches are always taken first, and
//! every remaining code falls back to the **median** exposure score of all
//! reference codes sharing a derived prefix, with per-code provenance so the
//! fallback is auditable.
//!
//! ## Features
//!
//! - **Exact-first matching**: a verbatim code always takes its own score
//! - **Hierarchical prefix fallback**: mask stripping plus zero-run truncation
//! - **Match provenance**: every distinct code gets an explicit match record
//! - **Match reporting**: row and code counts, plus the top unmatched codes
//! - **Group diagnostics**: weight shares and weighted mean scores per group
//! - **Group aggregation**: one weighted mean exposure row per group
//!
//! ## Example
//!
//! ```rust
//! use soc_exposure::{ExposureTable, Matcher, Observation, ObservationTable};
//!
//! let exposure = ExposureTable::from_pairs([
//!     ("2511", 0.2),
//!     ("2512", 0.6),
//!     ("2519", 0.9),
//! ]);
//!
//! let mut table = ObservationTable::new(vec![
//!     Observation::new("2512", "6212", 120.0),   // exact
//!     Observation::new("251000", "6212", 40.0),  // aggregated -> prefix "251"
//! ]);
//!
//! let outcome = Matcher::new(&exposure).match_table(&mut table);
//!
//! assert_eq!(table.rows[0].score, Some(0.6));
//! assert_eq!(table.rows[1].score, Some(0.6)); // median of 0.2, 0.6, 0.9
//! assert_eq!(outcome.report.exact_rows, 1);
//! assert_eq!(outcome.report.fuzzy_rows, 1);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Observation and exposure table types
//! - [`matching`]: Matching engine, prefix derivation, and match reporting
//! - [`diagnostics`]: Per-group composition reports
//! - [`aggregate`]: Group-level weighted mean exposure
//! - [`parsing`]: Delimited table loaders
//! - [`cli`]: Command-line interface implementation

pub mod aggregate;
pub mod cli;
pub mod core;
pub mod diagnostics;
pub mod matching;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::exposure::ExposureTable;
pub use crate::core::observation::{Observation, ObservationTable};
pub use crate::core::types::{CodeForm, GroupId, MatchKind};
pub use crate::matching::engine::{MatchConfig, MatchOutcome, MatchRecord, Matcher};
pub use crate::matching::report::MatchReport;
