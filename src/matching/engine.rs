use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::core::exposure::ExposureTable;
use crate::core::observation::ObservationTable;
use crate::core::types::MatchKind;
use crate::matching::prefix::{classify, derive_prefix, DEFAULT_MASK_CHARS};
use crate::matching::report::MatchReport;
use crate::utils::validation::normalize_code;

/// Configuration for the matcher
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Letters treated as mask characters when deriving prefixes
    pub mask_chars: Vec<char>,

    /// How many unmatched codes to list in the report
    pub top_unmatched: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mask_chars: DEFAULT_MASK_CHARS.to_vec(),
            top_unmatched: 10,
        }
    }
}

/// Resolution of one distinct observation code
#[derive(Debug, Clone, Serialize)]
pub struct MatchRecord {
    /// Normalized code this record describes
    pub code: String,

    /// Resolved exposure score, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// How the score was resolved
    pub kind: MatchKind,

    /// Prefix used for fuzzy resolution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Number of exposure codes contributing to the median
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors: Option<usize>,
}

impl MatchRecord {
    fn exact(code: String, score: f64) -> Self {
        Self {
            code,
            score: Some(score),
            kind: MatchKind::Exact,
            prefix: None,
            contributors: None,
        }
    }

    fn unmatched(code: String) -> Self {
        Self {
            code,
            score: None,
            kind: MatchKind::Unmatched,
            prefix: None,
            contributors: None,
        }
    }
}

/// Outcome of one matching run
#[derive(Debug)]
pub struct MatchOutcome {
    /// One record per distinct normalized code seen in the table
    pub records: HashMap<String, MatchRecord>,

    /// Aggregate match statistics
    pub report: MatchReport,
}

/// Populates the score column of an observation table from an exposure table.
///
/// Exact matches always win; remaining codes fall back to the median exposure
/// score of all reference codes sharing a derived prefix. Matching is a pure
/// function of the two input tables, so re-running on the same inputs yields
/// identical scores and statistics.
pub struct Matcher<'a> {
    exposure: &'a ExposureTable,
    config: MatchConfig,
}

impl<'a> Matcher<'a> {
    /// Create a matcher with default configuration
    pub fn new(exposure: &'a ExposureTable) -> Self {
        Self {
            exposure,
            config: MatchConfig::default(),
        }
    }

    /// Create a matcher with custom configuration
    pub fn with_config(exposure: &'a ExposureTable, config: MatchConfig) -> Self {
        Self { exposure, config }
    }

    /// Populate the score column in a single batch pass and report match quality.
    pub fn match_table(&self, table: &mut ObservationTable) -> MatchOutcome {
        let mut records: HashMap<String, MatchRecord> = HashMap::new();
        // Distinct unmatched codes in first-seen row order, so fuzzy
        // resolution and its logging are deterministic
        let mut pending: Vec<String> = Vec::new();

        // Step 1: exact pass. Clears any stale score so a second run over the
        // same table cannot observe leftovers from the first.
        for row in &mut table.rows {
            let code = normalize_code(&row.code);
            match self.exposure.get(&code) {
                Some(score) => {
                    row.score = Some(score);
                    records
                        .entry(code.clone())
                        .or_insert_with(|| MatchRecord::exact(code, score));
                }
                None => {
                    row.score = None;
                    if !records.contains_key(&code) {
                        records.insert(code.clone(), MatchRecord::unmatched(code.clone()));
                        pending.push(code);
                    }
                }
            }
        }

        // Step 2: resolve each distinct unmatched code once
        for code in &pending {
            let prefix = derive_prefix(code, &self.config.mask_chars);
            let candidates: Vec<f64> = self
                .exposure
                .codes()
                .iter()
                .filter(|reference| reference.starts_with(&prefix))
                .filter_map(|reference| self.exposure.get(reference))
                .collect();

            if candidates.is_empty() {
                continue;
            }

            let score = median(candidates.clone());
            debug!(
                "fuzzy {} code {code} -> prefix '{prefix}' -> median of {} codes: {score:.3}",
                classify(code, &self.config.mask_chars),
                candidates.len(),
            );

            if let Some(record) = records.get_mut(code) {
                record.score = Some(score);
                record.kind = MatchKind::FuzzyPrefix;
                record.prefix = Some(prefix);
                record.contributors = Some(candidates.len());
            }
        }

        // Step 3: broadcast fuzzy scores and tally row-level counts
        let mut report = MatchReport {
            total_rows: table.len(),
            total_codes: records.len(),
            ..MatchReport::default()
        };
        let mut unmatched_freq: HashMap<&str, usize> = HashMap::new();

        for row in &mut table.rows {
            let code = normalize_code(&row.code);
            // Every code seen in step 1 has a record
            let record = &records[&code];
            match record.kind {
                MatchKind::Exact => report.exact_rows += 1,
                MatchKind::FuzzyPrefix => {
                    row.score = record.score;
                    report.fuzzy_rows += 1;
                }
                MatchKind::Unmatched => {
                    report.unmatched_rows += 1;
                    *unmatched_freq.entry(record.code.as_str()).or_default() += 1;
                }
            }
        }

        for record in records.values() {
            match record.kind {
                MatchKind::Exact => report.exact_codes += 1,
                MatchKind::FuzzyPrefix => report.fuzzy_codes += 1,
                MatchKind::Unmatched => report.unmatched_codes += 1,
            }
        }

        // Leaderboard of still-missing codes by observation frequency
        let mut top: Vec<(String, usize)> = unmatched_freq
            .into_iter()
            .map(|(code, count)| (code.to_string(), count))
            .collect();
        top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top.truncate(self.config.top_unmatched);
        report.top_unmatched = top;

        MatchOutcome { records, report }
    }
}

/// Median of the given scores. Even counts average the two middle values.
///
/// Callers must pass at least one value; an empty candidate list never
/// produces a score in the first place.
fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}
