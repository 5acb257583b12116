use std::collections::HashMap;

use tracing::warn;

/// Reference table mapping normalized occupation codes to exposure scores.
///
/// Exact lookups go through the map; the prefix scan in fuzzy matching
/// iterates the full code list. Duplicate codes are last-write-wins: the
/// earlier score is replaced in both structures and a warning is logged.
#[derive(Debug, Clone, Default)]
pub struct ExposureTable {
    /// Score per normalized code
    scores: HashMap<String, f64>,

    /// Distinct codes in first-seen order, for the prefix scan
    codes: Vec<String>,
}

impl ExposureTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from (code, score) pairs. Codes must already be normalized.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (code, score) in pairs {
            table.insert(code, score);
        }
        table
    }

    /// Insert a code/score pair. Last-write-wins on duplicate codes.
    pub fn insert(&mut self, code: impl Into<String>, score: f64) {
        let code = code.into();
        if let Some(previous) = self.scores.insert(code.clone(), score) {
            warn!("duplicate exposure code {code}: score {previous} replaced by {score}");
        } else {
            self.codes.push(code);
        }
    }

    /// Exact lookup by normalized code
    pub fn get(&self, code: &str) -> Option<f64> {
        self.scores.get(code).copied()
    }

    /// All distinct codes, in first-seen order
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Number of distinct codes in the table
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
