use serde::Serialize;

/// Safely convert usize to f64 for percentage calculations
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Aggregate match statistics for one matching run.
///
/// Row-level counts partition the observation table; code-level counts
/// partition the distinct normalized codes attempted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchReport {
    /// Total observation rows
    pub total_rows: usize,
    /// Rows whose normalized code was found verbatim
    pub exact_rows: usize,
    /// Rows scored via prefix fallback
    pub fuzzy_rows: usize,
    /// Rows left with a null score
    pub unmatched_rows: usize,

    /// Distinct normalized codes attempted
    pub total_codes: usize,
    pub exact_codes: usize,
    pub fuzzy_codes: usize,
    pub unmatched_codes: usize,

    /// Unmatched codes ranked by observation frequency (not weight)
    pub top_unmatched: Vec<(String, usize)>,
}

impl MatchReport {
    fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        count_to_f64(part) / count_to_f64(total) * 100.0
    }

    /// Percentage of rows exact-matched; 0 for an empty table
    #[must_use]
    pub fn exact_pct(&self) -> f64 {
        Self::pct(self.exact_rows, self.total_rows)
    }

    /// Percentage of rows fuzzy-matched; 0 for an empty table
    #[must_use]
    pub fn fuzzy_pct(&self) -> f64 {
        Self::pct(self.fuzzy_rows, self.total_rows)
    }

    /// Percentage of rows still missing a score; 0 for an empty table
    #[must_use]
    pub fn unmatched_pct(&self) -> f64 {
        Self::pct(self.unmatched_rows, self.total_rows)
    }

    /// Percentage of rows with any score; 0 for an empty table
    #[must_use]
    pub fn matched_pct(&self) -> f64 {
        Self::pct(self.exact_rows + self.fuzzy_rows, self.total_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pct_empty_table() {
        let report = MatchReport::default();
        assert!((report.exact_pct() - 0.0).abs() < f64::EPSILON);
        assert!((report.unmatched_pct() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pct() {
        let report = MatchReport {
            total_rows: 200,
            exact_rows: 150,
            fuzzy_rows: 40,
            unmatched_rows: 10,
            ..MatchReport::default()
        };
        assert!((report.exact_pct() - 75.0).abs() < 1e-9);
        assert!((report.fuzzy_pct() - 20.0).abs() < 1e-9);
        assert!((report.unmatched_pct() - 5.0).abs() < 1e-9);
        assert!((report.matched_pct() - 95.0).abs() < 1e-9);
    }
}
