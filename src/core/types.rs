use serde::{Deserialize, Serialize};

/// Identifier for an observation group (e.g. a college major code)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a code's exposure score was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Normalized code is present verbatim in the exposure table
    Exact,
    /// Median of exposure scores sharing the derived prefix
    FuzzyPrefix,
    /// No exposure code shares the derived prefix
    Unmatched,
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::FuzzyPrefix => write!(f, "fuzzy_prefix"),
            Self::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// Surface form of a code, judged only from its literal string.
///
/// Used for labeling fuzzy resolutions in logs. Match provenance shown in
/// reports comes from [`MatchKind`], never from this heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeForm {
    /// Contains a mask letter somewhere (suppressed detail)
    Masked,
    /// Ends in one or more zero digits (rolled-up category)
    Aggregated,
    /// Fully detailed code
    Detailed,
}

impl std::fmt::Display for CodeForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Masked => write!(f, "masked"),
            Self::Aggregated => write!(f, "aggregated"),
            Self::Detailed => write!(f, "detailed"),
        }
    }
}
