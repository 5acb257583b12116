use serde::{Deserialize, Serialize};

use crate::core::types::GroupId;

/// A single survey observation to be scored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Occupation code as published (may contain mask letters)
    pub code: String,

    /// Group this observation belongs to
    pub group: GroupId,

    /// Descriptive group title, when the source provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Sampling weight, non-negative
    pub weight: f64,

    /// Exposure score, populated by matching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Observation {
    pub fn new(code: impl Into<String>, group: impl Into<String>, weight: f64) -> Self {
        Self {
            code: code.into(),
            group: GroupId::new(group),
            title: None,
            weight,
            score: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// The observation table, held fully in memory for one matching run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservationTable {
    pub rows: Vec<Observation>,
}

impl ObservationTable {
    #[must_use]
    pub fn new(rows: Vec<Observation>) -> Self {
        Self { rows }
    }

    /// Number of observation rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_new() {
        let obs = Observation::new("251000", "6212", 120.0);
        assert_eq!(obs.code, "251000");
        assert_eq!(obs.group.to_string(), "6212");
        assert!(obs.title.is_none());
        assert!(obs.score.is_none());
    }

    #[test]
    fn test_observation_with_title() {
        let obs = Observation::new("1110XX", "6212", 1.0).with_title("Computer Science");
        assert_eq!(obs.title.as_deref(), Some("Computer Science"));
    }

    #[test]
    fn test_table_len() {
        let table = ObservationTable::new(vec![
            Observation::new("251000", "6212", 1.0),
            Observation::new("151252", "6212", 2.0),
        ]);
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
        assert!(ObservationTable::default().is_empty());
    }
}
