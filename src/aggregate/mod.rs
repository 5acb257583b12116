//! Group-level exposure aggregation.
//!
//! Collapses a matched observation table to one row per group: total weight,
//! row count, and the weight-weighted mean exposure score. This is the shape
//! downstream panel analysis consumes, with the heaviest groups first.

use std::collections::HashMap;

use serde::Serialize;

use crate::core::observation::ObservationTable;
use crate::core::types::GroupId;
use crate::diagnostics::weighted_mean;

/// Group-level exposure summary
#[derive(Debug, Clone, Serialize)]
pub struct GroupScore {
    pub group: GroupId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Number of observation rows in the group
    pub rows: usize,

    /// Sum of the weight column across the group's rows
    pub total_weight: f64,

    /// Weight-weighted mean score over scored rows; None when no scored weight
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_score: Option<f64>,
}

/// Collapse the table to one summary per group, heaviest groups first.
#[must_use]
pub fn group_scores(table: &ObservationTable) -> Vec<GroupScore> {
    #[derive(Default)]
    struct Acc {
        title: Option<String>,
        rows: usize,
        total_weight: f64,
        scored: Vec<(f64, f64)>,
    }

    let mut accumulators: HashMap<&GroupId, Acc> = HashMap::new();
    for row in &table.rows {
        let acc = accumulators.entry(&row.group).or_default();
        acc.rows += 1;
        acc.total_weight += row.weight;
        if acc.title.is_none() {
            acc.title.clone_from(&row.title);
        }
        if let Some(score) = row.score {
            acc.scored.push((score, row.weight));
        }
    }

    let mut scores: Vec<GroupScore> = accumulators
        .into_iter()
        .map(|(group, acc)| GroupScore {
            group: group.clone(),
            title: acc.title,
            rows: acc.rows,
            total_weight: acc.total_weight,
            mean_score: weighted_mean(acc.scored),
        })
        .collect();

    scores.sort_by(|a, b| {
        b.total_weight
            .partial_cmp(&a.total_weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.group.0.cmp(&b.group.0))
    });
    scores
}
