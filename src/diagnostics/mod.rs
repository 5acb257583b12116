//! Per-group composition reports over a matched observation table.
//!
//! Diagnostics are a pure read: given the table the [`Matcher`] populated and
//! the match records it emitted, summarize the groups carrying the most weight
//! and the codes that dominate each of them. Match provenance comes straight
//! from the records, so the kind shown for a code can never disagree with the
//! branch that actually produced its score.
//!
//! [`Matcher`]: crate::matching::Matcher

use std::collections::HashMap;

use serde::Serialize;

use crate::core::observation::ObservationTable;
use crate::core::types::{GroupId, MatchKind};
use crate::matching::engine::MatchRecord;
use crate::utils::validation::normalize_code;

/// Number of groups shown when none are requested
pub const DEFAULT_TOP_GROUPS: usize = 10;

/// Codes listed per group
pub const TOP_CODES_PER_GROUP: usize = 10;

/// One code's contribution to a group
#[derive(Debug, Clone, Serialize)]
pub struct CodeUsage {
    /// Raw code as published
    pub code: String,

    /// Total weight carried by rows with this code
    pub weight: f64,

    /// Share of the group's total weight; 0 when the group weight is 0
    pub share: f64,

    /// Resolved exposure score, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// Provenance of the score, from the matcher's records
    pub kind: MatchKind,
}

/// Composition summary for one group
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub group: GroupId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Sum of the weight column across the group's rows
    pub total_weight: f64,

    /// Number of observation rows in the group
    pub rows: usize,

    /// Weight-weighted mean score over all the group's scored rows;
    /// None when the scored weight sum is zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_mean_score: Option<f64>,

    /// Top codes by summed weight, descending
    pub top_codes: Vec<CodeUsage>,
}

/// Weight-weighted mean over (value, weight) pairs.
///
/// Returns None when the weight sum is zero, so degenerate groups report an
/// undefined mean instead of dividing by zero.
pub fn weighted_mean(pairs: impl IntoIterator<Item = (f64, f64)>) -> Option<f64> {
    let mut value_sum = 0.0;
    let mut weight_sum = 0.0;
    for (value, weight) in pairs {
        value_sum += value * weight;
        weight_sum += weight;
    }
    if weight_sum > 0.0 {
        Some(value_sum / weight_sum)
    } else {
        None
    }
}

/// Per-group accumulation before ranking
#[derive(Debug, Default)]
struct GroupAccumulator {
    title: Option<String>,
    total_weight: f64,
    rows: usize,
    scored_value_sum: f64,
    scored_weight_sum: f64,
    /// Weight per distinct raw code
    code_weights: HashMap<String, f64>,
}

/// Build composition reports for the requested groups.
///
/// With an explicit group list, reports come back in list order and groups
/// with no rows are skipped silently. With no list, the `top_groups` heaviest
/// groups are reported, ranked by total weight descending.
pub fn group_reports(
    table: &ObservationTable,
    records: &HashMap<String, MatchRecord>,
    groups: Option<&[GroupId]>,
    top_groups: usize,
) -> Vec<GroupReport> {
    let mut accumulators: HashMap<&GroupId, GroupAccumulator> = HashMap::new();

    for row in &table.rows {
        let acc = accumulators.entry(&row.group).or_default();
        acc.total_weight += row.weight;
        acc.rows += 1;
        if acc.title.is_none() {
            acc.title.clone_from(&row.title);
        }
        if let Some(score) = row.score {
            acc.scored_value_sum += score * row.weight;
            acc.scored_weight_sum += row.weight;
        }
        *acc.code_weights.entry(row.code.clone()).or_default() += row.weight;
    }

    let selected: Vec<&GroupId> = match groups {
        Some(requested) => requested
            .iter()
            .filter(|group| accumulators.contains_key(group))
            .collect(),
        None => {
            let mut ranked: Vec<&GroupId> = accumulators.keys().copied().collect();
            ranked.sort_by(|a, b| {
                let wa = accumulators[a].total_weight;
                let wb = accumulators[b].total_weight;
                wb.partial_cmp(&wa)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });
            ranked.truncate(top_groups);
            ranked
        }
    };

    selected
        .into_iter()
        .map(|group| {
            let acc = &accumulators[group];
            build_report(group, acc, records)
        })
        .collect()
}

fn build_report(
    group: &GroupId,
    acc: &GroupAccumulator,
    records: &HashMap<String, MatchRecord>,
) -> GroupReport {
    let mut top_codes: Vec<CodeUsage> = acc
        .code_weights
        .iter()
        .map(|(code, &weight)| {
            let record = records.get(&normalize_code(code));
            CodeUsage {
                code: code.clone(),
                weight,
                share: if acc.total_weight > 0.0 {
                    weight / acc.total_weight
                } else {
                    0.0
                },
                score: record.and_then(|r| r.score),
                kind: record.map_or(MatchKind::Unmatched, |r| r.kind),
            }
        })
        .collect();

    top_codes.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.code.cmp(&b.code))
    });
    top_codes.truncate(TOP_CODES_PER_GROUP);

    let weighted_mean_score = if acc.scored_weight_sum > 0.0 {
        Some(acc.scored_value_sum / acc.scored_weight_sum)
    } else {
        None
    };

    GroupReport {
        group: group.clone(),
        title: acc.title.clone(),
        total_weight: acc.total_weight,
        rows: acc.rows,
        weighted_mean_score,
        top_codes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exposure::ExposureTable;
    use crate::core::observation::Observation;
    use crate::matching::engine::Matcher;

    fn matched_fixture() -> (ObservationTable, HashMap<String, MatchRecord>) {
        let exposure = ExposureTable::from_pairs([("1111", 0.1), ("2222", 0.9), ("3333", 0.5)]);
        let mut table = ObservationTable::new(vec![
            Observation::new("1111", "g1", 10.0).with_title("First"),
            Observation::new("2222", "g1", 30.0).with_title("First"),
            Observation::new("3333", "g2", 5.0),
            Observation::new("999999", "g2", 5.0),
        ]);
        let outcome = Matcher::new(&exposure).match_table(&mut table);
        (table, outcome.records)
    }

    #[test]
    fn test_weighted_mean() {
        let mean = weighted_mean([(0.1, 10.0), (0.9, 30.0)]).unwrap();
        assert!((mean - 0.70).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_mean_zero_weight() {
        assert!(weighted_mean([(0.5, 0.0)]).is_none());
        assert!(weighted_mean(std::iter::empty()).is_none());
    }

    #[test]
    fn test_group_weighted_mean() {
        let (table, records) = matched_fixture();
        let reports = group_reports(&table, &records, Some(&[GroupId::new("g1")]), 10);
        assert_eq!(reports.len(), 1);
        // (0.1*10 + 0.9*30) / 40 = 0.70
        assert!((reports[0].weighted_mean_score.unwrap() - 0.70).abs() < 1e-9);
        assert!((reports[0].total_weight - 40.0).abs() < f64::EPSILON);
        assert_eq!(reports[0].title.as_deref(), Some("First"));
    }

    #[test]
    fn test_unscored_rows_excluded_from_mean() {
        let (table, records) = matched_fixture();
        let reports = group_reports(&table, &records, Some(&[GroupId::new("g2")]), 10);
        // The unmatched 999999 row contributes weight to the group total but
        // not to the mean
        assert!((reports[0].total_weight - 10.0).abs() < f64::EPSILON);
        assert!((reports[0].weighted_mean_score.unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_top_n_selection_by_weight() {
        let mut table = ObservationTable::default();
        for (group, weight) in [("a", 5.0), ("b", 1.0), ("c", 4.0), ("d", 2.0), ("e", 3.0)] {
            table.rows.push(Observation::new("1111", group, weight));
        }
        let records = HashMap::new();
        let reports = group_reports(&table, &records, None, 3);

        let weights: Vec<f64> = reports.iter().map(|r| r.total_weight).collect();
        assert_eq!(weights, vec![5.0, 4.0, 3.0]);
    }

    #[test]
    fn test_missing_requested_group_skipped() {
        let (table, records) = matched_fixture();
        let requested = [GroupId::new("g1"), GroupId::new("absent")];
        let reports = group_reports(&table, &records, Some(&requested), 10);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].group.0, "g1");
    }

    #[test]
    fn test_code_shares_and_kinds() {
        let (table, records) = matched_fixture();
        let reports = group_reports(&table, &records, Some(&[GroupId::new("g1")]), 10);
        let codes = &reports[0].top_codes;

        // Ranked by weight descending
        assert_eq!(codes[0].code, "2222");
        assert!((codes[0].share - 0.75).abs() < 1e-9);
        assert_eq!(codes[0].kind, MatchKind::Exact);
        assert_eq!(codes[1].code, "1111");
        assert!((codes[1].share - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_zero_weight_group_share() {
        let mut table = ObservationTable::new(vec![Observation::new("1111", "g0", 0.0)]);
        let exposure = ExposureTable::from_pairs([("1111", 0.1)]);
        let outcome = Matcher::new(&exposure).match_table(&mut table);

        let reports = group_reports(&table, &outcome.records, Some(&[GroupId::new("g0")]), 10);
        assert!((reports[0].top_codes[0].share - 0.0).abs() < f64::EPSILON);
        assert!(reports[0].weighted_mean_score.is_none());
    }

    #[test]
    fn test_top_codes_truncated() {
        let mut table = ObservationTable::default();
        for i in 0..15 {
            table
                .rows
                .push(Observation::new(format!("{:04}", 1000 + i), "g1", 1.0));
        }
        let records = HashMap::new();
        let reports = group_reports(&table, &records, None, 1);
        assert_eq!(reports[0].top_codes.len(), TOP_CODES_PER_GROUP);
        assert_eq!(reports[0].rows, 15);
    }
}
