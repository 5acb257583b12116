//! End-to-end tests of the matching pipeline through the public API:
//! load both tables from text, match, then inspect reports and diagnostics.

use soc_exposure::diagnostics::group_reports;
use soc_exposure::parsing::{
    load_exposure_text, load_observations_text, ExposureColumns, ObservationColumns, ParseError,
};
use soc_exposure::{GroupId, MatchKind, Matcher};

const EXPOSURE_CSV: &str = "\
soc_code,aioe
2511,0.2
2512,0.6
2519,0.9
151252,0.8
531011,0.1
";

const OBSERVATIONS_CSV: &str = "\
occ_code,group,group_title,weight
151252,1102,Computer Science,50
251000,6212,Economics,10
251000,6212,Economics,30
2511,6212,Economics,20
5310XX,5507,Transportation,40
990000,5507,Transportation,15
";

fn load_fixture() -> (soc_exposure::ObservationTable, soc_exposure::ExposureTable) {
    let observations =
        load_observations_text(OBSERVATIONS_CSV, &ObservationColumns::default(), ',').unwrap();
    let exposure = load_exposure_text(EXPOSURE_CSV, &ExposureColumns::default(), ',').unwrap();
    (observations, exposure)
}

#[test]
fn scores_and_provenance_across_all_match_paths() {
    let (mut table, exposure) = load_fixture();
    let outcome = Matcher::new(&exposure).match_table(&mut table);

    // Exact: verbatim code takes its own score
    assert_eq!(table.rows[0].score, Some(0.8));
    assert_eq!(outcome.records["151252"].kind, MatchKind::Exact);

    // Aggregated: "251000" -> prefix "251" -> median of {0.2, 0.6, 0.9}
    assert_eq!(table.rows[1].score, Some(0.6));
    assert_eq!(table.rows[2].score, Some(0.6));
    let record = &outcome.records["251000"];
    assert_eq!(record.kind, MatchKind::FuzzyPrefix);
    assert_eq!(record.prefix.as_deref(), Some("251"));
    assert_eq!(record.contributors, Some(3));

    // Exact precedence: "2511" shares the "251" prefix but matches verbatim
    assert_eq!(table.rows[3].score, Some(0.2));
    assert_eq!(outcome.records["2511"].kind, MatchKind::Exact);

    // Masked: "5310XX" strips to "5310", matching 531011
    assert_eq!(table.rows[4].score, Some(0.1));
    assert_eq!(outcome.records["5310XX"].kind, MatchKind::FuzzyPrefix);

    // Unmatchable: null score, never an error
    assert!(table.rows[5].score.is_none());
    assert_eq!(outcome.records["990000"].kind, MatchKind::Unmatched);
}

#[test]
fn report_counts_are_complete() {
    let (mut table, exposure) = load_fixture();
    let outcome = Matcher::new(&exposure).match_table(&mut table);
    let report = &outcome.report;

    assert_eq!(report.total_rows, 6);
    assert_eq!(report.exact_rows, 2);
    assert_eq!(report.fuzzy_rows, 3);
    assert_eq!(report.unmatched_rows, 1);
    assert_eq!(
        report.exact_rows + report.fuzzy_rows + report.unmatched_rows,
        report.total_rows
    );

    assert_eq!(report.total_codes, 5);
    assert_eq!(
        report.exact_codes + report.fuzzy_codes + report.unmatched_codes,
        report.total_codes
    );

    assert_eq!(report.top_unmatched, vec![("990000".to_string(), 1)]);
}

#[test]
fn rerun_is_idempotent() {
    let (mut table, exposure) = load_fixture();
    let matcher = Matcher::new(&exposure);

    matcher.match_table(&mut table);
    let first: Vec<Option<f64>> = table.rows.iter().map(|r| r.score).collect();

    matcher.match_table(&mut table);
    let second: Vec<Option<f64>> = table.rows.iter().map(|r| r.score).collect();

    assert_eq!(first, second);
}

#[test]
fn diagnostics_reflect_matcher_provenance() {
    let (mut table, exposure) = load_fixture();
    let outcome = Matcher::new(&exposure).match_table(&mut table);

    let reports = group_reports(&table, &outcome.records, None, 10);

    // Three groups, ranked by total weight: 6212 (60), 5507 (55), 1102 (50)
    let ids: Vec<&str> = reports.iter().map(|r| r.group.0.as_str()).collect();
    assert_eq!(ids, vec!["6212", "5507", "1102"]);

    let economics = &reports[0];
    assert_eq!(economics.title.as_deref(), Some("Economics"));
    assert!((economics.total_weight - 60.0).abs() < f64::EPSILON);
    // (0.6*40 + 0.2*20) / 60
    let expected = (0.6 * 40.0 + 0.2 * 20.0) / 60.0;
    assert!((economics.weighted_mean_score.unwrap() - expected).abs() < 1e-9);

    // The aggregated code's kind comes from the matcher, not re-derived
    let agg = economics
        .top_codes
        .iter()
        .find(|c| c.code == "251000")
        .unwrap();
    assert_eq!(agg.kind, MatchKind::FuzzyPrefix);
    assert!((agg.weight - 40.0).abs() < f64::EPSILON);
    assert!((agg.share - 40.0 / 60.0).abs() < 1e-9);

    // Unmatched code keeps a null score in diagnostics too
    let transport = &reports[1];
    let missing = transport
        .top_codes
        .iter()
        .find(|c| c.code == "990000")
        .unwrap();
    assert!(missing.score.is_none());
    assert_eq!(missing.kind, MatchKind::Unmatched);
}

#[test]
fn explicit_group_selection_skips_absent_groups() {
    let (mut table, exposure) = load_fixture();
    let outcome = Matcher::new(&exposure).match_table(&mut table);

    let requested = [GroupId::new("1102"), GroupId::new("0000")];
    let reports = group_reports(&table, &outcome.records, Some(&requested), 10);

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].group.0, "1102");
}

#[test]
fn empty_observation_table_yields_zero_report() {
    let observations =
        load_observations_text("occ_code,group,weight\n", &ObservationColumns::default(), ',')
            .unwrap();
    let exposure = load_exposure_text(EXPOSURE_CSV, &ExposureColumns::default(), ',').unwrap();

    let mut table = observations;
    let outcome = Matcher::new(&exposure).match_table(&mut table);

    assert_eq!(outcome.report.total_rows, 0);
    assert_eq!(outcome.report.total_codes, 0);
    assert!((outcome.report.exact_pct() - 0.0).abs() < f64::EPSILON);
    assert!(outcome.report.top_unmatched.is_empty());
}

#[test]
fn missing_column_fails_fast() {
    let err = load_observations_text(
        "occupation,group,weight\n111011,g,1\n",
        &ObservationColumns::default(),
        ',',
    )
    .unwrap_err();

    match err {
        ParseError::MissingColumn(name) => assert_eq!(name, "occ_code"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn custom_column_names() {
    let observations = load_observations_text(
        "OCCSOC,DEGFIELDD,PERWT\n2512,6212,100\n",
        &ObservationColumns {
            code: "OCCSOC".to_string(),
            group: "DEGFIELDD".to_string(),
            weight: "PERWT".to_string(),
            title: "DEGFIELD_TITLE".to_string(),
        },
        ',',
    )
    .unwrap();
    assert_eq!(observations.len(), 1);

    let exposure = load_exposure_text(
        "soc_clean,Language Modeling AIOE\n2512,0.6\n",
        &ExposureColumns {
            code: "soc_clean".to_string(),
            score: "Language Modeling AIOE".to_string(),
        },
        ',',
    )
    .unwrap();

    let mut table = observations;
    Matcher::new(&exposure).match_table(&mut table);
    assert_eq!(table.rows[0].score, Some(0.6));
}
