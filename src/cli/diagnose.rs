use clap::Args;

use crate::cli::{fmt_score, fmt_score_tsv, InputArgs, OutputFormat};
use crate::core::types::GroupId;
use crate::diagnostics::{group_reports, GroupReport, DEFAULT_TOP_GROUPS};
use crate::matching::engine::Matcher;

#[derive(Args)]
pub struct DiagnoseArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Group to inspect (repeatable; default: heaviest groups)
    #[arg(long = "group")]
    pub groups: Vec<String>,

    /// Number of groups to show when none are requested explicitly
    #[arg(long, default_value_t = DEFAULT_TOP_GROUPS)]
    pub top_groups: usize,
}

/// Execute diagnose subcommand
///
/// # Errors
///
/// Returns an error if an input cannot be parsed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: DiagnoseArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let (mut table, exposure) = args.input.load()?;

    let matcher = Matcher::with_config(&exposure, args.input.match_config());
    let outcome = matcher.match_table(&mut table);

    if verbose {
        eprintln!(
            "Matched {} rows: {:.1}% exact, {:.1}% fuzzy, {:.1}% unmatched",
            outcome.report.total_rows,
            outcome.report.exact_pct(),
            outcome.report.fuzzy_pct(),
            outcome.report.unmatched_pct()
        );
    }

    let requested: Option<Vec<GroupId>> = if args.groups.is_empty() {
        None
    } else {
        Some(args.groups.iter().map(|g| GroupId::new(g.as_str())).collect())
    };

    let reports = group_reports(
        &table,
        &outcome.records,
        requested.as_deref(),
        args.top_groups,
    );

    if reports.is_empty() {
        eprintln!("No groups to report.");
        return Ok(());
    }

    match format {
        OutputFormat::Text => print_text_reports(&reports),
        OutputFormat::Json => print_json_reports(&reports)?,
        OutputFormat::Tsv => print_tsv_reports(&reports),
    }

    Ok(())
}

fn print_text_reports(reports: &[GroupReport]) {
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            println!("\n{}", "─".repeat(60));
        }

        match &report.title {
            Some(title) => println!("\n#{} {} ({})", i + 1, report.group, title),
            None => println!("\n#{} {}", i + 1, report.group),
        }
        println!("   Rows: {}", report.rows);
        println!("   Total weight: {:.1}", report.total_weight);
        println!(
            "   Weighted mean score: {}",
            fmt_score(report.weighted_mean_score)
        );

        println!("\n   Top codes by weight:");
        for usage in &report.top_codes {
            println!(
                "   {:<10} {:>10.1}  {:>5.1}%  score {:>6}  [{}]",
                usage.code,
                usage.weight,
                usage.share * 100.0,
                fmt_score(usage.score),
                usage.kind,
            );
        }
    }

    println!();
}

fn print_json_reports(reports: &[GroupReport]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(reports)?);
    Ok(())
}

fn print_tsv_reports(reports: &[GroupReport]) {
    println!(
        "group\ttitle\tgroup_weight\tgroup_mean_score\tcode\tcode_weight\tcode_share\tcode_score\tmatch_kind"
    );
    for report in reports {
        for usage in &report.top_codes {
            println!(
                "{}\t{}\t{:.4}\t{}\t{}\t{:.4}\t{:.6}\t{}\t{}",
                report.group,
                report.title.as_deref().unwrap_or(""),
                report.total_weight,
                fmt_score_tsv(report.weighted_mean_score),
                usage.code,
                usage.weight,
                usage.share,
                fmt_score_tsv(usage.score),
                usage.kind,
            );
        }
    }
}
