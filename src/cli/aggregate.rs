use std::path::{Path, PathBuf};

use clap::Args;

use crate::aggregate::{group_scores, GroupScore};
use crate::cli::{fmt_score, fmt_score_tsv, InputArgs, OutputFormat};
use crate::matching::engine::Matcher;
use crate::parsing::detect_delimiter;

#[derive(Args)]
pub struct AggregateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the group-level table here
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Execute aggregate subcommand
///
/// # Errors
///
/// Returns an error if an input cannot be parsed or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: AggregateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let (mut table, exposure) = args.input.load()?;

    let matcher = Matcher::with_config(&exposure, args.input.match_config());
    let outcome = matcher.match_table(&mut table);

    if verbose {
        eprintln!(
            "Matched {} rows ({:.1}% scored) before aggregation",
            outcome.report.total_rows,
            outcome.report.matched_pct()
        );
    }

    let scores = group_scores(&table);

    match format {
        OutputFormat::Text => print_text_scores(&scores),
        OutputFormat::Json => print_json_scores(&scores)?,
        OutputFormat::Tsv => print_tsv_scores(&scores),
    }

    if let Some(path) = &args.out {
        write_scores(path, &scores, args.input.delimiter)?;
        if verbose {
            eprintln!("Wrote {} group rows to {}", scores.len(), path.display());
        }
    }

    Ok(())
}

fn print_text_scores(scores: &[GroupScore]) {
    println!("Group-level weighted mean exposure ({} groups)\n", scores.len());
    for score in scores {
        let title = score.title.as_deref().unwrap_or("");
        println!(
            "  {:<8} {:<30} rows {:>6}  weight {:>12.1}  mean {:>6}",
            score.group,
            title,
            score.rows,
            score.total_weight,
            fmt_score(score.mean_score),
        );
    }
}

fn print_json_scores(scores: &[GroupScore]) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "created_at": chrono::Utc::now().to_rfc3339(),
        "groups": scores,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_scores(scores: &[GroupScore]) {
    println!("group\ttitle\trows\ttotal_weight\tmean_score");
    for score in scores {
        println!(
            "{}\t{}\t{}\t{:.4}\t{}",
            score.group,
            score.title.as_deref().unwrap_or(""),
            score.rows,
            score.total_weight,
            fmt_score_tsv(score.mean_score),
        );
    }
}

fn write_scores(path: &Path, scores: &[GroupScore], delimiter: Option<char>) -> anyhow::Result<()> {
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(path));
    let sep = delimiter.to_string();

    let mut out = String::new();
    out.push_str(&["group", "title", "rows", "total_weight", "mean_score"].join(&sep));
    out.push('\n');
    for score in scores {
        let fields = [
            score.group.to_string(),
            score.title.clone().unwrap_or_default(),
            score.rows.to_string(),
            format!("{}", score.total_weight),
            fmt_score_tsv(score.mean_score),
        ];
        out.push_str(&fields.join(&sep));
        out.push('\n');
    }

    std::fs::write(path, out)?;
    Ok(())
}
