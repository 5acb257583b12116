use std::path::{Path, PathBuf};

use clap::Args;

use crate::cli::{fmt_score_tsv, InputArgs, OutputFormat};
use crate::core::observation::ObservationTable;
use crate::matching::engine::Matcher;
use crate::matching::report::MatchReport;
use crate::parsing::detect_delimiter;

#[derive(Args)]
pub struct MatchArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the augmented observation table (input columns + score) here
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Execute match subcommand
///
/// # Errors
///
/// Returns an error if an input cannot be parsed or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: MatchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let (mut table, exposure) = args.input.load()?;

    if verbose {
        eprintln!(
            "Loaded {} observation rows and {} exposure codes",
            table.len(),
            exposure.len()
        );
    }
    if exposure.is_empty() {
        eprintln!("Warning: exposure table is empty, every code will be unmatched.");
    }

    let matcher = Matcher::with_config(&exposure, args.input.match_config());
    let outcome = matcher.match_table(&mut table);

    match format {
        OutputFormat::Text => print_text_report(&outcome.report),
        OutputFormat::Json => print_json_report(&outcome.report)?,
        OutputFormat::Tsv => print_tsv_report(&outcome.report),
    }

    if let Some(path) = &args.out {
        write_augmented(path, &table, &args.input)?;
        if verbose {
            eprintln!("Wrote augmented table to {}", path.display());
        }
    }

    Ok(())
}

fn print_text_report(report: &MatchReport) {
    println!(
        "Matched {} observation rows ({} distinct codes)",
        report.total_rows, report.total_codes
    );
    println!(
        "\n  Exact:     {} rows ({:.1}%), {} codes",
        report.exact_rows,
        report.exact_pct(),
        report.exact_codes
    );
    println!(
        "  Fuzzy:     {} rows ({:.1}%), {} codes",
        report.fuzzy_rows,
        report.fuzzy_pct(),
        report.fuzzy_codes
    );
    println!(
        "  Unmatched: {} rows ({:.1}%), {} codes",
        report.unmatched_rows,
        report.unmatched_pct(),
        report.unmatched_codes
    );
    println!("  Total matched: {:.1}%", report.matched_pct());

    if !report.top_unmatched.is_empty() {
        println!("\nTop codes that couldn't be matched:");
        for (code, count) in &report.top_unmatched {
            println!("  {code:<8} {count} observations");
        }
    }
}

fn print_json_report(report: &MatchReport) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "created_at": chrono::Utc::now().to_rfc3339(),
        "report": report,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_report(report: &MatchReport) {
    println!(
        "total_rows\texact_rows\tfuzzy_rows\tunmatched_rows\ttotal_codes\texact_codes\tfuzzy_codes\tunmatched_codes"
    );
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        report.total_rows,
        report.exact_rows,
        report.fuzzy_rows,
        report.unmatched_rows,
        report.total_codes,
        report.exact_codes,
        report.fuzzy_codes,
        report.unmatched_codes,
    );
}

/// Write the observation table back out with its populated score column.
///
/// The header reuses the configured input column names; the title column is
/// included only when at least one row carries a title. Unmatched rows get an
/// empty score field.
fn write_augmented(path: &Path, table: &ObservationTable, input: &InputArgs) -> anyhow::Result<()> {
    let delimiter = input.delimiter.unwrap_or_else(|| detect_delimiter(path));
    let with_titles = table.rows.iter().any(|row| row.title.is_some());

    let mut header: Vec<&str> = vec![&input.code_column, &input.group_column];
    if with_titles {
        header.push(&input.title_column);
    }
    header.push(&input.weight_column);
    header.push("score");

    let mut out = String::new();
    out.push_str(&header.join(&delimiter.to_string()));
    out.push('\n');

    for row in &table.rows {
        let mut fields: Vec<String> = vec![row.code.clone(), row.group.to_string()];
        if with_titles {
            fields.push(row.title.clone().unwrap_or_default());
        }
        fields.push(format!("{}", row.weight));
        fields.push(fmt_score_tsv(row.score));
        out.push_str(&fields.join(&delimiter.to_string()));
        out.push('\n');
    }

    std::fs::write(path, out)?;
    Ok(())
}
