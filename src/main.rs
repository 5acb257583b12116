use clap::Parser;
use tracing_subscriber::EnvFilter;

mod aggregate;
mod cli;
mod core;
mod diagnostics;
mod matching;
mod parsing;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("soc_exposure=debug,info")
    } else {
        EnvFilter::new("soc_exposure=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Match(args) => {
            cli::match_cmd::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Diagnose(args) => {
            cli::diagnose::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Aggregate(args) => {
            cli::aggregate::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
