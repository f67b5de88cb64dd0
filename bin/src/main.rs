//! CLI for fd-scorecard.
//!
//! Scores a symbol from a JSON statement bundle and prints the scored
//! periods as JSON, or lists the credit rating cut-offs.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use fd_scorecard::{
    CreditRating, ReportingFrequency, ScoreEngine, ScorecardConfig, StatementBundle, Symbol,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "fd-scorecard")]
#[command(about = "Altman Z-score, credit rating and F-score scorecards", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a symbol from a statement bundle
    Score(ScoreArgs),
    /// List the credit rating Z-score ranges
    Ratings,
}

#[derive(Args)]
struct ScoreArgs {
    /// Stock symbol
    #[arg(long)]
    symbol: String,
    /// Reporting frequency: a, annual, q or quarterly
    #[arg(long, default_value = "annual")]
    frequency: ReportingFrequency,
    /// JSON statement bundle
    #[arg(long)]
    data: PathBuf,
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    as_of: Option<NaiveDate>,
    /// Do not inspect prices for split adjustment
    #[arg(long)]
    no_split_adjustment: bool,
    /// Include the earliest period, which has no F-score
    #[arg(long)]
    all: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score(args) => score(args),
        Commands::Ratings => {
            for line in rating_table() {
                println!("{line}");
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Resolve the configuration file and flag overrides.
fn load_config(args: &ScoreArgs) -> fd_scorecard::Result<ScorecardConfig> {
    let mut config = match &args.config {
        Some(path) => ScorecardConfig::from_path(path)?,
        None => ScorecardConfig::default(),
    };
    if let Some(as_of) = args.as_of {
        config.as_of = Some(as_of);
    }
    if args.no_split_adjustment {
        config.split_adjustment = false;
    }
    Ok(config)
}

/// Score one symbol and print the rows as JSON.
fn score(args: ScoreArgs) -> fd_scorecard::Result<()> {
    let config = load_config(&args)?;
    let symbol = Symbol::new(args.symbol);

    let bundle = StatementBundle::from_path(&args.data)?;
    info!(%symbol, path = %args.data.display(), "Loaded bundle");
    let source = bundle.into_source(symbol.clone())?;
    let engine = ScoreEngine::new(source.clone(), source).with_config(config)?;

    let output = if args.all {
        serde_json::to_string_pretty(&engine.scorecard(&symbol, args.frequency)?)?
    } else {
        serde_json::to_string_pretty(&engine.run(&symbol, args.frequency)?)?
    };
    println!("{output}");

    Ok(())
}

/// One line per rating, best first.
fn rating_table() -> Vec<String> {
    CreditRating::WORST_FIRST
        .iter()
        .rev()
        .map(|rating| {
            let (lower, upper) = rating.z_range();
            let grade = if rating.is_investment_grade() {
                "investment"
            } else {
                "speculative"
            };
            format!(
                "{:<5} {lower:>5.2} <= Z < {upper:<5.2}  {grade}",
                rating.to_string()
            )
        })
        .collect()
}
