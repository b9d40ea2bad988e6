use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use muse_score::api;
use muse_score::config::{ColumnMap, CompositeWeights};
use muse_score::error::MuseError;
use std::path::PathBuf;
use std::process;
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        global = true,
        short,
        long,
        default_value = "data/zip_code_demographics.csv"
    )]
    data: PathBuf,

    #[command(flatten)]
    columns: ColumnMap,

    #[arg(global = true, long)]
    weights: Option<PathBuf>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a single income against one region
    Score(cmd::score::ScoreArgs),
    /// Score every row of a CSV file
    Batch(cmd::batch::BatchArgs),
    /// Summarize the reference table
    Stats(cmd::stats::StatsArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    info!("🚀 Initializing Muse Score...");

    let dataset = api::load_reference_dataset(&cli.data, &cli.columns).unwrap_or_else(|e| {
        error!("❌ FATAL ERROR LOADING REFERENCE TABLE:");
        error!("   {}", e);
        process::exit(1);
    });

    let outcome = match &cli.command {
        Commands::Score(args) => {
            let sub = matches.subcommand_matches("score");
            resolve_weights(&cli, &args.config.weights, sub)
                .and_then(|w| cmd::score::run(args, w, dataset))
        }
        Commands::Batch(args) => {
            let sub = matches.subcommand_matches("batch");
            resolve_weights(&cli, &args.config.weights, sub)
                .and_then(|w| cmd::batch::run(args, w, dataset))
        }
        Commands::Stats(args) => cmd::stats::run(args, dataset),
    };

    match outcome {
        Ok(()) => {}
        Err(MuseError::Scoring(e)) => {
            error!("⚠️  {}", e);
            process::exit(2);
        }
        Err(e) => {
            error!("❌ {}", e);
            process::exit(1);
        }
    }
}

/// JSON weights file as the base, explicit CLI flags layered on top.
fn resolve_weights(
    cli: &Cli,
    cli_weights: &CompositeWeights,
    sub_matches: Option<&clap::ArgMatches>,
) -> Result<CompositeWeights, MuseError> {
    let Some(path) = &cli.weights else {
        cli_weights.validate()?;
        return Ok(cli_weights.clone());
    };

    info!("⚖️  Loading Weights from: {}", path.display());
    let mut file_weights = CompositeWeights::load_from_file(path)?;
    match sub_matches {
        Some(m) => file_weights.merge_from_cli(cli_weights, m),
        None => warn!("⚠️  No subcommand matches; CLI weight overrides ignored."),
    }
    file_weights.validate()?;
    Ok(file_weights)
}
