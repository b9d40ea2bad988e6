use crate::reports;
use clap::Args;
use muse_score::config::{CompositeWeights, Config};
use muse_score::dataset::Dataset;
use muse_score::error::{MuseResult, ScoringError};
use muse_score::scorer::{ScoreInput, ScoreResult, Scorer};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub config: Config,

    /// CSV with `income` and `region_id` (or `zip`) columns
    #[arg(short, long)]
    pub input: PathBuf,

    /// Destination CSV (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Both cells are kept as text so a bad value rejects its own row only.
#[derive(Debug, Deserialize)]
struct BatchRow {
    #[serde(default)]
    income: String,
    #[serde(default, alias = "zip")]
    region_id: String,
}

/// One input line: either a scorable request or an income cell that did not parse.
#[derive(Debug)]
enum BatchRequest {
    Valid(ScoreInput),
    Malformed { region_id: String, income: String },
}

impl BatchRequest {
    fn from_row(row: BatchRow) -> Self {
        match row.income.parse::<f64>() {
            Ok(income) => Self::Valid(ScoreInput::new(income, row.region_id)),
            Err(_) => Self::Malformed {
                region_id: row.region_id,
                income: row.income,
            },
        }
    }

    fn region_id(&self) -> &str {
        match self {
            Self::Valid(input) => &input.region_id,
            Self::Malformed { region_id, .. } => region_id,
        }
    }

    fn income(&self) -> Option<f64> {
        match self {
            Self::Valid(input) => Some(input.income),
            Self::Malformed { .. } => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct BatchOutputRow<'a> {
    region_id: &'a str,
    income: Option<f64>,
    score: Option<u32>,
    tier: Option<String>,
    ratio: Option<f64>,
    error: Option<String>,
}

impl<'a> BatchOutputRow<'a> {
    fn new(request: &'a BatchRequest, outcome: &Result<ScoreResult, ScoringError>) -> Self {
        let region_id = request.region_id();
        let income = request.income();
        match outcome {
            Ok(r) => Self {
                region_id,
                income,
                score: Some(r.score),
                tier: Some(r.tier.to_string()),
                ratio: Some(r.ratio),
                error: None,
            },
            Err(e) => Self {
                region_id,
                income,
                score: None,
                tier: None,
                ratio: None,
                error: Some(e.to_string()),
            },
        }
    }
}

fn read_requests(path: &Path) -> MuseResult<Vec<BatchRequest>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let mut requests = Vec::new();
    for row in rdr.deserialize::<BatchRow>() {
        let request = BatchRequest::from_row(row?);
        if let BatchRequest::Malformed { income, .. } = &request {
            warn!("Row {}: unparseable income '{}'", requests.len() + 2, income);
        }
        requests.push(request);
    }
    Ok(requests)
}

/// Malformed rows are rejected in place; output order follows input order.
fn score_requests(
    scorer: &Scorer,
    requests: &[BatchRequest],
    dataset: &Dataset,
) -> Vec<Result<ScoreResult, ScoringError>> {
    requests
        .par_iter()
        .map(|request| match request {
            BatchRequest::Valid(input) => scorer.score(input, dataset),
            BatchRequest::Malformed { income, .. } => {
                Err(ScoringError::MalformedIncome(income.clone()))
            }
        })
        .collect()
}

pub fn run(args: &BatchArgs, weights: CompositeWeights, dataset: &Dataset) -> MuseResult<()> {
    let requests = read_requests(&args.input)?;
    info!(
        "📊 Scoring {} rows from {} ({} mode)",
        requests.len(),
        args.input.display(),
        args.config.engine.mode
    );

    let scorer = Scorer::new(args.config.engine.mode).with_weights(weights);
    let results = score_requests(&scorer, &requests, dataset);

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let mut wtr = csv::Writer::from_writer(sink);
    for (request, outcome) in requests.iter().zip(&results) {
        wtr.serialize(BatchOutputRow::new(request, outcome))?;
    }
    wtr.flush()?;

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!("   -> {} scored, {} rejected.", results.len() - failed, failed);

    // Keep stdout clean when it carries the CSV.
    if let Some(path) = &args.output {
        info!("💾 Results written to {}", path.display());
        reports::print_tier_distribution(&results);
    }
    Ok(())
}
