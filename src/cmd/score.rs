use crate::reports;
use clap::Args;
use muse_score::config::{CompositeWeights, Config};
use muse_score::dataset::Dataset;
use muse_score::error::MuseResult;
use muse_score::scorer::{ScoreInput, Scorer};

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub config: Config,

    /// Annual income to compare against the region's reference income
    #[arg(long, allow_negative_numbers = true)]
    pub income: f64,

    /// Region identifier (5-digit ZIP; leading zeros optional)
    #[arg(short = 'z', long = "zip")]
    pub region_id: String,

    /// Print the result as JSON instead of a table
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &ScoreArgs, weights: CompositeWeights, dataset: &Dataset) -> MuseResult<()> {
    let scorer = Scorer::new(args.config.engine.mode).with_weights(weights);
    let result = scorer.score(&ScoreInput::new(args.income, &args.region_id), dataset)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        reports::print_score_report(&result);
    }
    Ok(())
}
