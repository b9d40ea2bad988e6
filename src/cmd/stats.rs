use crate::reports;
use clap::Args;
use muse_score::dataset::{Dataset, RegionRecord};
use muse_score::error::MuseResult;

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// Number of highest-income regions to list
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

pub fn run(args: &StatsArgs, dataset: &Dataset) -> MuseResult<()> {
    let mut ranked: Vec<(&RegionRecord, f64)> = dataset
        .records()
        .iter()
        .filter_map(|r| r.usable_reference_income().map(|income| (r, income)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.region_id.cmp(&b.0.region_id)));
    ranked.truncate(args.top);

    reports::print_dataset_stats(dataset.stats());
    if !ranked.is_empty() {
        reports::print_region_ranking(&ranked);
    }
    Ok(())
}
