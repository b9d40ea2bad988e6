//! Multi-factor strategy: blends the caller's income with regional cost proxies.
//!
//! Each factor is a share of the dataset-wide maximum, so the result depends on
//! the whole table and not just the matched row.

use super::engine::bounded_score;
use super::types::CompositeBreakdown;
use crate::config::CompositeWeights;
use crate::dataset::{DatasetStats, RegionRecord};
use crate::error::ScoringError;

/// Score at `raw == 0` before clamping.
pub const COMPOSITE_BASE: f64 = 350.0;
/// Points per unit of weighted raw score.
pub const COMPOSITE_SPAN: f64 = 500.0;

/// `value / max`, or 0 when there is no positive maximum to compare against.
fn share(value: f64, max: Option<f64>) -> f64 {
    match max {
        Some(m) if m > 0.0 => value / m,
        _ => 0.0,
    }
}

/// A zero weight switches its factor off, even when the factor is infinite.
fn weighted(weight: f64, factor: f64) -> f64 {
    if weight == 0.0 {
        0.0
    } else {
        weight * factor
    }
}

fn require<T>(value: Option<T>, region: &RegionRecord, field: &'static str) -> Result<T, ScoringError> {
    value.ok_or_else(|| ScoringError::IncompleteRegionData {
        region_id: region.region_id.clone(),
        field,
    })
}

/// Computes the four factor scores and their weighted sum.
///
/// `income` must already be sanitized. The region's reference income is
/// checked by the caller before this runs.
pub fn breakdown(
    income: f64,
    region: &RegionRecord,
    stats: &DatasetStats,
    weights: &CompositeWeights,
) -> Result<CompositeBreakdown, ScoringError> {
    let income_per_capita = require(region.income_per_capita(), region, "population")?;
    let density = require(region.density, region, "density")?;
    let housing_per_capita = require(
        region.total_income_per_capita(),
        region,
        "total_income_amount",
    )?;

    let income_score = share(income, stats.max_reference_income);
    let cost_of_living_score = 1.0 - share(income_per_capita, stats.max_income_per_capita);
    let density_score = 1.0 - share(density, stats.max_density);
    let housing_score = 1.0 - share(housing_per_capita, stats.max_income_per_capita);

    let raw = weighted(weights.weight_income, income_score)
        + weighted(weights.weight_cost_of_living, cost_of_living_score)
        + weighted(weights.weight_density, density_score)
        + weighted(weights.weight_housing, housing_score);

    Ok(CompositeBreakdown {
        income_score,
        cost_of_living_score,
        density_score,
        housing_score,
        raw,
    })
}

pub fn composite_score(b: &CompositeBreakdown) -> u32 {
    bounded_score(COMPOSITE_BASE + b.raw * COMPOSITE_SPAN)
}
