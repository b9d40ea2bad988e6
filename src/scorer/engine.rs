use super::types::Tier;
use crate::dataset::{Dataset, RegionRecord};
use crate::error::ScoringError;

pub const SCORE_MIN: u32 = 450;
pub const SCORE_MAX: u32 = 850;

/// Score assigned when income equals the reference income.
pub const CONTINUOUS_CENTER: f64 = 500.0;
/// Points gained per unit of ratio above 1.0.
pub const CONTINUOUS_SLOPE: f64 = 300.0;

/// Lower bound of each stepped band (inclusive) and the score it yields,
/// highest band first.
pub const STEPPED_BANDS: [(f64, u32); 3] = [(1.2, 770), (1.0, 680), (0.8, 580)];
pub const STEPPED_FLOOR: u32 = 520;

/// Minimum score (inclusive) for each tier, highest first.
pub const TIER_THRESHOLDS: [(u32, Tier); 3] = [
    (750, Tier::Excellent),
    (650, Tier::Good),
    (550, Tier::AtRisk),
];

/// Resolves the region and its usable reference income.
pub fn resolve_reference<'a>(
    dataset: &'a Dataset,
    region_id: &str,
) -> Result<(&'a RegionRecord, f64), ScoringError> {
    let region = dataset.lookup(region_id)?;
    let reference = region
        .usable_reference_income()
        .ok_or_else(|| ScoringError::InvalidReferenceIncome(region.region_id.clone()))?;
    Ok((region, reference))
}

/// Negative and NaN incomes collapse to zero.
#[inline]
pub fn sanitize_income(income: f64) -> f64 {
    income.max(0.0)
}

/// `income` must already be sanitized and `reference` positive;
/// [`resolve_reference`] guarantees the latter.
#[inline]
pub fn income_ratio(income: f64, reference: f64) -> f64 {
    income / reference
}

/// Clamps a real-valued score into the published range, rounding half away from zero.
/// NaN maps to the floor; infinities saturate at the matching bound.
#[inline]
pub fn bounded_score(raw: f64) -> u32 {
    if raw.is_nan() {
        return SCORE_MIN;
    }
    raw.round().clamp(SCORE_MIN as f64, SCORE_MAX as f64) as u32
}

pub fn continuous_score(ratio: f64) -> u32 {
    bounded_score(CONTINUOUS_CENTER + (ratio - 1.0) * CONTINUOUS_SLOPE)
}

pub fn stepped_score(ratio: f64) -> u32 {
    STEPPED_BANDS
        .iter()
        .find(|(lower, _)| ratio >= *lower)
        .map_or(STEPPED_FLOOR, |&(_, score)| score)
}

pub fn classify_tier(score: u32) -> Tier {
    TIER_THRESHOLDS
        .iter()
        .find(|(min, _)| score >= *min)
        .map_or(Tier::FinancialStress, |&(_, tier)| tier)
}
