use crate::dataset::RegionRecord;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Linear map of the ratio centered on 500
    #[default]
    Continuous,
    /// Four fixed ratio bands
    Stepped,
    /// Weighted blend of income, cost-of-living, density and housing proxies
    Composite,
}

/// Ordered from weakest to strongest standing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
pub enum Tier {
    #[strum(serialize = "Financial Stress")]
    #[serde(rename = "Financial Stress")]
    FinancialStress,
    #[strum(serialize = "At Risk")]
    #[serde(rename = "At Risk")]
    AtRisk,
    #[strum(serialize = "Good")]
    #[serde(rename = "Good")]
    Good,
    #[strum(serialize = "Excellent")]
    #[serde(rename = "Excellent")]
    Excellent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreInput {
    pub income: f64,
    pub region_id: String,
}

impl ScoreInput {
    pub fn new(income: f64, region_id: impl Into<String>) -> Self {
        Self {
            income,
            region_id: region_id.into(),
        }
    }
}

/// Per-factor values behind a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeBreakdown {
    pub income_score: f64,
    pub cost_of_living_score: f64,
    pub density_score: f64,
    pub housing_score: f64,
    pub raw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub score: u32,
    pub tier: Tier,
    pub ratio: f64,
    pub mode: ScoringMode,
    pub region: RegionRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<CompositeBreakdown>,
}
