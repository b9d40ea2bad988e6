use serde::{Deserialize, Serialize};

/// One row of the reference table. Numeric fields that failed to parse are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRecord {
    pub region_id: String,
    pub reference_income: Option<f64>,
    pub population: Option<u64>,
    pub density: Option<f64>,
    pub business_count: Option<u64>,
    pub total_income_amount: Option<f64>,
    pub city: String,
    pub state: String,
}

impl RegionRecord {
    /// Reference income when it can serve as a ratio denominator.
    pub fn usable_reference_income(&self) -> Option<f64> {
        self.reference_income.filter(|v| v.is_finite() && *v > 0.0)
    }

    pub fn populated(&self) -> Option<f64> {
        self.population.filter(|&p| p > 0).map(|p| p as f64)
    }

    pub fn income_per_capita(&self) -> Option<f64> {
        Some(self.usable_reference_income()? / self.populated()?)
    }

    /// Aggregate income per resident; the housing-cost proxy.
    pub fn total_income_per_capita(&self) -> Option<f64> {
        Some(self.total_income_amount? / self.populated()?)
    }
}
