use crate::error::{MuseError, MuseResult};
use crate::scorer::ScoringMode;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[command(flatten)]
    pub engine: EngineParams,
    #[command(flatten)]
    pub weights: CompositeWeights,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    /// Score mapping applied to the income ratio
    #[arg(long, value_enum, default_value_t = ScoringMode::Continuous)]
    pub mode: ScoringMode,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            mode: ScoringMode::Continuous,
        }
    }
}

/// Weights for the multi-factor composite strategy. Only read in composite mode.
#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeWeights {
    #[arg(long, default_value_t = 0.4)]
    pub weight_income: f64,
    #[arg(long, default_value_t = 0.2)]
    pub weight_cost_of_living: f64,
    #[arg(long, default_value_t = 0.2)]
    pub weight_density: f64,
    #[arg(long, default_value_t = 0.2)]
    pub weight_housing: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            weight_income: 0.4,
            weight_cost_of_living: 0.2,
            weight_density: 0.2,
            weight_housing: 0.2,
        }
    }
}

impl CompositeWeights {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> MuseResult<Self> {
        let content = fs::read_to_string(path)?;
        let weights: Self = serde_json::from_str(&content)?;
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> MuseResult<()> {
        let fields = [
            ("weight_income", self.weight_income),
            ("weight_cost_of_living", self.weight_cost_of_living),
            ("weight_density", self.weight_density),
            ("weight_housing", self.weight_housing),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(MuseError::Config(format!(
                    "{} must be a finite, non-negative number (got {})",
                    name, value
                )));
            }
        }
        if !self.total().is_finite() {
            return Err(MuseError::Config(
                "composite weights must sum to a finite number".to_string(),
            ));
        }
        Ok(())
    }

    pub fn total(&self) -> f64 {
        self.weight_income + self.weight_cost_of_living + self.weight_density + self.weight_housing
    }

    /// Copies only the flags the user actually typed onto file-loaded weights.
    pub fn merge_from_cli(&mut self, cli_weights: &CompositeWeights, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli_weights.$field;
                }
            };
        }

        update_if_present!(weight_income, "weight_income");
        update_if_present!(weight_cost_of_living, "weight_cost_of_living");
        update_if_present!(weight_density, "weight_density");
        update_if_present!(weight_housing, "weight_housing");
    }
}

/// Maps source table headers onto region fields. Matching is trimmed and case-insensitive.
#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    #[arg(id = "col_region", long = "col-region", global = true, default_value = "zip")]
    pub region_id: String,
    #[arg(id = "col_income", long = "col-income", global = true, default_value = "adjusted_gross_income")]
    pub reference_income: String,
    #[arg(id = "col_population", long = "col-population", global = true, default_value = "population")]
    pub population: String,
    #[arg(id = "col_density", long = "col-density", global = true, default_value = "density")]
    pub density: String,
    #[arg(id = "col_businesses", long = "col-businesses", global = true, default_value = "business_count")]
    pub business_count: String,
    #[arg(id = "col_total_income", long = "col-total-income", global = true, default_value = "total_income_amount")]
    pub total_income_amount: String,
    #[arg(id = "col_city", long = "col-city", global = true, default_value = "city")]
    pub city: String,
    #[arg(id = "col_state", long = "col-state", global = true, default_value = "state")]
    pub state: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            region_id: "zip".to_string(),
            reference_income: "adjusted_gross_income".to_string(),
            population: "population".to_string(),
            density: "density".to_string(),
            business_count: "business_count".to_string(),
            total_income_amount: "total_income_amount".to_string(),
            city: "city".to_string(),
            state: "state".to_string(),
        }
    }
}
