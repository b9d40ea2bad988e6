pub mod composite;
pub mod engine;
pub mod types;

pub use self::types::{CompositeBreakdown, ScoreInput, ScoreResult, ScoringMode, Tier};
use crate::config::{CompositeWeights, Config};
use crate::dataset::Dataset;
use crate::error::ScoringError;
use rayon::prelude::*;
use tracing::debug;

/// Stateless scoring engine. Holds only the mode and composite weights.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    pub mode: ScoringMode,
    pub weights: CompositeWeights,
}

impl Scorer {
    pub fn new(mode: ScoringMode) -> Self {
        Self {
            mode,
            weights: CompositeWeights::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            mode: config.engine.mode,
            weights: config.weights.clone(),
        }
    }

    pub fn with_weights(mut self, weights: CompositeWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Resolve, ratio, map, classify. Pure function of input, dataset and configuration.
    pub fn score(&self, input: &ScoreInput, dataset: &Dataset) -> Result<ScoreResult, ScoringError> {
        let (region, reference) = engine::resolve_reference(dataset, &input.region_id)?;
        let income = engine::sanitize_income(input.income);
        let ratio = engine::income_ratio(income, reference);

        let (score, breakdown) = match self.mode {
            ScoringMode::Continuous => (engine::continuous_score(ratio), None),
            ScoringMode::Stepped => (engine::stepped_score(ratio), None),
            ScoringMode::Composite => {
                let b = composite::breakdown(income, region, dataset.stats(), &self.weights)?;
                (composite::composite_score(&b), Some(b))
            }
        };
        let tier = engine::classify_tier(score);

        debug!(
            "Scored region {} ({}): ratio={:.4} score={} tier={}",
            region.region_id, self.mode, ratio, score, tier
        );

        Ok(ScoreResult {
            score,
            tier,
            ratio,
            mode: self.mode,
            region: region.clone(),
            breakdown,
        })
    }

    /// Scores every input in parallel. Output order matches input order.
    pub fn score_many(
        &self,
        inputs: &[ScoreInput],
        dataset: &Dataset,
    ) -> Vec<Result<ScoreResult, ScoringError>> {
        inputs
            .par_iter()
            .map(|input| self.score(input, dataset))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::RegionRecord;

    fn region(id: &str, income: Option<f64>) -> RegionRecord {
        RegionRecord {
            region_id: id.to_string(),
            reference_income: income,
            population: Some(1_000),
            density: Some(100.0),
            business_count: Some(10),
            total_income_amount: Some(30_000.0),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
        }
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            region("60000", Some(60_000.0)),
            region("50000", Some(50_000.0)),
            region("00000", Some(0.0)),
            region("00001", None),
        ])
        .unwrap()
    }

    #[test]
    fn test_ratio_at_reference_scores_500() {
        let r = Scorer::new(ScoringMode::Continuous)
            .score(&ScoreInput::new(60_000.0, "60000"), &dataset())
            .unwrap();
        assert_eq!(r.ratio, 1.0);
        assert_eq!(r.score, 500);
        assert_eq!(r.tier, Tier::FinancialStress);
        assert_eq!(r.region.region_id, "60000");
        assert!(r.breakdown.is_none());
    }

    #[test]
    fn test_double_reference_is_excellent() {
        let r = Scorer::new(ScoringMode::Continuous)
            .score(&ScoreInput::new(120_000.0, "60000"), &dataset())
            .unwrap();
        assert_eq!(r.ratio, 2.0);
        assert_eq!(r.score, 800);
        assert_eq!(r.tier, Tier::Excellent);
    }

    #[test]
    fn test_stepped_ninety_percent() {
        let r = Scorer::new(ScoringMode::Stepped)
            .score(&ScoreInput::new(45_000.0, "50000"), &dataset())
            .unwrap();
        assert!((r.ratio - 0.9).abs() < 1e-12);
        assert_eq!(r.score, 580);
        assert_eq!(r.tier, Tier::AtRisk);
    }

    #[test]
    fn test_unusable_reference_income_halts() {
        let ds = dataset();
        for mode in [ScoringMode::Continuous, ScoringMode::Stepped, ScoringMode::Composite] {
            let scorer = Scorer::new(mode);
            assert_eq!(
                scorer.score(&ScoreInput::new(50_000.0, "00000"), &ds),
                Err(ScoringError::InvalidReferenceIncome("00000".to_string()))
            );
            assert_eq!(
                scorer.score(&ScoreInput::new(50_000.0, "1"), &ds),
                Err(ScoringError::InvalidReferenceIncome("00001".to_string()))
            );
        }
    }

    #[test]
    fn test_unknown_region_halts() {
        let r = Scorer::new(ScoringMode::Continuous).score(&ScoreInput::new(50_000.0, "99999"), &dataset());
        assert_eq!(r, Err(ScoringError::RegionNotFound("99999".to_string())));
    }

    #[test]
    fn test_composite_attaches_breakdown() {
        let r = Scorer::new(ScoringMode::Composite)
            .score(&ScoreInput::new(60_000.0, "60000"), &dataset())
            .unwrap();
        let b = r.breakdown.expect("composite result carries breakdown");
        assert!((b.income_score - 1.0).abs() < 1e-12);
        assert!((450..=850).contains(&r.score));
        assert_eq!(r.mode, ScoringMode::Composite);
    }

    #[test]
    fn test_score_many_preserves_order() {
        let ds = dataset();
        let inputs = vec![
            ScoreInput::new(120_000.0, "60000"),
            ScoreInput::new(1.0, "99999"),
            ScoreInput::new(45_000.0, "50000"),
        ];
        let results = Scorer::new(ScoringMode::Continuous).score_many(&inputs, &ds);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().score, 800);
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().region.region_id, "50000");
    }
}
