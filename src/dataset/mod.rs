pub mod loader;
pub mod region;

pub use self::region::RegionRecord;
use crate::config::ColumnMap;
use crate::error::{DataLoadError, ScoringError};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Width of a normalized region identifier (zero-padded postal code).
pub const REGION_ID_WIDTH: usize = 5;

/// Canonical region key: trimmed, trailing `.0` removed, zero-padded to five digits.
///
/// Both the loader and [`Dataset::lookup`] go through this function, so
/// `"501"`, `"00501"` and `"501.0"` all resolve to the same row.
pub fn normalize_region_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix(".0").unwrap_or(trimmed);

    if digits.is_empty()
        || digits.len() > REGION_ID_WIDTH
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    Some(format!("{:0>width$}", digits, width = REGION_ID_WIDTH))
}

/// Dataset-wide figures computed once at load.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStats {
    pub region_count: usize,
    pub unusable_income_count: usize,
    pub max_reference_income: Option<f64>,
    pub max_density: Option<f64>,
    pub max_income_per_capita: Option<f64>,
}

impl DatasetStats {
    fn compute(records: &[RegionRecord]) -> Self {
        fn fold_max(acc: Option<f64>, v: f64) -> Option<f64> {
            Some(acc.map_or(v, |a| a.max(v)))
        }

        let mut stats = DatasetStats {
            region_count: records.len(),
            ..Default::default()
        };

        for r in records {
            match r.usable_reference_income() {
                Some(income) => {
                    stats.max_reference_income = fold_max(stats.max_reference_income, income)
                }
                None => stats.unusable_income_count += 1,
            }
            if let Some(d) = r.density {
                stats.max_density = fold_max(stats.max_density, d);
            }
            if let Some(ipc) = r.income_per_capita() {
                stats.max_income_per_capita = fold_max(stats.max_income_per_capita, ipc);
            }
        }

        stats
    }
}

/// Immutable, indexed reference table. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<RegionRecord>,
    index: HashMap<String, usize>,
    stats: DatasetStats,
}

impl Dataset {
    pub fn from_records(records: Vec<RegionRecord>) -> Result<Self, DataLoadError> {
        if records.is_empty() {
            return Err(DataLoadError::Empty);
        }

        let mut index = HashMap::with_capacity(records.len());
        for (i, r) in records.iter().enumerate() {
            if index.insert(r.region_id.clone(), i).is_some() {
                return Err(DataLoadError::DuplicateRegion(r.region_id.clone()));
            }
        }

        let stats = DatasetStats::compute(&records);
        if stats.unusable_income_count > 0 {
            warn!(
                "⚠️  {} of {} regions have a missing or non-positive reference income.",
                stats.unusable_income_count, stats.region_count
            );
        }

        Ok(Self {
            records,
            index,
            stats,
        })
    }

    pub fn from_reader<R: Read>(reader: R, columns: &ColumnMap) -> Result<Self, DataLoadError> {
        let records = loader::load_regions(reader, columns)?;
        Self::from_records(records)
    }

    pub fn from_path<P: AsRef<Path>>(path: P, columns: &ColumnMap) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        info!("📂 Loading reference table: {}", path.display());
        let file = File::open(path)?;
        let dataset = Self::from_reader(file, columns)?;
        info!("   -> Loaded {} regions.", dataset.len());
        Ok(dataset)
    }

    /// Exact match on the normalized identifier. No fuzzy or prefix matching.
    pub fn lookup(&self, region_id: &str) -> Result<&RegionRecord, ScoringError> {
        normalize_region_id(region_id)
            .and_then(|key| self.index.get(&key))
            .map(|&i| &self.records[i])
            .ok_or_else(|| ScoringError::RegionNotFound(region_id.trim().to_string()))
    }

    pub fn records(&self) -> &[RegionRecord] {
        &self.records
    }

    pub fn stats(&self) -> &DatasetStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
