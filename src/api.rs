use crate::config::ColumnMap;
use crate::dataset::Dataset;
use crate::error::{DataLoadError, ScoringError};
use crate::scorer::{ScoreInput, ScoreResult, Scorer, ScoringMode};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::{info, warn};

/// Process-wide reference table and the path it came from.
static DATASET: OnceLock<(PathBuf, Dataset)> = OnceLock::new();
/// Serializes the first load so concurrent callers parse the source once.
static LOAD_GUARD: Mutex<()> = Mutex::new(());

/// Loads the reference table once per process and hands out the shared copy.
///
/// The first successful call parses `path`; every later call returns the
/// cached dataset without touching the filesystem, even if `path` differs.
/// A failed load leaves the cache empty so a later call may retry.
pub fn load_reference_dataset<P: AsRef<Path>>(
    path: P,
    columns: &ColumnMap,
) -> Result<&'static Dataset, DataLoadError> {
    if let Some(ds) = cached(path.as_ref()) {
        return Ok(ds);
    }

    let _guard = LOAD_GUARD.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(ds) = cached(path.as_ref()) {
        return Ok(ds);
    }

    let dataset = Dataset::from_path(path.as_ref(), columns)?;
    let (_, ds) = DATASET.get_or_init(|| (path.as_ref().to_path_buf(), dataset));
    Ok(ds)
}

fn cached(requested: &Path) -> Option<&'static Dataset> {
    let (loaded_from, ds) = DATASET.get()?;
    if loaded_from != requested {
        warn!(
            "Reference table already loaded from {}; ignoring {}",
            loaded_from.display(),
            requested.display()
        );
    }
    Some(ds)
}

/// The cached dataset, if [`load_reference_dataset`] has succeeded.
pub fn reference_dataset() -> Option<&'static Dataset> {
    DATASET.get().map(|(_, ds)| ds)
}

/// Scores one income against one region with default composite weights.
pub fn compute_score(
    income: f64,
    region_id: &str,
    dataset: &Dataset,
    mode: ScoringMode,
) -> Result<ScoreResult, ScoringError> {
    let result = Scorer::new(mode).score(&ScoreInput::new(income, region_id), dataset);
    if let Err(e) = &result {
        info!("Scoring rejected: {}", e);
    }
    result
}
