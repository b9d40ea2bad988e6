use thiserror::Error;

/// Failures while reading the reference table. Fatal at startup.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Duplicate region identifier '{0}'")]
    DuplicateRegion(String),

    #[error("Reference table contains no usable region rows")]
    Empty,
}

/// Recoverable per-request failures. The caller may retry with another region.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("Region '{0}' not found in reference dataset")]
    RegionNotFound(String),

    #[error("Region '{0}' has a missing or non-positive reference income")]
    InvalidReferenceIncome(String),

    #[error("Income '{0}' is missing or not a number")]
    MalformedIncome(String),

    #[error("Region '{region_id}' is missing '{field}' required by composite scoring")]
    IncompleteRegionData {
        region_id: String,
        field: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum MuseError {
    #[error("Data Load Error: {0}")]
    DataLoad(#[from] DataLoadError),

    #[error("Scoring Error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),
}

pub type MuseResult<T> = Result<T, MuseError>;
