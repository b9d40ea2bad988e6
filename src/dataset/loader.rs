use super::region::RegionRecord;
use super::normalize_region_id;
use crate::config::ColumnMap;
use crate::error::DataLoadError;
use std::io::Read;
use tracing::{debug, warn};

/// Header positions resolved against a [`ColumnMap`].
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    region_id: usize,
    reference_income: usize,
    population: usize,
    density: usize,
    business_count: usize,
    total_income_amount: usize,
    city: usize,
    state: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord, columns: &ColumnMap) -> Result<Self, DataLoadError> {
        let find = |name: &str| -> Result<usize, DataLoadError> {
            let wanted = name.trim();
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(wanted))
                .ok_or_else(|| DataLoadError::MissingColumn(wanted.to_string()))
        };

        Ok(Self {
            region_id: find(&columns.region_id)?,
            reference_income: find(&columns.reference_income)?,
            population: find(&columns.population)?,
            density: find(&columns.density)?,
            business_count: find(&columns.business_count)?,
            total_income_amount: find(&columns.total_income_amount)?,
            city: find(&columns.city)?,
            state: find(&columns.state)?,
        })
    }
}

/// Parses a non-negative finite amount. Anything else is treated as missing.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Parses a whole non-negative count, accepting float renderings such as `1200.0`.
pub fn parse_count(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<u64>() {
        return Some(v);
    }
    let value = parse_amount(trimmed)?;
    if value.fract() == 0.0 && value <= u64::MAX as f64 {
        Some(value as u64)
    } else {
        None
    }
}

/// Reads region rows from CSV. Rows whose identifier cannot be normalized are skipped.
pub fn load_regions<R: Read>(
    reader: R,
    columns: &ColumnMap,
) -> Result<Vec<RegionRecord>, DataLoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let idx = ColumnIndex::resolve(&headers, columns)?;

    let mut regions = Vec::new();
    let mut skipped = 0usize;

    for (row, result) in rdr.records().enumerate() {
        let rec = match result {
            Ok(rec) => rec,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) => {
                skipped += 1;
                debug!("Row {}: not valid UTF-8", row + 2);
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let field = |i: usize| rec.get(i).unwrap_or("").trim();

        let Some(region_id) = normalize_region_id(field(idx.region_id)) else {
            skipped += 1;
            debug!(
                "Row {}: unusable region identifier '{}'",
                row + 2,
                field(idx.region_id)
            );
            continue;
        };

        regions.push(RegionRecord {
            region_id,
            reference_income: parse_amount(field(idx.reference_income)),
            population: parse_count(field(idx.population)),
            density: parse_amount(field(idx.density)),
            business_count: parse_count(field(idx.business_count)),
            total_income_amount: parse_amount(field(idx.total_income_amount)),
            city: field(idx.city).to_string(),
            state: field(idx.state).to_string(),
        });
    }

    if skipped > 0 {
        warn!("⚠️  Skipped {} rows with unreadable or invalid region identifiers.", skipped);
    }

    Ok(regions)
}
