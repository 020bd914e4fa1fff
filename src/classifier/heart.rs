//! Heart-rate families.

use super::extract::{array_at, field, DateAnchor, RecordPath, RecordSpec, ShapeError};
use super::ShapeContext;
use crate::rows::{CandidateRow, TableRows};
use serde_json::Value;

const ZONES: RecordSpec = RecordSpec::new(
    "heart_rate_zones",
    RecordPath::Array("activities-heart"),
    DateAnchor::Record("dateTime"),
    &[field("resting_heart_rate", "value.restingHeartRate")],
)
.with_enrich(zone_columns);

const INTRADAY: RecordSpec = RecordSpec::new(
    "heart_rate",
    RecordPath::Array("activities-heart-intraday.dataset"),
    DateAnchor::Payload("activities-heart.0.dateTime"),
    &[field("time", "time"), field("value", "value")],
);

/// `"Out of Range"` → `out_of_range`
fn zone_key(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// One column group per entry of `value.heartRateZones`
fn zone_columns(record: &Value, row: &mut CandidateRow) -> Result<(), ShapeError> {
    for zone in array_at(record, "value.heartRateZones")? {
        let Some(name) = zone.get("name").and_then(Value::as_str) else {
            continue;
        };
        let key = zone_key(name);
        for (suffix, source) in [
            ("calories_out", "caloriesOut"),
            ("minutes", "minutes"),
            ("min_hr", "min"),
            ("max_hr", "max"),
        ] {
            if let Some(value) = zone.get(source).filter(|v| !v.is_null()) {
                row.insert(format!("{key}_{suffix}"), value.clone());
            }
        }
    }
    Ok(())
}

pub(super) fn zones(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    let mut out = TableRows::new();
    ZONES.extract_into(ctx, payload, &mut out)?;
    Ok(out)
}

pub(super) fn intraday(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    let mut out = TableRows::new();
    INTRADAY.extract_into(ctx, payload, &mut out)?;
    Ok(out)
}
