//! Activity families: daily summaries, per-metric series, exercise logs and
//! active zone minutes.

use super::extract::{
    array_at, either, extract_all, field, lookup, or_zero, project, DateAnchor, Field, RecordPath,
    RecordSpec, ShapeError,
};
use super::ShapeContext;
use crate::rows::{CandidateRow, TableRows};
use crate::schema::builtin::{SeriesTable, ACTIVITY_SERIES, INTRADAY_SERIES};
use serde_json::Value;

const FIRST_ACTIVITY_DATE: &str = "activities.0.startDate";

const ACTIVITY_LOGS: RecordSpec = RecordSpec::new(
    "activity_logs",
    RecordPath::Array("activities"),
    DateAnchor::Record("startDate"),
    &[
        field("activity_id", "activityId"),
        field("activity_parent_id", "activityParentId"),
        field("activity_parent_name", "activityParentName"),
        field("calories", "calories"),
        field("description", "description"),
        field("distance", "distance"),
        field("duration", "duration"),
        field("has_active_zone_minutes", "hasActiveZoneMinutes"),
        field("has_start_time", "hasStartTime"),
        field("is_favorite", "isFavorite"),
        field("last_modified", "lastModified"),
        field("log_id", "logId"),
        field("name", "name"),
        field("start_date", "startDate"),
        field("start_time", "startTime"),
        field("steps", "steps"),
    ],
);

const ACTIVITY_GOALS: RecordSpec = RecordSpec::new(
    "activity_goals",
    RecordPath::Single("goals"),
    DateAnchor::Payload(FIRST_ACTIVITY_DATE),
    &[
        field("active_minutes", "activeMinutes"),
        field("calories_out", "caloriesOut"),
        field("distance", "distance"),
        field("floors", "floors"),
        field("steps", "steps"),
    ],
);

const ACTIVITY_SUMMARY: RecordSpec = RecordSpec::new(
    "activity_summary",
    RecordPath::Single("summary"),
    DateAnchor::Payload(FIRST_ACTIVITY_DATE),
    &[
        field("active_score", "activeScore"),
        field("activity_calories", "activityCalories"),
        field("calories_bmr", "caloriesBMR"),
        field("calories_out", "caloriesOut"),
        field("elevation", "elevation"),
        field("fairly_active_minutes", "fairlyActiveMinutes"),
        field("floors", "floors"),
        field("lightly_active_minutes", "lightlyActiveMinutes"),
        field("marginal_calories", "marginalCalories"),
        field("resting_heart_rate", "restingHeartRate"),
        field("sedentary_minutes", "sedentaryMinutes"),
        field("steps", "steps"),
        field("very_active_minutes", "veryActiveMinutes"),
    ],
);

const LOG_LIST: RecordSpec = RecordSpec::new(
    "activity_log_list",
    RecordPath::Array("activities"),
    DateAnchor::RecordDatePart("originalStartTime"),
    &[
        either("activity_duration", "activeDuration", "activityDuration"),
        field("activity_name", "activityName"),
        field("activity_type_id", "activityTypeId"),
        field("calories", "calories"),
        field("duration", "duration"),
        field("elevation_gain", "elevationGain"),
        field("last_modified", "lastModified"),
        field("log_id", "logId"),
        field("log_type", "logType"),
        field("original_duration", "originalDuration"),
        field("original_start_time", "originalStartTime"),
        field("start_time", "startTime"),
        field("steps", "steps"),
        field("tcx_link", "tcxLink"),
        field("calories_link", "caloriesLink"),
    ],
)
.with_enrich(activity_levels);

const INTRADAY_CALORIES: RecordSpec = RecordSpec::new(
    "intraday_calories",
    RecordPath::Array("activities-calories-intraday.dataset"),
    DateAnchor::Payload("activities-calories.0.dateTime"),
    INTRADAY_FIELDS,
);

const INTRADAY_FIELDS: &[Field] = &[
    field("level", "level"),
    field("mets", "mets"),
    field("time", "time"),
    field("value", "value"),
];

const ZONE_MINUTES: &[Field] = &[
    or_zero(field("value", "value.activeZoneMinutes")),
    field("fat_burn_active_zone_minutes", "value.fatBurnActiveZoneMinutes"),
    field("cardio_active_zone_minutes", "value.cardioActiveZoneMinutes"),
    field("peak_active_zone_minutes", "value.peakActiveZoneMinutes"),
];

const AZM_TIME_SERIES: RecordSpec = RecordSpec::new(
    "azm_time_series",
    RecordPath::Array("activities-active-zone-minutes"),
    DateAnchor::Record("dateTime"),
    ZONE_MINUTES,
);

const AZM_INTRADAY: RecordSpec = RecordSpec::new(
    "azm_intraday",
    RecordPath::Nested {
        outer: "activities-active-zone-minutes-intraday",
        inner: "minutes",
    },
    DateAnchor::Parent("dateTime"),
    &[
        field("time", "minute"),
        or_zero(field("value", "value.activeZoneMinutes")),
        field("fat_burn_active_zone_minutes", "value.fatBurnActiveZoneMinutes"),
        field("cardio_active_zone_minutes", "value.cardioActiveZoneMinutes"),
        field("peak_active_zone_minutes", "value.peakActiveZoneMinutes"),
    ],
);

/// `activityLevel: [{name, minutes}]` → `activity_level_<name>`
fn activity_levels(record: &Value, row: &mut CandidateRow) -> Result<(), ShapeError> {
    let Some(levels) = record.get("activityLevel").and_then(Value::as_array) else {
        return Ok(());
    };
    for level in levels {
        if let (Some(name), Some(minutes)) = (
            level.get("name").and_then(Value::as_str),
            lookup(level, "minutes"),
        ) {
            row.insert(format!("activity_level_{}", name.to_lowercase()), minutes.clone());
        }
    }
    Ok(())
}

/// Destination for a series key: the known table, else the key with
/// dashes replaced.
fn series_table(series: &[SeriesTable], key: &str) -> String {
    series
        .iter()
        .find(|s| s.endpoint.eq_ignore_ascii_case(key))
        .map_or_else(|| key.replace('-', "_"), |s| s.table.to_string())
}

pub(super) fn time_series(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    let key = payload
        .as_object()
        .and_then(|map| map.keys().next())
        .ok_or(ShapeError::UnknownSeries)?;

    let mut rows = Vec::new();
    for record in array_at(payload, key)? {
        let mut row = ctx.row(lookup(record, "dateTime").cloned());
        project(record, &[field("value", "value")], &mut row);
        rows.push(row);
    }

    let mut out = TableRows::new();
    out.extend_table(&series_table(ACTIVITY_SERIES, key), rows);
    Ok(out)
}

pub(super) fn daily_summary(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    extract_all(ctx, payload, &[ACTIVITY_LOGS, ACTIVITY_GOALS, ACTIVITY_SUMMARY])
}

/// Intraday steps, distance, floors or elevation. The series is found by
/// its `<endpoint>-intraday` key.
pub(super) fn intraday(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    let map = payload.as_object().ok_or(ShapeError::UnknownSeries)?;
    let endpoint = INTRADAY_SERIES
        .iter()
        .map(|s| s.endpoint)
        .find(|endpoint| map.contains_key(&format!("{endpoint}-intraday")))
        .map(str::to_string)
        .or_else(|| {
            map.keys()
                .find_map(|k| k.strip_suffix("-intraday"))
                .map(str::to_string)
        })
        .ok_or(ShapeError::UnknownSeries)?;

    let date = lookup(payload, &format!("{endpoint}.0.dateTime"))
        .cloned()
        .unwrap_or_else(|| ctx.reference_date_value());

    let mut rows = Vec::new();
    for record in array_at(payload, &format!("{endpoint}-intraday.dataset"))? {
        let mut row = ctx.row(Some(date.clone()));
        project(record, INTRADAY_FIELDS, &mut row);
        rows.push(row);
    }

    let mut out = TableRows::new();
    out.extend_table(&series_table(INTRADAY_SERIES, &endpoint), rows);
    Ok(out)
}

pub(super) fn calories_intraday(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    extract_all(ctx, payload, &[INTRADAY_CALORIES])
}

pub(super) fn log_list(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    extract_all(ctx, payload, &[LOG_LIST])
}

pub(super) fn azm_time_series(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    extract_all(ctx, payload, &[AZM_TIME_SERIES])
}

pub(super) fn azm_intraday(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    extract_all(ctx, payload, &[AZM_INTRADAY])
}
