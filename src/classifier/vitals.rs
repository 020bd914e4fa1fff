//! Physiological summaries: skin temperature, SpO2, HRV, breathing rate and
//! cardio fitness.

use super::extract::{extract_all, field, DateAnchor, Field, RecordPath, RecordSpec, ShapeError};
use super::ShapeContext;
use crate::rows::TableRows;
use serde_json::Value;

const SKIN_TEMPERATURE: RecordSpec = RecordSpec::new(
    "temp_skin",
    RecordPath::Array("tempSkin"),
    DateAnchor::Record("dateTime"),
    &[
        field("log_type", "logType"),
        field("nightly_relative", "value.nightlyRelative"),
    ],
);

const SPO2_FIELDS: &[Field] = &[
    field("avg", "value.avg"),
    field("min", "value.min"),
    field("max", "value.max"),
];

/// Interval shape: `[{dateTime, value}, ...]`
const SPO2_SUMMARY_RANGE: RecordSpec = RecordSpec::new(
    "spo2",
    RecordPath::Array(""),
    DateAnchor::Record("dateTime"),
    SPO2_FIELDS,
);

/// Single-day shape: `{dateTime, value}`, or `{}` when nothing was recorded
const SPO2_SUMMARY_DAY: RecordSpec = RecordSpec::new(
    "spo2",
    RecordPath::Single(""),
    DateAnchor::Record("dateTime"),
    SPO2_FIELDS,
)
.skip_unless("dateTime");

const SPO2_MINUTES: &[Field] = &[field("value", "value"), field("minute", "minute")];

/// Single-day shape: `{dateTime, minutes: [...]}`
const SPO2_INTRADAY_DAY: RecordSpec = RecordSpec::new(
    "spo2_intraday",
    RecordPath::Array("minutes"),
    DateAnchor::Payload("dateTime"),
    SPO2_MINUTES,
);

/// Interval shape: `[{dateTime, minutes: [...]}, ...]`
const SPO2_INTRADAY_RANGE: RecordSpec = RecordSpec::new(
    "spo2_intraday",
    RecordPath::Nested {
        outer: "",
        inner: "minutes",
    },
    DateAnchor::Parent("dateTime"),
    SPO2_MINUTES,
);

const HRV_SUMMARY: RecordSpec = RecordSpec::new(
    "hrv_summary",
    RecordPath::Array("hrv"),
    DateAnchor::Record("dateTime"),
    &[
        field("daily_rmssd", "value.dailyRmssd"),
        field("deep_rmssd", "value.deepRmssd"),
    ],
);

const HRV_INTRADAY: RecordSpec = RecordSpec::new(
    "hrv_intraday",
    RecordPath::Nested {
        outer: "hrv",
        inner: "minutes",
    },
    DateAnchor::RecordDatePart("minute"),
    &[
        field("date_time", "minute"),
        field("rmssd", "value.rmssd"),
        field("coverage", "value.coverage"),
        field("hf", "value.hf"),
        field("lf", "value.lf"),
    ],
);

const BREATHING_RATE: RecordSpec = RecordSpec::new(
    "breathing_rate",
    RecordPath::Array("br"),
    DateAnchor::Record("dateTime"),
    &[
        field("deep_sleep_summary", "value.deepSleepSummary.breathingRate"),
        field("light_sleep_summary", "value.lightSleepSummary.breathingRate"),
        field("rem_sleep_summary", "value.remSleepSummary.breathingRate"),
        field("full_sleep_summary", "value.fullSleepSummary.breathingRate"),
    ],
);

const BREATHING_RATE_SUMMARY: RecordSpec = RecordSpec::new(
    "breathing_rate_summary",
    RecordPath::Array("br"),
    DateAnchor::Record("dateTime"),
    &[field("value", "value.breathingRate")],
)
.skip_unless("value.breathingRate");

const VO2_MAX: RecordSpec = RecordSpec::new(
    "vo2_max_summary",
    RecordPath::Array("cardioScore"),
    DateAnchor::Record("dateTime"),
    &[field("vo2_max", "value.vo2Max")],
);

pub(super) fn skin_temperature(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    extract_all(ctx, payload, &[SKIN_TEMPERATURE])
}

pub(super) fn spo2_summary(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    let spec = if payload.is_array() {
        SPO2_SUMMARY_RANGE
    } else {
        SPO2_SUMMARY_DAY
    };
    extract_all(ctx, payload, &[spec])
}

pub(super) fn spo2_intraday(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    let spec = if payload.is_array() {
        SPO2_INTRADAY_RANGE
    } else {
        SPO2_INTRADAY_DAY
    };
    extract_all(ctx, payload, &[spec])
}

pub(super) fn hrv_summary(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    extract_all(ctx, payload, &[HRV_SUMMARY])
}

pub(super) fn hrv_intraday(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    extract_all(ctx, payload, &[HRV_INTRADAY])
}

pub(super) fn breathing_rate(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    extract_all(ctx, payload, &[BREATHING_RATE])
}

pub(super) fn breathing_rate_summary(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    extract_all(ctx, payload, &[BREATHING_RATE_SUMMARY])
}

pub(super) fn vo2_max(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    extract_all(ctx, payload, &[VO2_MAX])
}
