//! Sleep logs. One payload fans out into the `sleep`, `sleep_summary` and
//! `sleep_minutes` tables.
//!
//! Stage logs report `wake`/`light`/`deep`/`rem` level summaries; classic
//! logs report `awake`/`restless`/`asleep`. Counts and durations read the
//! stage name first and fall back to the classic one, defaulting to zero.

use super::extract::{
    constant, either, extract_all, field, or_zero, DateAnchor, RecordPath, RecordSpec, ShapeError,
};
use super::ShapeContext;
use crate::rows::TableRows;
use serde_json::Value;

const SLEEP: RecordSpec = RecordSpec::new(
    "sleep",
    RecordPath::Array("sleep"),
    DateAnchor::Record("dateOfSleep"),
    &[
        or_zero(either("awake_count", "levels.summary.wake.count", "levels.summary.awake.count")),
        or_zero(either("awake_duration", "levels.summary.wake.minutes", "levels.summary.awake.minutes")),
        or_zero(either("awakenings_count", "awakeningsCount", "levels.summary.awake.count")),
        field("date_of_sleep", "dateOfSleep"),
        field("duration", "duration"),
        field("efficiency", "efficiency"),
        field("end_time", "endTime"),
        field("is_main_sleep", "isMainSleep"),
        field("log_id", "logId"),
        field("log_type", "logType"),
        field("minutes_after_wakeup", "minutesAfterWakeup"),
        field("minutes_asleep", "minutesAsleep"),
        field("minutes_awake", "minutesAwake"),
        field("minutes_to_fall_asleep", "minutesToFallAsleep"),
        or_zero(either("restless_count", "levels.summary.restless.count", "restlessCount")),
        or_zero(either("restless_duration", "levels.summary.restless.minutes", "restlessDuration")),
        field("start_time", "startTime"),
        field("time_in_bed", "timeInBed"),
        field("type", "type"),
    ],
);

const SLEEP_SUMMARY: RecordSpec = RecordSpec::new(
    "sleep_summary",
    RecordPath::Array("sleep"),
    DateAnchor::Record("dateOfSleep"),
    &[
        field("log_id", "logId"),
        field("total_minutes_asleep", "minutesAsleep"),
        constant("total_sleep_records", 1),
        field("total_time_in_bed", "timeInBed"),
        or_zero(field("stages_deep", "levels.summary.deep.minutes")),
        or_zero(field("stages_light", "levels.summary.light.minutes")),
        or_zero(field("stages_rem", "levels.summary.rem.minutes")),
        or_zero(field("stages_wake", "levels.summary.wake.minutes")),
    ],
);

const SLEEP_MINUTES: RecordSpec = RecordSpec::new(
    "sleep_minutes",
    RecordPath::Nested {
        outer: "sleep",
        inner: "levels.data",
    },
    DateAnchor::Parent("dateOfSleep"),
    &[
        field("date_time", "dateTime"),
        field("level", "level"),
        field("seconds", "seconds"),
    ],
)
.with_parent_fields(&[field("log_id", "logId")]);

/// Shared by the by-date, date-range and list endpoints; all three return
/// `{"sleep": [...]}`.
pub(super) fn sleep_logs(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    extract_all(ctx, payload, &[SLEEP, SLEEP_SUMMARY, SLEEP_MINUTES])
}
