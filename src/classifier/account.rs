//! Account-level snapshots and logs: profile, devices, badges, friends, body
//! weight and lifetime statistics.

use super::extract::{
    either, extract_all, field, object_at, DateAnchor, Field, RecordPath, RecordSpec, ShapeError,
};
use super::ShapeContext;
use crate::rows::TableRows;
use serde_json::Value;

const PROFILE: RecordSpec = RecordSpec::new(
    "profile",
    RecordPath::Single("user"),
    DateAnchor::Reference,
    &[
        field("user_age", "age"),
        field("user_city", "city"),
        field("user_state", "state"),
        field("user_country", "country"),
        field("user_date_of_birth", "dateOfBirth"),
        field("user_display_name", "displayName"),
        field("user_encoded_id", "encodedId"),
        field("user_full_name", "fullName"),
        field("user_gender", "gender"),
        field("user_height", "height"),
        field("user_height_unit", "heightUnit"),
        field("user_timezone", "timezone"),
    ],
);

const DEVICES: RecordSpec = RecordSpec::new(
    "device",
    RecordPath::Array(""),
    DateAnchor::Reference,
    &[
        field("device_id", "id"),
        field("device_type", "type"),
        field("battery", "battery"),
        field("battery_level", "batteryLevel"),
        field("device_version", "deviceVersion"),
        field("last_sync_time", "lastSyncTime"),
    ],
);

const BADGES: RecordSpec = RecordSpec::new(
    "badges",
    RecordPath::Array("badges"),
    DateAnchor::Record("dateTime"),
    &[
        field("name", "name"),
        field("badge_gradient_end_color", "badgeGradientEndColor"),
        field("badge_gradient_start_color", "badgeGradientStartColor"),
        field("badge_type", "badgeType"),
        field("category", "category"),
        field("description", "description"),
        field("earned_message", "earnedMessage"),
        field("encoded_id", "encodedId"),
        field("image_100px", "image100px"),
        field("image_125px", "image125px"),
        field("image_300px", "image300px"),
        field("image_50px", "image50px"),
        field("image_75px", "image75px"),
        field("marketing_description", "marketingDescription"),
        field("mobile_description", "mobileDescription"),
        field("share_image_640px", "shareImage640px"),
        field("share_text", "shareText"),
        field("short_description", "shortDescription"),
        field("short_name", "shortName"),
        field("times_achieved", "timesAchieved"),
        field("value", "value"),
        field("unit", "unit"),
    ],
);

const FRIENDS: RecordSpec = RecordSpec::new(
    "social",
    RecordPath::Array("data"),
    DateAnchor::Reference,
    &[
        field("friend_id", "id"),
        field("type", "type"),
        field("attributes_name", "attributes.name"),
        field("attributes_friend", "attributes.friend"),
        field("attributes_avatar", "attributes.avatar"),
        field("attributes_child", "attributes.child"),
    ],
);

const WEIGHT_FIELDS: &[Field] = &[
    field("bmi", "bmi"),
    field("fat", "fat"),
    field("log_id", "logId"),
    field("source", "source"),
    field("time", "time"),
    field("weight", "weight"),
];

const WEIGHT_LOG_KEYS: [&str; 2] = ["weight", "weightLog"];

/// Best values arrive as `{date, value}` objects, lifetime values as bare numbers.
const LIFETIME_STATS: RecordSpec = RecordSpec::new(
    "lifetime_stats",
    RecordPath::Single(""),
    DateAnchor::Reference,
    &[
        either("best_total_distance", "best.total.distance.value", "best.total.distance"),
        either("best_total_steps", "best.total.steps.value", "best.total.steps"),
        either("best_tracker_distance", "best.tracker.distance.value", "best.tracker.distance"),
        either("best_tracker_steps", "best.tracker.steps.value", "best.tracker.steps"),
        field("lifetime_total_distance", "lifetime.total.distance"),
        field("lifetime_total_steps", "lifetime.total.steps"),
        field("lifetime_tracker_distance", "lifetime.tracker.distance"),
        field("lifetime_tracker_steps", "lifetime.tracker.steps"),
    ],
);

pub(super) fn profile(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    extract_all(ctx, payload, &[PROFILE])
}

pub(super) fn devices(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    extract_all(ctx, payload, &[DEVICES])
}

pub(super) fn badges(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    extract_all(ctx, payload, &[BADGES])
}

pub(super) fn friends(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    extract_all(ctx, payload, &[FRIENDS])
}

/// Body weight logs. The list key is `weight` in current responses and
/// `weightLog` in older exports.
pub(super) fn weight(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    let key = WEIGHT_LOG_KEYS
        .into_iter()
        .find(|k| payload.get(k).is_some_and(Value::is_array))
        .unwrap_or(WEIGHT_LOG_KEYS[0]);
    let spec = RecordSpec::new(
        "body_weight",
        RecordPath::Array(key),
        DateAnchor::RecordEither("date", "dateTime"),
        WEIGHT_FIELDS,
    );
    extract_all(ctx, payload, &[spec])
}

pub(super) fn lifetime_stats(ctx: &ShapeContext<'_>, payload: &Value) -> Result<TableRows, ShapeError> {
    object_at(payload, "best")?;
    object_at(payload, "lifetime")?;
    extract_all(ctx, payload, &[LIFETIME_STATS])
}
