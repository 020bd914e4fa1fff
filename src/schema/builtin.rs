//! Built-in destination catalog.
//!
//! One table per classifier destination. Every table starts with the
//! `id` / `date` key pair; all remaining columns are nullable.

use super::{ColumnDefinition, SchemaRegistry, SemanticType as T, TableSchema};

pub const CATALOG_VERSION: &str = "builtin-2024.1";

const EXTRACTED: &str = "The date values were extracted";
const ZONE_DESC: &str = "Heart rate zone statistic";

/// Payload key of a per-metric series and the table it lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesTable {
    /// Top-level payload key, e.g. `activities-steps`
    pub endpoint: &'static str,
    pub table: &'static str,
    pub value_type: T,
}

const fn series(endpoint: &'static str, table: &'static str, value_type: T) -> SeriesTable {
    SeriesTable {
        endpoint,
        table,
        value_type,
    }
}

/// Daily activity time series (no intraday detail)
pub const ACTIVITY_SERIES: &[SeriesTable] = &[
    series("activities-activityCalories", "activities_activity_calories", T::Integer),
    series("activities-calories", "activities_calories", T::Integer),
    series("activities-caloriesBMR", "activities_calories_bmr", T::Integer),
    series("activities-distance", "activities_distance", T::Float),
    series("activities-steps", "activities_steps", T::Integer),
    series("activities-floors", "activities_floors", T::Integer),
    series("activities-elevation", "activities_elevation", T::Float),
    series("activities-minutesFairlyActive", "activities_minutes_fairly_active", T::Integer),
    series("activities-minutesLightlyActive", "activities_minutes_lightly_active", T::Integer),
    series("activities-minutesSedentary", "activities_minutes_sedentary", T::Integer),
    series("activities-minutesVeryActive", "activities_minutes_very_active", T::Integer),
];

/// Intraday activity series; the dataset lives under `<endpoint>-intraday`
pub const INTRADAY_SERIES: &[SeriesTable] = &[
    series("activities-steps", "intraday_steps", T::Integer),
    series("activities-elevation", "intraday_elevation", T::Float),
    series("activities-floors", "intraday_floors", T::Float),
    series("activities-calories", "intraday_calories", T::Float),
    series("activities-distance", "intraday_distances", T::Float),
];

/// Build the built-in registry.
pub(crate) fn registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new(CATALOG_VERSION);
    for table in tables() {
        if let Err(e) = registry.register(table) {
            tracing::error!(error = %e, "builtin_schema_rejected");
        }
    }
    registry
}

/// All built-in table schemas, in catalog order.
pub fn tables() -> Vec<TableSchema> {
    let mut tables = vec![
        device(),
        badges(),
        activity_goals(),
        activity_logs(),
        activity_summary(),
        activity_log_list(),
        heart_rate(),
        heart_rate_zones(),
        hrv_summary(),
        hrv_intraday(),
    ];

    tables.extend(ACTIVITY_SERIES.iter().map(|s| {
        TableSchema::new(s.table)
            .with_identity(EXTRACTED)
            .nullable("value", s.value_type, "The value of the activity for the day")
    }));
    tables.extend(INTRADAY_SERIES.iter().map(intraday_series));

    tables.extend([
        profile(),
        temp_skin(),
        sleep(),
        sleep_summary(),
        sleep_minutes(),
        social(),
        body_weight(),
        spo2(),
        spo2_intraday(),
        vo2_max_summary(),
        breathing_rate_summary(),
        breathing_rate(),
        lifetime_stats(),
        azm_time_series(),
        azm_intraday(),
    ]);
    tables
}

fn device() -> TableSchema {
    TableSchema::new("device")
        .with_identity(EXTRACTED)
        .nullable("device_id", T::String, "Fitbit device identifier")
        .nullable("device_type", T::String, "TRACKER | SCALE")
        .nullable(
            "battery",
            T::String,
            "Battery level of the device. Supported: High | Medium | Low | Empty",
        )
        .nullable("battery_level", T::Integer, "Battery level percentage of the device")
        .nullable("device_version", T::String, "The product name of the device")
        .nullable(
            "last_sync_time",
            T::Timestamp,
            "Last time the device was synced with the mobile application",
        )
}

fn badges() -> TableSchema {
    TableSchema::new("badges")
        .with_identity(EXTRACTED)
        .with_column(
            ColumnDefinition::required("name", T::String).with_description("The name of the badge"),
        )
        .nullable("badge_gradient_end_color", T::String, "")
        .nullable("badge_gradient_start_color", T::String, "")
        .nullable("badge_type", T::String, "Type of badge received")
        .nullable("category", T::String, "")
        .nullable("description", T::String, "")
        .nullable("earned_message", T::String, "")
        .nullable("encoded_id", T::String, "")
        .nullable("image_100px", T::String, "")
        .nullable("image_125px", T::String, "")
        .nullable("image_300px", T::String, "")
        .nullable("image_50px", T::String, "")
        .nullable("image_75px", T::String, "")
        .nullable("marketing_description", T::String, "")
        .nullable("mobile_description", T::String, "")
        .nullable("share_image_640px", T::String, "")
        .nullable("share_text", T::String, "")
        .nullable("short_description", T::String, "")
        .nullable("short_name", T::String, "")
        .nullable("times_achieved", T::Integer, "Number of times the user has achieved the badge")
        .nullable("value", T::Integer, "The badge goal in the unit measurement")
        .nullable("unit", T::String, "Units of measure based on localization settings")
}

fn activity_goals() -> TableSchema {
    TableSchema::new("activity_goals")
        .with_identity(EXTRACTED)
        .nullable("active_minutes", T::Integer, "User defined goal for daily active minutes")
        .nullable("calories_out", T::Integer, "User defined goal for daily calories burned")
        .nullable("distance", T::Float, "User defined goal for daily distance traveled")
        .nullable("floors", T::Integer, "User defined goal for daily floor count")
        .nullable("steps", T::Integer, "User defined goal for daily step count")
}

fn activity_logs() -> TableSchema {
    TableSchema::new("activity_logs")
        .with_identity(EXTRACTED)
        .nullable("activity_id", T::Integer, "The ID of the activity")
        .nullable("activity_parent_id", T::Integer, "The ID of the top level activity")
        .nullable("activity_parent_name", T::String, "The name of the top level activity")
        .nullable("calories", T::Integer, "Number of calories burned during the exercise")
        .nullable("description", T::String, "The description of the recorded exercise")
        .nullable("distance", T::Float, "The distance traveled during the recorded exercise")
        .nullable("duration", T::Integer, "Active duration in milliseconds plus pauses")
        .nullable("has_active_zone_minutes", T::Boolean, "True | False")
        .nullable("has_start_time", T::Boolean, "True | False")
        .nullable("is_favorite", T::Boolean, "True | False")
        .nullable("last_modified", T::Timestamp, "Last modification of the log")
        .nullable("log_id", T::Integer, "The activity log identifier for the exercise")
        .nullable("name", T::String, "Name of the recorded exercise")
        .nullable("start_date", T::Date, "Start date of the recorded exercise")
        .nullable("start_time", T::String, "Start time (HH:mm) of the recorded exercise")
        .nullable("steps", T::Integer, "Steps taken during the exercise")
}

fn activity_summary() -> TableSchema {
    TableSchema::new("activity_summary")
        .with_identity(EXTRACTED)
        .nullable("active_score", T::Integer, "")
        .nullable("activity_calories", T::Integer, "Calories burned while active above sedentary")
        .nullable("calories_bmr", T::Integer, "Total BMR calories burned for the day")
        .nullable("calories_out", T::Integer, "Total calories burned for the day")
        .nullable("elevation", T::Float, "The elevation traveled for the day")
        .nullable("fairly_active_minutes", T::Integer, "Total minutes fairly active")
        .nullable("floors", T::Integer, "The equivalent floors climbed for the day")
        .nullable("lightly_active_minutes", T::Integer, "Total minutes lightly active")
        .nullable("marginal_calories", T::Integer, "Total marginal estimated calories burned")
        .nullable("resting_heart_rate", T::Integer, "The resting heart rate for the day")
        .nullable("sedentary_minutes", T::Integer, "Total minutes sedentary")
        .nullable("steps", T::Integer, "Total steps taken for the day")
        .nullable("very_active_minutes", T::Integer, "Total minutes very active")
}

fn activity_log_list() -> TableSchema {
    TableSchema::new("activity_log_list")
        .with_identity(EXTRACTED)
        .nullable("activity_duration", T::Integer, "Active duration in milliseconds")
        .nullable("activity_name", T::String, "")
        .nullable("activity_type_id", T::Integer, "")
        .nullable("calories", T::Integer, "")
        .nullable("duration", T::Integer, "")
        .nullable("elevation_gain", T::Float, "")
        .nullable("last_modified", T::Timestamp, "")
        .nullable("log_id", T::Integer, "")
        .nullable("log_type", T::String, "auto_detected | manual | mobile_run | tracker")
        .nullable("original_duration", T::Integer, "")
        .nullable("original_start_time", T::Timestamp, "")
        .nullable("start_time", T::Timestamp, "")
        .nullable("steps", T::Integer, "")
        .nullable("tcx_link", T::String, "")
        .nullable("calories_link", T::String, "")
        .nullable("activity_level_sedentary", T::Integer, "Minutes at sedentary level")
        .nullable("activity_level_lightly", T::Integer, "Minutes at lightly active level")
        .nullable("activity_level_fairly", T::Integer, "Minutes at fairly active level")
        .nullable("activity_level_very", T::Integer, "Minutes at very active level")
}

fn heart_rate() -> TableSchema {
    TableSchema::new("heart_rate")
        .with_identity(EXTRACTED)
        .nullable("time", T::String, "Time of day (HH:mm:ss)")
        .nullable("value", T::Integer, "Heart rate in beats per minute")
}

/// Zone names as they appear after normalisation of `heartRateZones[].name`
pub const HEART_RATE_ZONES: &[&str] = &["out_of_range", "fat_burn", "cardio", "peak"];

fn heart_rate_zones() -> TableSchema {
    let mut schema = TableSchema::new("heart_rate_zones")
        .with_identity(EXTRACTED)
        .nullable("resting_heart_rate", T::Integer, "Resting heart rate for the day");
    for zone in HEART_RATE_ZONES {
        schema = schema
            .nullable(&format!("{zone}_calories_out"), T::Float, ZONE_DESC)
            .nullable(&format!("{zone}_minutes"), T::Integer, ZONE_DESC)
            .nullable(&format!("{zone}_min_hr"), T::Integer, ZONE_DESC)
            .nullable(&format!("{zone}_max_hr"), T::Integer, ZONE_DESC);
    }
    schema
}

fn hrv_summary() -> TableSchema {
    TableSchema::new("hrv_summary")
        .with_identity(EXTRACTED)
        .nullable("daily_rmssd", T::Float, "Root mean square of successive differences, whole day")
        .nullable("deep_rmssd", T::Float, "Root mean square of successive differences, deep sleep")
}

fn hrv_intraday() -> TableSchema {
    TableSchema::new("hrv_intraday")
        .with_identity(EXTRACTED)
        .nullable("date_time", T::Timestamp, "Minute of the measurement")
        .nullable("rmssd", T::Float, "Root mean square of successive differences")
        .nullable("coverage", T::Float, "Data coverage ratio")
        .nullable("hf", T::Float, "High frequency power")
        .nullable("lf", T::Float, "Low frequency power")
}

fn intraday_series(s: &SeriesTable) -> TableSchema {
    let schema = TableSchema::new(s.table).with_identity(EXTRACTED);
    let schema = if s.table == "intraday_calories" {
        schema
            .nullable("level", T::Integer, "Activity level")
            .nullable("mets", T::Integer, "METs value at the moment of recording")
    } else {
        schema
    };
    schema
        .nullable("time", T::String, "Time of day (HH:mm:ss)")
        .nullable("value", s.value_type, "The resource's value at the time it is recorded")
}

fn profile() -> TableSchema {
    TableSchema::new("profile")
        .with_identity("Date the profile was pulled")
        .nullable("user_age", T::Integer, "Age based on the account birthday")
        .nullable("user_city", T::String, "")
        .nullable("user_state", T::String, "")
        .nullable("user_country", T::String, "")
        .nullable("user_date_of_birth", T::Date, "")
        .nullable("user_display_name", T::String, "")
        .nullable("user_encoded_id", T::String, "")
        .nullable("user_full_name", T::String, "")
        .nullable("user_gender", T::String, "")
        .nullable("user_height", T::Float, "")
        .nullable("user_height_unit", T::String, "")
        .nullable("user_timezone", T::String, "")
}

fn temp_skin() -> TableSchema {
    TableSchema::new("temp_skin")
        .with_identity(EXTRACTED)
        .nullable("log_type", T::String, "The type of skin temperature log created")
        .nullable("nightly_relative", T::Float, "Temperature relative to the personal baseline")
}

fn sleep() -> TableSchema {
    TableSchema::new("sleep")
        .with_identity(EXTRACTED)
        .nullable("awake_count", T::Integer, "Number of times woken up")
        .nullable("awake_duration", T::Integer, "Minutes awake")
        .nullable("awakenings_count", T::Integer, "Number of awakenings")
        .nullable("date_of_sleep", T::Date, "The date the user fell asleep")
        .nullable("duration", T::Integer, "Length of the sleep in milliseconds")
        .nullable("efficiency", T::Integer, "Calculated sleep efficiency score")
        .nullable("end_time", T::Timestamp, "Time the sleep log ended")
        .nullable("is_main_sleep", T::Boolean, "True | False")
        .nullable("log_id", T::Integer, "Sleep log ID")
        .nullable("log_type", T::String, "auto_detected | manual")
        .nullable("minutes_after_wakeup", T::Integer, "")
        .nullable("minutes_asleep", T::Integer, "")
        .nullable("minutes_awake", T::Integer, "")
        .nullable("minutes_to_fall_asleep", T::Integer, "")
        .nullable("restless_count", T::Integer, "Number of restless periods")
        .nullable("restless_duration", T::Integer, "Minutes restless")
        .nullable("start_time", T::Timestamp, "Time the sleep log begins")
        .nullable("time_in_bed", T::Integer, "Total minutes in bed")
        .nullable("type", T::String, "stages | classic")
}

fn sleep_summary() -> TableSchema {
    TableSchema::new("sleep_summary")
        .with_identity(EXTRACTED)
        .nullable("log_id", T::Integer, "Sleep log the summary belongs to")
        .nullable("total_minutes_asleep", T::Integer, "")
        .nullable("total_sleep_records", T::Integer, "")
        .nullable("total_time_in_bed", T::Integer, "")
        .nullable("stages_deep", T::Integer, "Minutes of deep sleep")
        .nullable("stages_light", T::Integer, "Minutes of light sleep")
        .nullable("stages_rem", T::Integer, "Minutes of REM sleep")
        .nullable("stages_wake", T::Integer, "Minutes awake")
}

fn sleep_minutes() -> TableSchema {
    TableSchema::new("sleep_minutes")
        .with_identity(EXTRACTED)
        .nullable("log_id", T::Integer, "Sleep log the segment belongs to")
        .nullable("date_time", T::Timestamp, "Start of the sleep stage segment")
        .nullable("level", T::String, "deep | light | rem | wake | asleep | restless | awake")
        .nullable("seconds", T::Integer, "Segment length in seconds")
}

fn social() -> TableSchema {
    TableSchema::new("social")
        .with_identity(EXTRACTED)
        .nullable("friend_id", T::String, "Fitbit user id of the friend")
        .nullable("type", T::String, "")
        .nullable("attributes_name", T::String, "Display name")
        .nullable("attributes_friend", T::Boolean, "")
        .nullable("attributes_avatar", T::String, "Link to the avatar picture")
        .nullable("attributes_child", T::Boolean, "Friend is a child account")
}

fn body_weight() -> TableSchema {
    TableSchema::new("body_weight")
        .with_identity(EXTRACTED)
        .nullable("bmi", T::Float, "Calculated BMI")
        .nullable("fat", T::Float, "Body fat percentage")
        .nullable("log_id", T::Integer, "Weight log ID")
        .nullable("source", T::String, "The source of the weight log")
        .nullable("time", T::String, "Time of the measurement")
        .nullable("weight", T::Float, "Weight")
}

fn spo2() -> TableSchema {
    TableSchema::new("spo2")
        .with_identity(EXTRACTED)
        .nullable("avg", T::Float, "Mean of the 1 minute SpO2 levels")
        .nullable("min", T::Float, "Minimum daily SpO2 level")
        .nullable("max", T::Float, "Maximum daily SpO2 level")
}

fn spo2_intraday() -> TableSchema {
    TableSchema::new("spo2_intraday")
        .with_identity(EXTRACTED)
        .nullable("value", T::Float, "SpO2 percentage at the given minute")
        .nullable("minute", T::Datetime, "Date and time of the measurement")
}

fn vo2_max_summary() -> TableSchema {
    TableSchema::new("vo2_max_summary")
        .with_identity(EXTRACTED)
        .nullable("vo2_max", T::String, "Single value or a hyphenated range")
}

fn breathing_rate_summary() -> TableSchema {
    TableSchema::new("breathing_rate_summary")
        .with_identity(EXTRACTED)
        .nullable("value", T::Float, "Breaths per minute")
}

fn breathing_rate() -> TableSchema {
    TableSchema::new("breathing_rate")
        .with_identity(EXTRACTED)
        .nullable("deep_sleep_summary", T::Float, "Breaths per minute in deep sleep")
        .nullable("light_sleep_summary", T::Float, "Breaths per minute in light sleep")
        .nullable("rem_sleep_summary", T::Float, "Breaths per minute in REM sleep")
        .nullable("full_sleep_summary", T::Float, "Breaths per minute over the full sleep")
}

fn lifetime_stats() -> TableSchema {
    TableSchema::new("lifetime_stats")
        .with_identity(EXTRACTED)
        .nullable("best_total_distance", T::Float, "")
        .nullable("best_total_steps", T::Integer, "")
        .nullable("best_tracker_distance", T::Float, "")
        .nullable("best_tracker_steps", T::Integer, "")
        .nullable("lifetime_total_distance", T::Float, "")
        .nullable("lifetime_total_steps", T::Integer, "")
        .nullable("lifetime_tracker_distance", T::Float, "")
        .nullable("lifetime_tracker_steps", T::Integer, "")
}

fn with_zone_minutes(schema: TableSchema) -> TableSchema {
    schema
        .nullable("value", T::Integer, "Total active zone minutes")
        .nullable("fat_burn_active_zone_minutes", T::Integer, "")
        .nullable("cardio_active_zone_minutes", T::Integer, "")
        .nullable("peak_active_zone_minutes", T::Integer, "")
}

fn azm_time_series() -> TableSchema {
    with_zone_minutes(TableSchema::new("azm_time_series").with_identity(EXTRACTED))
}

fn azm_intraday() -> TableSchema {
    with_zone_minutes(
        TableSchema::new("azm_intraday")
            .with_identity(EXTRACTED)
            .nullable("time", T::Timestamp, "Minute of the measurement"),
    )
}
