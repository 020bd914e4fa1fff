//! One representative payload per endpoint family, classified and validated
//! against the built-in catalog.

use chrono::NaiveDate;
use serde_json::{json, Value};
use wearable_ingest::config::ValidationConfig;
use wearable_ingest::{Classifier, EndpointKind, Pipeline, SchemaRegistry};

fn pipeline() -> Pipeline {
    Pipeline::new(
        SchemaRegistry::builtin(),
        Classifier::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
        ValidationConfig::default(),
    )
}

/// (label, payload, expected tables with row counts)
fn samples() -> Vec<(&'static str, Value, Vec<(&'static str, usize)>)> {
    vec![
        (
            "Heart Rate Time Series by Date",
            json!({"activities-heart": [{"dateTime": "2024-02-29", "value": {
                "restingHeartRate": 60,
                "heartRateZones": [
                    {"name": "Out of Range", "caloriesOut": 1500.2, "minutes": 1200, "min": 30, "max": 97},
                    {"name": "Fat Burn", "caloriesOut": 300.1, "minutes": 100, "min": 97, "max": 135},
                    {"name": "Cardio", "caloriesOut": 50.0, "minutes": 10, "min": 135, "max": 164},
                    {"name": "Peak", "caloriesOut": 0, "minutes": 0, "min": 164, "max": 220}
                ]
            }}]}),
            vec![("heart_rate_zones", 1)],
        ),
        (
            "Heart Rate Intraday by Date",
            json!({
                "activities-heart": [{"dateTime": "2024-02-29", "value": {}}],
                "activities-heart-intraday": {"dataset": [{"time": "00:00:00", "value": 61}, {"time": "00:01:00", "value": 62}]}
            }),
            vec![("heart_rate", 2)],
        ),
        (
            "Activity Time Series (No Intraday)",
            json!({"activities-minutesSedentary": [{"dateTime": "2024-02-29", "value": "700"}]}),
            vec![("activities_minutes_sedentary", 1)],
        ),
        (
            "Daily Activity Summary",
            json!({
                "activities": [{"activityId": 90013, "logId": 5, "name": "Walk", "startDate": "2024-02-29", "startTime": "08:00", "calories": 120}],
                "goals": {"activeMinutes": 30, "caloriesOut": 2500, "distance": 8.05, "floors": 10, "steps": 10000},
                "summary": {"activityCalories": 900, "caloriesBMR": 1600, "caloriesOut": 2500, "steps": 9000}
            }),
            vec![("activity_logs", 1), ("activity_goals", 1), ("activity_summary", 1)],
        ),
        (
            "Activity Intraday by Date (Floors)",
            json!({
                "activities-floors": [{"dateTime": "2024-02-29", "value": "10"}],
                "activities-floors-intraday": {"dataset": [{"time": "08:00:00", "value": 1}]}
            }),
            vec![("intraday_floors", 1)],
        ),
        (
            "Activity Intraday by Date (Calories)",
            json!({
                "activities-calories": [{"dateTime": "2024-02-29", "value": "2300"}],
                "activities-calories-intraday": {"dataset": [{"level": 1, "mets": 12, "time": "08:00:00", "value": 1.5}]}
            }),
            vec![("intraday_calories", 1)],
        ),
        (
            "Temperature (Skin) Summary by Date",
            json!({"tempSkin": [{"dateTime": "2024-02-29", "logType": "dedicated_temp_sensor", "value": {"nightlyRelative": 0.4}}]}),
            vec![("temp_skin", 1)],
        ),
        (
            "SpO2 Summary by Date",
            json!({"dateTime": "2024-02-29", "value": {"avg": 96.1, "min": 92.0, "max": 99.0}}),
            vec![("spo2", 1)],
        ),
        (
            "SpO2 Summary by Interval",
            json!([{"dateTime": "2024-02-29", "value": {"avg": 96.1, "min": 92.0, "max": 99.0}}]),
            vec![("spo2", 1)],
        ),
        (
            "SpO2 Intraday by Date",
            json!({"dateTime": "2024-02-29", "minutes": [{"value": 95.0, "minute": "2024-02-29T01:00:00"}]}),
            vec![("spo2_intraday", 1)],
        ),
        (
            "Get Profile",
            json!({"user": {"age": 40, "dateOfBirth": "1984-01-01", "gender": "NA", "height": 180.0}}),
            vec![("profile", 1)],
        ),
        (
            "Get Devices",
            json!([{"id": "1", "type": "TRACKER", "battery": "High", "batteryLevel": 80,
                    "deviceVersion": "Inspire 3", "lastSyncTime": "2024-03-01T05:00:00.000"}]),
            vec![("device", 1)],
        ),
        (
            "Get Badges",
            json!({"badges": [{"dateTime": "2023-01-01", "name": "Boat Shoe", "value": 5000, "timesAchieved": 2}]}),
            vec![("badges", 1)],
        ),
        (
            "Get Friends",
            json!({"data": [{"type": "person", "id": "XYZ", "attributes": {"name": "Kim", "friend": true}}]}),
            vec![("social", 1)],
        ),
        (
            "Weight Log by Date",
            json!({"weight": [{"bmi": 23.1, "date": "2024-02-29", "logId": 1, "source": "API", "time": "07:00:00", "weight": 72.3}]}),
            vec![("body_weight", 1)],
        ),
        (
            "HRV Summary by Date",
            json!({"hrv": [{"dateTime": "2024-02-29", "value": {"dailyRmssd": 40.2, "deepRmssd": 38.0}}]}),
            vec![("hrv_summary", 1)],
        ),
        (
            "HRV Intraday by Date",
            json!({"hrv": [{"dateTime": "2024-02-29", "minutes": [
                {"minute": "2024-02-29T02:00:00.000", "value": {"rmssd": 30.0, "coverage": 0.95, "hf": 100.0, "lf": 200.0}}
            ]}]}),
            vec![("hrv_intraday", 1)],
        ),
        (
            "Breathing Rate Intraday by Date",
            json!({"br": [{"dateTime": "2024-02-29", "value": {
                "deepSleepSummary": {"breathingRate": 14.0}, "remSleepSummary": {"breathingRate": 15.0},
                "lightSleepSummary": {"breathingRate": 15.5}, "fullSleepSummary": {"breathingRate": 15.2}
            }}]}),
            vec![("breathing_rate", 1)],
        ),
        (
            "Breathing Rate Summary by Date",
            json!({"br": [{"dateTime": "2024-02-29", "value": {"breathingRate": 15.2}}]}),
            vec![("breathing_rate_summary", 1)],
        ),
        (
            "Activity Log List",
            json!({"activities": [{"activeDuration": 600_000, "activityName": "Walk", "logId": 9,
                "originalStartTime": "2024-02-29T08:00:00.000+01:00",
                "activityLevel": [{"minutes": 1, "name": "sedentary"}, {"minutes": 2, "name": "lightly"},
                                  {"minutes": 3, "name": "fairly"}, {"minutes": 4, "name": "very"}]}]}),
            vec![("activity_log_list", 1)],
        ),
        (
            "Lifetime Stats",
            json!({
                "best": {"total": {"distance": {"date": "2022-01-01", "value": 20.5}, "steps": {"date": "2022-01-01", "value": 30000}},
                         "tracker": {"distance": {"date": "2022-01-01", "value": 20.0}, "steps": {"date": "2022-01-01", "value": 29000}}},
                "lifetime": {"total": {"distance": 5000.5, "steps": 7_000_000}, "tracker": {"distance": 4900.0, "steps": 6_900_000}}
            }),
            vec![("lifetime_stats", 1)],
        ),
        (
            "Sleep Log List",
            json!({"sleep": [{"dateOfSleep": "2024-02-29", "logId": 3, "type": "classic",
                "levels": {"summary": {"awake": {"count": 1, "minutes": 5}}, "data": []}}]}),
            vec![("sleep", 1), ("sleep_summary", 1), ("sleep_minutes", 0)],
        ),
        (
            "AZM Time Series by Date",
            json!({"activities-active-zone-minutes": [{"dateTime": "2024-02-29", "value": {"activeZoneMinutes": 12, "fatBurnActiveZoneMinutes": 12}}]}),
            vec![("azm_time_series", 1)],
        ),
        (
            "VO2 Max Summary by Date",
            json!({"cardioScore": [{"dateTime": "2024-02-29", "value": {"vo2Max": "42-46"}}]}),
            vec![("vo2_max_summary", 1)],
        ),
        (
            "AZM Intraday by Date",
            json!({"activities-active-zone-minutes-intraday": [{"dateTime": "2024-02-29", "minutes": [
                {"minute": "2024-02-29T08:00:00", "value": {"activeZoneMinutes": 1, "fatBurnActiveZoneMinutes": 1}}
            ]}]}),
            vec![("azm_intraday", 1)],
        ),
    ]
}

#[test]
fn test_every_sample_classifies_into_expected_tables() {
    let pipeline = pipeline();
    for (label, payload, expected) in samples() {
        let rows = pipeline.classify(label, &payload, "ABC123");
        let actual: Vec<(&str, usize)> = rows.iter().map(|(t, r)| (t, r.len())).collect();
        assert_eq!(actual, expected, "label {label}");
    }
}

#[test]
fn test_every_sample_validates_without_errors() {
    let pipeline = pipeline();
    for (label, payload, _) in samples() {
        let batch = pipeline.classify_and_validate(label, &payload, "ABC123");
        let errors: Vec<_> = batch.outcomes().filter(|o| o.is_error()).collect();
        assert!(errors.is_empty(), "label {label}: {errors:?}");
    }
}

#[test]
fn test_every_row_carries_identity() {
    let pipeline = pipeline();
    for (label, payload, _) in samples() {
        for (table, rows) in pipeline.classify(label, &payload, "ABC123").iter() {
            for row in rows {
                assert_eq!(row["id"], json!("ABC123"), "{label} / {table}");
                assert!(row.contains_key("date"), "{label} / {table} has no date");
            }
        }
    }
}

#[test]
fn test_every_endpoint_kind_table_exists_in_registry() {
    let registry = SchemaRegistry::builtin();
    for kind in EndpointKind::ALL {
        for table in kind.tables() {
            assert!(registry.lookup(table).is_some(), "{kind}: {table}");
        }
    }
}

#[test]
fn test_classification_is_deterministic() {
    let pipeline = pipeline();
    for (label, payload, _) in samples() {
        let first = serde_json::to_string(&pipeline.classify(label, &payload, "u")).unwrap();
        let second = serde_json::to_string(&pipeline.classify(label, &payload, "u")).unwrap();
        assert_eq!(first, second, "label {label}");
    }
}

#[test]
fn test_shape_mismatch_never_panics() {
    let pipeline = pipeline();
    let junk = [json!(null), json!(42), json!("text"), json!([]), json!({}), json!([1, 2, 3]), json!({"a": {"b": null}})];
    for (label, _, _) in samples() {
        for payload in &junk {
            let batch = pipeline.classify_and_validate(label, payload, "u");
            assert_eq!(batch.error_count, 0, "label {label} payload {payload}");
        }
    }
}
