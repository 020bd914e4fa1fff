//! Property-based validator and classifier tests (proptest).

use chrono::NaiveDate;
use proptest::prelude::*;
use serde_json::{json, Value};
use wearable_ingest::config::{MissingRequiredPolicy, ValidationConfig};
use wearable_ingest::{
    CandidateRow, Classifier, ColumnDefinition, EndpointKind, ErrorKind, RowValidator,
    SchemaRegistry, SemanticType, TableRows, TableSchema,
};

const COLUMNS: &[&str] = &["id", "date", "i", "f", "b", "s", "ts", "dt"];

/// One column of every semantic type
fn registry() -> SchemaRegistry {
    SchemaRegistry::new("prop")
        .with_table(
            TableSchema::new("t")
                .with_column(ColumnDefinition::required("id", SemanticType::String))
                .with_column(ColumnDefinition::required("date", SemanticType::Date))
                .with_column(ColumnDefinition::new("i", SemanticType::Integer))
                .with_column(ColumnDefinition::new("f", SemanticType::Float))
                .with_column(ColumnDefinition::new("b", SemanticType::Boolean))
                .with_column(ColumnDefinition::new("s", SemanticType::String))
                .with_column(ColumnDefinition::new("ts", SemanticType::Timestamp))
                .with_column(ColumnDefinition::new("dt", SemanticType::Datetime)),
        )
        .unwrap()
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6f64).prop_map(Value::from),
        "[a-z0-9 .:-]{0,12}".prop_map(Value::String),
        "-?[0-9]{1,6}(\\.[0-9]{1,3})?".prop_map(Value::String),
        "(true|false|TRUE|False)".prop_map(Value::String),
        "20[0-9]{2}-0[1-9]-[12][0-9]".prop_map(Value::String),
        "20[0-9]{2}-0[1-9]-[12][0-9]T[01][0-9]:[0-5][0-9]:[0-5][0-9]".prop_map(Value::String),
        Just(json!({"nested": 1})),
        Just(json!([1, 2])),
    ]
}

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::sample::select(COLUMNS).prop_map(str::to_string),
        1 => "extra_[a-z]{1,4}",
    ]
}

fn row() -> impl Strategy<Value = CandidateRow> {
    prop::collection::btree_map(key(), leaf(), 0..12)
        .prop_map(|map| map.into_iter().collect::<CandidateRow>())
}

/// Rows whose REQUIRED columns always hold valid values
fn clean_row() -> impl Strategy<Value = CandidateRow> {
    (
        "[a-z0-9]{1,8}",
        "20[0-9]{2}-0[1-9]-1[0-9]",
        prop::collection::btree_map(key(), leaf(), 0..10),
    )
        .prop_map(|(id, date, rest)| {
            let mut row: CandidateRow = rest
                .into_iter()
                .filter(|(k, _)| k != "id" && k != "date")
                .collect();
            row.insert("id".to_string(), Value::String(id));
            row.insert("date".to_string(), Value::String(date));
            row
        })
}

fn any_json() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(
                prop_oneof![
                    Just("dateTime".to_string()),
                    Just("value".to_string()),
                    Just("hrv".to_string()),
                    Just("sleep".to_string()),
                    Just("minutes".to_string()),
                    "[a-z-]{1,8}",
                ],
                inner,
                0..4
            )
            .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn validator_config(reject: bool, enforce_types: bool) -> ValidationConfig {
    ValidationConfig {
        missing_required: if reject {
            MissingRequiredPolicy::Reject
        } else {
            MissingRequiredPolicy::Sentinel
        },
        enforce_types,
    }
}

proptest! {
    #[test]
    fn prop_corrected_row_matches_schema_columns(row in row(), enforce in any::<bool>()) {
        let registry = registry();
        let validator = RowValidator::new(&registry, validator_config(false, enforce));
        let report = validator.validate_row(&row, "t");

        if let Some(corrected) = report.corrected_row {
            let keys: Vec<&str> = corrected.keys().map(String::as_str).collect();
            prop_assert_eq!(keys, COLUMNS.to_vec());
        } else {
            prop_assert!(row.is_empty() || report.has_errors());
        }
    }

    #[test]
    fn prop_every_row_yields_outcomes(row in row()) {
        let registry = registry();
        let validator = RowValidator::new(&registry, ValidationConfig::default());
        let report = validator.validate_row(&row, "t");

        if row.is_empty() {
            prop_assert_eq!(report.outcomes.len(), 1);
        } else {
            let extraneous = row.keys().filter(|k| !COLUMNS.contains(&k.as_str())).count();
            prop_assert_eq!(report.outcomes.len(), COLUMNS.len() + extraneous);
        }
    }

    #[test]
    fn prop_revalidating_clean_row_is_silent(row in clean_row()) {
        let registry = registry();
        let validator = RowValidator::new(&registry, ValidationConfig::default());
        let report = validator.validate_row(&row, "t");

        prop_assert!(!report.has_errors(), "{:?}", report.outcomes);
        let corrected = report.corrected_row.unwrap();

        let again = validator.validate_row(&corrected, "t");
        prop_assert!(!again.has_errors(), "{:?}", again.outcomes);
        prop_assert!(!again.has_warnings(), "{:?}", again.outcomes);
        prop_assert_eq!(again.corrected_row, Some(corrected));
    }

    #[test]
    fn prop_every_corrected_row_is_a_fixed_point(row in row()) {
        let registry = registry();
        let validator = RowValidator::new(&registry, ValidationConfig::default());
        let report = validator.validate_row(&row, "t");

        let Some(corrected) = report.corrected_row else {
            return Ok(());
        };

        let again = validator.validate_row(&corrected, "t");
        prop_assert!(!again.has_errors(), "{:?}", again.outcomes);
        prop_assert!(!again.has_warnings(), "{:?}", again.outcomes);
        prop_assert_eq!(again.corrected_row, Some(corrected));
    }

    #[test]
    fn prop_missing_required_is_filled_not_rejected(row in row()) {
        let registry = registry();
        let validator = RowValidator::new(&registry, ValidationConfig::default());
        let report = validator.validate_row(&row, "t");

        let type_errors = report
            .outcomes
            .iter()
            .any(|o| o.is_error() && o.error_kind() == Some(ErrorKind::TypeMismatch));
        prop_assert_eq!(report.corrected_row.is_some(), !row.is_empty() && !type_errors);
    }

    #[test]
    fn prop_reject_policy_never_emits_rows_with_errors(row in row()) {
        let registry = registry();
        let validator = RowValidator::new(&registry, validator_config(true, true));
        let report = validator.validate_row(&row, "t");

        if report.has_errors() {
            prop_assert!(report.corrected_row.is_none());
        }
    }

    #[test]
    fn prop_batch_counts_match_outcomes(rows in prop::collection::vec(row(), 0..6)) {
        let registry = registry();
        let validator = RowValidator::new(&registry, ValidationConfig::default());

        let mut payload = TableRows::new();
        payload.extend_table("t", rows.clone());
        let batch = validator.validate_payload(&payload);

        let total = batch.success_count + batch.warning_count + batch.error_count;
        prop_assert_eq!(total, batch.outcomes().count());
        prop_assert!(total >= rows.len().max(1));

        let table = batch.table("t").unwrap();
        prop_assert_eq!(table.rows_processed, rows.len());
        prop_assert_eq!(table.corrected_rows.len() + table.rows_rejected, rows.len());
    }

    #[test]
    fn prop_classify_is_total_and_deterministic(payload in any_json(), kind_index in 0usize..26) {
        let classifier = Classifier::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let kind = EndpointKind::ALL[kind_index % EndpointKind::ALL.len()];
        let label = label_for(kind);

        let first = classifier.classify(label, &payload, "u1");
        let second = classifier.classify(label, &payload, "u1");
        prop_assert_eq!(&first, &second);

        let allowed = kind.tables();
        for table in first.table_names() {
            if kind != EndpointKind::ActivityTimeSeries && kind != EndpointKind::ActivityIntraday {
                prop_assert!(allowed.iter().any(|t| *t == table), "{} wrote {}", kind, table);
            }
        }
    }
}

fn label_for(kind: EndpointKind) -> &'static str {
    match kind {
        EndpointKind::HeartRateZones => "Heart Rate Time Series by Date",
        EndpointKind::HeartRateIntraday => "Heart Rate Intraday by Date",
        EndpointKind::ActivityTimeSeries => "Activity Time Series (No Intraday)",
        EndpointKind::DailyActivitySummary => "Daily Activity Summary",
        EndpointKind::ActivityIntraday => "Activity Intraday by Date (Steps)",
        EndpointKind::CaloriesIntraday => "Activity Intraday by Date (Calories)",
        EndpointKind::SkinTemperature => "Temperature (Skin) Summary by Date",
        EndpointKind::SpO2Summary => "SpO2 Summary by Date",
        EndpointKind::SpO2Intraday => "SpO2 Intraday by Date",
        EndpointKind::Profile => "Get Profile",
        EndpointKind::Devices => "Get Devices",
        EndpointKind::Badges => "Get Badges",
        EndpointKind::Friends => "Get Friends",
        EndpointKind::WeightLogs => "Weight Log",
        EndpointKind::HrvSummary => "HRV Summary by Date",
        EndpointKind::HrvIntraday => "HRV Intraday by Date",
        EndpointKind::BreathingRateIntraday => "Breathing Rate Intraday by Date",
        EndpointKind::BreathingRateSummary => "Breathing Rate Summary by Date",
        EndpointKind::ActivityLogList => "Activity Log List",
        EndpointKind::LifetimeStats => "Lifetime Stats",
        EndpointKind::SleepLogRange => "Sleep Log by Date Range",
        EndpointKind::SleepLogByDate => "Sleep Log by Date",
        EndpointKind::SleepLogList => "Sleep Log List",
        EndpointKind::AzmTimeSeries => "AZM Time Series by Date",
        EndpointKind::Vo2MaxSummary => "VO2 Max Summary by Date",
        EndpointKind::AzmIntraday => "AZM Intraday by Date",
    }
}

#[test]
fn test_labels_resolve_to_their_kind() {
    for kind in EndpointKind::ALL {
        assert_eq!(EndpointKind::resolve(label_for(*kind)), Some(*kind));
    }
}
