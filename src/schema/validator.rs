//! # Row Compliance Validator
//!
//! Reconciles candidate rows against table schemas:
//! - Missing columns (REQUIRED -> error, NULLABLE -> warning + null)
//! - Extraneous fields (warning, dropped)
//! - Per-field presence and type checks with canonicalisation
//!
//! Every check yields a [`FieldOutcome`]; the corrected row is folded onto a
//! single accumulator and finally laid out in schema column order.

use super::{json_type_name, ColumnDefinition, SchemaRegistry, TableSchema};
use crate::config::{MissingRequiredPolicy, ValidationConfig};
use crate::report::{BatchReport, TableReport};
use crate::rows::{CandidateRow, TableRows};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Field name recorded on outcomes that concern a whole table or row
pub const WHOLE_RECORD: &str = "N/A";

/// Value written into an absent REQUIRED column under the sentinel policy.
/// `check_field` accepts it as-is so corrected rows re-validate cleanly.
pub const REQUIRED_SENTINEL: i64 = 0;

/// Classification of warnings and errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    MissingRequired,
    MissingOptional,
    TypeMismatch,
    TableNotFound,
    TableSchemaNotFound,
    DataEmptyOrNotAnObject,
    InternalError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MissingRequired => write!(f, "MISSING_REQUIRED"),
            ErrorKind::MissingOptional => write!(f, "MISSING_OPTIONAL"),
            ErrorKind::TypeMismatch => write!(f, "TYPE_MISMATCH"),
            ErrorKind::TableNotFound => write!(f, "TABLE_NOT_FOUND"),
            ErrorKind::TableSchemaNotFound => write!(f, "TABLE_SCHEMA_NOT_FOUND"),
            ErrorKind::DataEmptyOrNotAnObject => write!(f, "DATA_EMPTY_OR_NOT_AN_OBJECT"),
            ErrorKind::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Where an outcome applies and what happened
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeDetail {
    pub table_name: String,
    pub field_name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl OutcomeDetail {
    fn new(table: &str, field: &str, message: impl Into<String>, kind: Option<ErrorKind>) -> Self {
        OutcomeDetail {
            table_name: table.to_string(),
            field_name: field.to_string(),
            message: message.into(),
            error_kind: kind,
        }
    }
}

/// Result of checking one field (or one table/row-level condition)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldOutcome {
    /// Value accepted, in canonical form
    Success {
        #[serde(flatten)]
        detail: OutcomeDetail,
        value: Value,
    },
    /// Non-fatal deviation; the corrected value is `null` or the field is dropped
    Warning {
        #[serde(flatten)]
        detail: OutcomeDetail,
    },
    /// Fatal deviation for the field
    Error {
        #[serde(flatten)]
        detail: OutcomeDetail,
    },
}

impl FieldOutcome {
    pub fn success(table: &str, field: &str, message: impl Into<String>, value: Value) -> Self {
        FieldOutcome::Success {
            detail: OutcomeDetail::new(table, field, message, None),
            value,
        }
    }

    pub fn warning(
        table: &str,
        field: &str,
        message: impl Into<String>,
        kind: Option<ErrorKind>,
    ) -> Self {
        FieldOutcome::Warning {
            detail: OutcomeDetail::new(table, field, message, kind),
        }
    }

    pub fn error(table: &str, field: &str, message: impl Into<String>, kind: ErrorKind) -> Self {
        FieldOutcome::Error {
            detail: OutcomeDetail::new(table, field, message, Some(kind)),
        }
    }

    pub fn detail(&self) -> &OutcomeDetail {
        match self {
            FieldOutcome::Success { detail, .. }
            | FieldOutcome::Warning { detail }
            | FieldOutcome::Error { detail } => detail,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.detail().table_name
    }

    pub fn field_name(&self) -> &str {
        &self.detail().field_name
    }

    pub fn message(&self) -> &str {
        &self.detail().message
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.detail().error_kind
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FieldOutcome::Success { .. })
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, FieldOutcome::Warning { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FieldOutcome::Error { .. })
    }

    /// Value this field contributes to the corrected row.
    ///
    /// Success keeps the accepted value, a warning degrades to `null`, an
    /// error has no value of its own (the row policy decides).
    pub fn corrected_value(&self) -> Option<Value> {
        match self {
            FieldOutcome::Success { value, .. } => Some(value.clone()),
            FieldOutcome::Warning { .. } => Some(Value::Null),
            FieldOutcome::Error { .. } => None,
        }
    }
}

impl fmt::Display for FieldOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FieldOutcome::Success { .. } => "SUCCESS",
            FieldOutcome::Warning { .. } => "WARNING",
            FieldOutcome::Error { .. } => "ERROR",
        };
        let d = self.detail();
        match d.error_kind {
            Some(kind) => write!(
                f,
                "{label} {}.{}: {} ({})",
                d.table_name, d.field_name, kind, d.message
            ),
            None => write!(f, "{label} {}.{}: {}", d.table_name, d.field_name, d.message),
        }
    }
}

/// Outcomes for one row plus its corrected form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowReport {
    pub outcomes: Vec<FieldOutcome>,
    /// `None` when the row could not be emitted
    pub corrected_row: Option<CandidateRow>,
}

impl RowReport {
    /// A row that is reported but not emitted
    pub fn rejected(outcome: FieldOutcome) -> Self {
        RowReport {
            outcomes: vec![outcome],
            corrected_row: None,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.outcomes.iter().any(FieldOutcome::is_error)
    }

    pub fn has_warnings(&self) -> bool {
        self.outcomes.iter().any(FieldOutcome::is_warning)
    }
}

/// Check one field against its column definition.
///
/// `value` is `None` when the row has no such key. An empty string counts as
/// absent. An explicit `null` is accepted for NULLABLE columns, and the
/// integer [`REQUIRED_SENTINEL`] is accepted for REQUIRED ones.
pub fn check_field(
    table: &str,
    field: &str,
    value: Option<&Value>,
    column: &ColumnDefinition,
    enforce_types: bool,
) -> FieldOutcome {
    let absent = |reason: &str| {
        if column.is_required() {
            FieldOutcome::error(table, field, reason, ErrorKind::MissingRequired)
        } else {
            FieldOutcome::warning(table, field, reason, Some(ErrorKind::MissingOptional))
        }
    };

    let value = match value {
        None => return absent("field not present"),
        Some(Value::String(s)) if s.is_empty() => return absent("field is empty"),
        Some(Value::Null) if column.is_required() => return absent("required field is null"),
        Some(Value::Null) => return FieldOutcome::success(table, field, "null accepted", Value::Null),
        Some(value) if column.is_required() && is_required_sentinel(value) => {
            return FieldOutcome::success(table, field, "sentinel accepted", value.clone())
        }
        Some(value) => value,
    };

    if !enforce_types {
        return FieldOutcome::success(table, field, "value accepted", value.clone());
    }

    match column.semantic_type.conform(value) {
        Some(canonical) if &canonical == value => {
            FieldOutcome::success(table, field, "value accepted", canonical)
        }
        Some(canonical) => FieldOutcome::success(
            table,
            field,
            format!("value coerced to {}", column.semantic_type),
            canonical,
        ),
        None => {
            let message = format!(
                "expected {}, got {} ({value})",
                column.semantic_type,
                json_type_name(value)
            );
            if column.is_required() {
                FieldOutcome::error(table, field, message, ErrorKind::TypeMismatch)
            } else {
                FieldOutcome::warning(table, field, message, Some(ErrorKind::TypeMismatch))
            }
        }
    }
}

fn is_required_sentinel(value: &Value) -> bool {
    value.as_i64() == Some(REQUIRED_SENTINEL)
}

/// Validates rows and tables against a registry under one policy.
#[derive(Debug, Clone, Copy)]
pub struct RowValidator<'a> {
    registry: &'a SchemaRegistry,
    config: ValidationConfig,
}

impl<'a> RowValidator<'a> {
    pub fn new(registry: &'a SchemaRegistry, config: ValidationConfig) -> Self {
        RowValidator { registry, config }
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    pub fn config(&self) -> ValidationConfig {
        self.config
    }

    /// Validate one row for the named table
    pub fn validate_row(&self, row: &CandidateRow, table: &str) -> RowReport {
        match self.registry.lookup(table) {
            Some(schema) => self.validate_against(row, schema),
            None => schema_not_found(table),
        }
    }

    /// Validate an untyped JSON row; non-objects are reported, not rejected
    pub fn validate_json_row(&self, row: &Value, table: &str) -> RowReport {
        let Some(schema) = self.registry.lookup(table) else {
            return schema_not_found(table);
        };
        match row {
            Value::Object(map) => self.validate_against(map, schema),
            _ => RowReport::rejected(FieldOutcome::warning(
                table,
                WHOLE_RECORD,
                format!("row is {}, expected an object", json_type_name(row)),
                Some(ErrorKind::DataEmptyOrNotAnObject),
            )),
        }
    }

    /// Validate one row against a known schema
    pub fn validate_against(&self, row: &CandidateRow, schema: &TableSchema) -> RowReport {
        let table = schema.name.as_str();

        if row.is_empty() {
            return RowReport::rejected(FieldOutcome::warning(
                table,
                WHOLE_RECORD,
                "row is empty",
                Some(ErrorKind::DataEmptyOrNotAnObject),
            ));
        }

        let mut outcomes = Vec::with_capacity(schema.arity() + 1);
        let mut corrected = CandidateRow::new();
        let mut rejected = false;

        // Missing-field pass
        for column in schema.columns.iter().filter(|c| !row.contains_key(&c.name)) {
            let outcome = check_field(table, &column.name, None, column, self.config.enforce_types);
            rejected |= !self.fold(&mut corrected, column, &outcome);
            outcomes.push(outcome);
        }

        // Extraneous-field pass
        for field in row.keys().filter(|k| !schema.has_column(k)) {
            outcomes.push(FieldOutcome::warning(table, field, "field not in schema", None));
        }

        // Per-field compliance
        for (field, value) in row {
            if let Some(column) = schema.column(field) {
                let outcome = check_field(table, field, Some(value), column, self.config.enforce_types);
                rejected |= !self.fold(&mut corrected, column, &outcome);
                outcomes.push(outcome);
            }
        }

        let corrected_row = (!rejected).then(|| {
            schema
                .columns
                .iter()
                .map(|c| {
                    let value = corrected.remove(&c.name).unwrap_or(Value::Null);
                    (c.name.clone(), value)
                })
                .collect()
        });

        RowReport {
            outcomes,
            corrected_row,
        }
    }

    /// Apply one outcome to the accumulator. Returns false if the row must
    /// be rejected.
    ///
    /// Only an absent REQUIRED value is filled with the sentinel. A present
    /// REQUIRED value of the wrong type rejects the row under either policy.
    fn fold(&self, corrected: &mut CandidateRow, column: &ColumnDefinition, outcome: &FieldOutcome) -> bool {
        if let Some(value) = outcome.corrected_value() {
            corrected.insert(column.name.clone(), value);
            return true;
        }
        match (outcome.error_kind(), self.config.missing_required) {
            (Some(ErrorKind::MissingRequired), MissingRequiredPolicy::Sentinel) => {
                corrected.insert(column.name.clone(), Value::from(REQUIRED_SENTINEL));
                true
            }
            _ => false,
        }
    }

    /// Validate every row of one table
    pub fn validate_table(&self, table: &str, rows: &[CandidateRow]) -> TableReport {
        let mut report = TableReport::new(table);

        let Some(schema) = self.registry.lookup(table) else {
            tracing::warn!(table = %table, rows = rows.len(), "table_schema_missing");
            report.add_outcome(FieldOutcome::error(
                table,
                WHOLE_RECORD,
                "no schema registered for table",
                ErrorKind::TableSchemaNotFound,
            ));
            return report;
        };

        if rows.is_empty() {
            report.add_outcome(FieldOutcome::warning(
                table,
                WHOLE_RECORD,
                "table has no rows",
                Some(ErrorKind::DataEmptyOrNotAnObject),
            ));
            return report;
        }

        for row in rows {
            report.add_row(self.validate_against(row, schema));
        }

        tracing::debug!(
            table = %table,
            rows = report.rows_processed,
            rejected = report.rows_rejected,
            warnings = report.warnings.len(),
            errors = report.errors.len(),
            "table_validated"
        );
        report
    }

    /// Validate a whole classified payload
    pub fn validate_payload(&self, payload: &TableRows) -> BatchReport {
        let mut batch = BatchReport::new();

        for (table, rows) in payload.iter() {
            if !self.registry.contains(table) {
                tracing::warn!(table = %table, rows = rows.len(), "table_not_in_registry");
                let mut report = TableReport::new(table);
                report.add_outcome(FieldOutcome::error(
                    table,
                    WHOLE_RECORD,
                    "table not found in dataset",
                    ErrorKind::TableNotFound,
                ));
                batch.add_table(report);
                continue;
            }
            batch.add_table(self.validate_table(table, rows));
        }

        tracing::info!(
            tables = batch.table_reports.len(),
            successes = batch.success_count,
            warnings = batch.warning_count,
            errors = batch.error_count,
            "batch_validated"
        );
        batch
    }
}

fn schema_not_found(table: &str) -> RowReport {
    RowReport::rejected(FieldOutcome::error(
        table,
        WHOLE_RECORD,
        "no schema registered for table",
        ErrorKind::TableSchemaNotFound,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SemanticType, TableSchema};
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new("test")
            .with_table(
                TableSchema::new("t")
                    .with_column(ColumnDefinition::required("id", SemanticType::String))
                    .nullable("date", SemanticType::Date, "")
                    .nullable("value", SemanticType::Integer, ""),
            )
            .unwrap()
    }

    fn row(value: Value) -> CandidateRow {
        value.as_object().cloned().unwrap()
    }

    fn validator(registry: &SchemaRegistry) -> RowValidator<'_> {
        RowValidator::new(registry, ValidationConfig::default())
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::MissingRequired.to_string(), "MISSING_REQUIRED");
        assert_eq!(
            ErrorKind::DataEmptyOrNotAnObject.to_string(),
            "DATA_EMPTY_OR_NOT_AN_OBJECT"
        );
        assert_eq!(
            serde_json::to_value(ErrorKind::TableSchemaNotFound).unwrap(),
            json!("TABLE_SCHEMA_NOT_FOUND")
        );
    }

    #[test]
    fn test_check_field_absent() {
        let required = ColumnDefinition::required("id", SemanticType::String);
        let nullable = ColumnDefinition::new("value", SemanticType::Integer);

        let out = check_field("t", "id", None, &required, true);
        assert!(out.is_error());
        assert_eq!(out.error_kind(), Some(ErrorKind::MissingRequired));
        assert_eq!(out.corrected_value(), None);

        let out = check_field("t", "value", Some(&json!("")), &nullable, true);
        assert!(out.is_warning());
        assert_eq!(out.error_kind(), Some(ErrorKind::MissingOptional));
        assert_eq!(out.corrected_value(), Some(Value::Null));
    }

    #[test]
    fn test_check_field_null() {
        let required = ColumnDefinition::required("id", SemanticType::String);
        let nullable = ColumnDefinition::new("value", SemanticType::Integer);

        assert!(check_field("t", "id", Some(&Value::Null), &required, true).is_error());
        let out = check_field("t", "value", Some(&Value::Null), &nullable, true);
        assert!(out.is_success());
        assert_eq!(out.corrected_value(), Some(Value::Null));
    }

    #[test]
    fn test_check_field_type_mismatch() {
        let nullable = ColumnDefinition::new("value", SemanticType::Integer);
        let out = check_field("t", "value", Some(&json!("abc")), &nullable, true);
        assert!(out.is_warning());
        assert_eq!(out.error_kind(), Some(ErrorKind::TypeMismatch));
        assert!(out.message().contains("expected INTEGER"));

        let required = ColumnDefinition::required("value", SemanticType::Integer);
        let out = check_field("t", "value", Some(&json!({"a": 1})), &required, true);
        assert!(out.is_error());
        assert_eq!(out.error_kind(), Some(ErrorKind::TypeMismatch));
    }

    #[test]
    fn test_check_field_coercion() {
        let col = ColumnDefinition::new("value", SemanticType::Integer);
        let out = check_field("t", "value", Some(&json!("1234")), &col, true);
        assert!(out.is_success());
        assert_eq!(out.corrected_value(), Some(json!(1234)));
        assert!(out.message().contains("coerced"));
    }

    #[test]
    fn test_check_field_without_type_enforcement() {
        let col = ColumnDefinition::new("value", SemanticType::Integer);
        let out = check_field("t", "value", Some(&json!("abc")), &col, false);
        assert!(out.is_success());
        assert_eq!(out.corrected_value(), Some(json!("abc")));
    }

    #[test]
    fn test_validate_row_unknown_table() {
        let registry = registry();
        let report = validator(&registry).validate_row(&row(json!({"id": "u"})), "nope");
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].error_kind(), Some(ErrorKind::TableSchemaNotFound));
        assert!(report.corrected_row.is_none());
    }

    #[test]
    fn test_validate_row_empty() {
        let registry = registry();
        let report = validator(&registry).validate_row(&CandidateRow::new(), "t");
        assert_eq!(report.outcomes.len(), 1);
        assert!(report.outcomes[0].is_warning());
        assert_eq!(
            report.outcomes[0].error_kind(),
            Some(ErrorKind::DataEmptyOrNotAnObject)
        );
        assert!(report.corrected_row.is_none());
    }

    #[test]
    fn test_validate_json_row_not_object() {
        let registry = registry();
        let report = validator(&registry).validate_json_row(&json!([1, 2]), "t");
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(
            report.outcomes[0].error_kind(),
            Some(ErrorKind::DataEmptyOrNotAnObject)
        );
    }

    #[test]
    fn test_validate_row_several_missing_fields_retained() {
        let registry = registry();
        let report = validator(&registry).validate_row(&row(json!({"id": "u1"})), "t");

        let corrected = report.corrected_row.unwrap();
        assert_eq!(corrected.len(), 3);
        assert_eq!(corrected["id"], json!("u1"));
        assert_eq!(corrected["date"], Value::Null);
        assert_eq!(corrected["value"], Value::Null);

        let warnings: Vec<_> = report.outcomes.iter().filter(|o| o.is_warning()).collect();
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_validate_row_outcome_order() {
        let registry = registry();
        let report = validator(&registry)
            .validate_row(&row(json!({"value": 1, "extra": true, "id": "u"})), "t");

        let fields: Vec<_> = report.outcomes.iter().map(FieldOutcome::field_name).collect();
        assert_eq!(fields, vec!["date", "extra", "value", "id"]);
    }

    #[test]
    fn test_corrected_row_in_schema_order() {
        let registry = registry();
        let report = validator(&registry)
            .validate_row(&row(json!({"value": 1, "date": "2024-01-01", "id": "u"})), "t");
        let keys: Vec<_> = report.corrected_row.unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["id", "date", "value"]);
    }

    #[test]
    fn test_reject_policy() {
        let registry = registry();
        let config = ValidationConfig {
            missing_required: MissingRequiredPolicy::Reject,
            enforce_types: true,
        };
        let report = RowValidator::new(&registry, config)
            .validate_row(&row(json!({"date": "2024-01-01", "value": 3})), "t");
        assert!(report.has_errors());
        assert!(report.corrected_row.is_none());
    }

    #[test]
    fn test_required_sentinel_is_accepted_on_revalidation() {
        let registry = SchemaRegistry::new("test")
            .with_table(
                TableSchema::new("steps")
                    .with_column(ColumnDefinition::required("id", SemanticType::String))
                    .with_column(ColumnDefinition::required("date", SemanticType::Date))
                    .with_column(ColumnDefinition::required("value", SemanticType::Integer)),
            )
            .unwrap();
        let v = validator(&registry);

        let report = v.validate_row(&row(json!({"id": "u1", "value": 5})), "steps");
        let corrected = report.corrected_row.unwrap();
        assert_eq!(corrected["date"], json!(REQUIRED_SENTINEL));

        let again = v.validate_row(&corrected, "steps");
        assert!(!again.has_errors(), "{:?}", again.outcomes);
        assert!(!again.has_warnings(), "{:?}", again.outcomes);
        assert_eq!(again.corrected_row, Some(corrected));
    }

    #[test]
    fn test_sentinel_only_accepted_on_required_columns() {
        let nullable = ColumnDefinition::new("date", SemanticType::Date);
        let out = check_field("t", "date", Some(&json!(0)), &nullable, true);
        assert_eq!(out.error_kind(), Some(ErrorKind::TypeMismatch));

        let required = ColumnDefinition::required("id", SemanticType::String);
        let out = check_field("t", "id", Some(&json!(0)), &required, true);
        assert!(out.is_success());
        assert_eq!(out.corrected_value(), Some(json!(0)));

        let out = check_field("t", "id", Some(&json!(0.0)), &required, true);
        assert_eq!(out.corrected_value(), Some(json!("0.0")));
    }

    #[test]
    fn test_malformed_required_value_rejects_row() {
        let registry = SchemaRegistry::new("test")
            .with_table(
                TableSchema::new("steps")
                    .with_column(ColumnDefinition::required("id", SemanticType::String))
                    .with_column(ColumnDefinition::required("date", SemanticType::Date)),
            )
            .unwrap();

        let report = validator(&registry)
            .validate_row(&row(json!({"id": "u1", "date": "03/01/2024"})), "steps");
        let errors: Vec<_> = report.outcomes.iter().filter(|o| o.is_error()).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_kind(), Some(ErrorKind::TypeMismatch));
        assert!(report.corrected_row.is_none());
    }

    #[test]
    fn test_validate_table_empty_and_unknown() {
        let registry = registry();
        let v = validator(&registry);

        let report = v.validate_table("t", &[]);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.corrected_rows.is_empty());

        let report = v.validate_table("nope", &[row(json!({"id": "u"}))]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].error_kind(), Some(ErrorKind::TableSchemaNotFound));
    }

    #[test]
    fn test_validate_payload_table_not_found() {
        let registry = registry();
        let mut payload = TableRows::new();
        payload.push_row("ghost", row(json!({"id": "u"})));
        payload.push_row("t", row(json!({"id": "u", "date": "2024-01-01", "value": 1})));

        let batch = validator(&registry).validate_payload(&payload);
        assert_eq!(batch.table_reports.len(), 2);
        assert_eq!(
            batch.table_reports[0].errors[0].error_kind(),
            Some(ErrorKind::TableNotFound)
        );
        assert_eq!(batch.error_count, 1);
        assert_eq!(batch.success_count, 3);

        let summary = batch.summary();
        assert!(!summary.corrected_payload.contains("ghost"));
        assert_eq!(summary.corrected_payload.get("t").unwrap().len(), 1);
    }

    #[test]
    fn test_field_outcome_serialization() {
        let out = FieldOutcome::error("t", "id", "field not present", ErrorKind::MissingRequired);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["type"], json!("ERROR"));
        assert_eq!(json["table_name"], json!("t"));
        assert_eq!(json["error_kind"], json!("MISSING_REQUIRED"));

        let out = FieldOutcome::success("t", "value", "value accepted", json!(1));
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["type"], json!("SUCCESS"));
        assert_eq!(json["value"], json!(1));
        assert!(json.get("error_kind").is_none());
    }
}
