//! # Schema Module
//!
//! Declarative column catalogs for the destination tables and the row
//! compliance checks that run against them:
//! - Typed, mode-annotated column definitions (`REQUIRED` / `NULLABLE`)
//! - A read-only registry with a process-wide built-in catalog
//! - Field and row reconciliation producing corrected rows plus outcomes
//!
//! ## Example Catalog Entry
//!
//! ```json
//! {
//!   "name": "hrv_summary",
//!   "columns": [
//!     { "name": "id",          "type": "STRING", "mode": "REQUIRED" },
//!     { "name": "date",        "type": "DATE",   "mode": "REQUIRED" },
//!     { "name": "daily_rmssd", "type": "FLOAT" },
//!     { "name": "deep_rmssd",  "type": "FLOAT" }
//!   ]
//! }
//! ```

pub mod builtin;
pub mod catalog;
pub mod validator;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

pub use catalog::{SchemaError, SchemaRegistry};
pub use validator::{check_field, ErrorKind, FieldOutcome, OutcomeDetail, RowReport, RowValidator};

const DATE_FORMAT: &str = "%Y-%m-%d";
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Column type as understood by the analytics store
///
/// Catalog files are parsed through [`FromStr`], so type names are
/// case-insensitive and accept warehouse aliases (`INT64`, `FLOAT64`, `BOOL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum SemanticType {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    Timestamp,
    Datetime,
}

impl SemanticType {
    /// Check if a JSON value already has the canonical shape for this type
    pub fn matches(&self, value: &Value) -> bool {
        self.conform(value).is_some_and(|canonical| &canonical == value)
    }

    /// Coerce a JSON value into this type's canonical representation.
    ///
    /// Returns `None` when the value cannot represent the type. Objects and
    /// arrays never conform; callers treat `null` separately.
    pub fn conform(&self, value: &Value) -> Option<Value> {
        match (self, value) {
            (_, Value::Null | Value::Array(_) | Value::Object(_)) => None,

            (SemanticType::String, Value::String(_)) => Some(value.clone()),
            (SemanticType::String, Value::Number(n)) => Some(Value::String(n.to_string())),
            (SemanticType::String, Value::Bool(b)) => Some(Value::String(b.to_string())),

            (SemanticType::Integer, Value::Number(n)) => integral_number(n),
            (SemanticType::Integer, Value::String(s)) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    return Some(Value::from(i));
                }
                s.parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .and_then(|n| integral_number(&n))
            }

            (SemanticType::Float, Value::Number(_)) => Some(value.clone()),
            (SemanticType::Float, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),

            (SemanticType::Boolean, Value::Bool(_)) => Some(value.clone()),
            (SemanticType::Boolean, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },

            (SemanticType::Date, Value::String(s)) => parse_date(s)
                .or_else(|| parse_naive_datetime(s).map(|dt| dt.date()))
                .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
                .map(|d| Value::String(d.format(DATE_FORMAT).to_string())),

            (SemanticType::Timestamp, Value::String(s)) => {
                let valid = DateTime::parse_from_rfc3339(s).is_ok()
                    || parse_naive_datetime(s).is_some()
                    || parse_date(s).is_some();
                valid.then(|| value.clone())
            }

            (SemanticType::Datetime, Value::String(s)) => {
                let valid = parse_naive_datetime(s).is_some() || parse_date(s).is_some();
                valid.then(|| value.clone())
            }

            _ => None,
        }
    }

}

impl FromStr for SemanticType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STRING" => Ok(SemanticType::String),
            "INTEGER" | "INT64" => Ok(SemanticType::Integer),
            "FLOAT" | "FLOAT64" | "NUMERIC" => Ok(SemanticType::Float),
            "BOOLEAN" | "BOOL" => Ok(SemanticType::Boolean),
            "DATE" => Ok(SemanticType::Date),
            "TIMESTAMP" => Ok(SemanticType::Timestamp),
            "DATETIME" => Ok(SemanticType::Datetime),
            _ => Err(SchemaError::InvalidSchema(format!("unknown column type '{s}'"))),
        }
    }
}

impl TryFrom<String> for SemanticType {
    type Error = SchemaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::String => write!(f, "STRING"),
            SemanticType::Integer => write!(f, "INTEGER"),
            SemanticType::Float => write!(f, "FLOAT"),
            SemanticType::Boolean => write!(f, "BOOLEAN"),
            SemanticType::Date => write!(f, "DATE"),
            SemanticType::Timestamp => write!(f, "TIMESTAMP"),
            SemanticType::Datetime => write!(f, "DATETIME"),
        }
    }
}

#[allow(clippy::float_cmp)]
fn integral_number(n: &Number) -> Option<Value> {
    if let Some(i) = n.as_i64() {
        return Some(Value::from(i));
    }
    if let Some(u) = n.as_u64() {
        return i64::try_from(u).ok().map(Value::from);
    }
    let f = n.as_f64()?;
    let in_range = f.is_finite() && f.abs() < 9.0e15;
    (in_range && f.fract() == 0.0).then(|| Value::from(f as i64))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

fn parse_naive_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Name of a JSON value's type, for outcome messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Whether a column must carry a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnMode {
    Required,
    #[default]
    Nullable,
}

impl fmt::Display for ColumnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnMode::Required => write!(f, "REQUIRED"),
            ColumnMode::Nullable => write!(f, "NULLABLE"),
        }
    }
}

/// Schema for a single column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name
    pub name: String,
    /// Semantic type
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
    /// Required or nullable
    #[serde(default)]
    pub mode: ColumnMode,
    /// Free-text description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl ColumnDefinition {
    /// Create a nullable column
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        ColumnDefinition {
            name: name.into(),
            semantic_type,
            mode: ColumnMode::Nullable,
            description: String::new(),
        }
    }

    /// Create a required column
    pub fn required(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        ColumnDefinition::new(name, semantic_type).with_mode(ColumnMode::Required)
    }

    pub fn with_mode(mut self, mode: ColumnMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_required(&self) -> bool {
        self.mode == ColumnMode::Required
    }
}

impl fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.name, self.semantic_type, self.mode)
    }
}

/// Complete schema definition for a destination table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name
    pub name: String,
    /// Column definitions, in storage order
    pub columns: Vec<ColumnDefinition>,
}

impl TableSchema {
    /// Create a new table schema with no columns
    pub fn new(name: impl Into<String>) -> Self {
        TableSchema {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Add a column to the schema
    pub fn with_column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// Add the `id` / `date` key pair every wearable table starts with
    pub fn with_identity(self, date_description: &str) -> Self {
        self.with_column(
            ColumnDefinition::required("id", SemanticType::String).with_description("Primary Key"),
        )
        .with_column(
            ColumnDefinition::required("date", SemanticType::Date)
                .with_description(date_description),
        )
    }

    /// Add a nullable column
    pub fn nullable(self, name: &str, semantic_type: SemanticType, description: &str) -> Self {
        self.with_column(ColumnDefinition::new(name, semantic_type).with_description(description))
    }

    /// Get the arity (number of columns)
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    /// Get column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Get all column names in storage order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Columns declared `REQUIRED`
    pub fn required_columns(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.iter().filter(|c| c.is_required())
    }
}

impl fmt::Display for TableSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{col}")?;
        }
        write!(f, ")")
    }
}
