//! Declarative payload extraction.
//!
//! Most endpoint families are "walk one or two nested arrays, stamp every
//! leaf with the user id and a date, copy a fixed set of fields". A
//! [`RecordSpec`] describes exactly that and [`RecordSpec::extract_into`]
//! evaluates it. Paths are dot-separated; numeric segments index arrays.

use super::ShapeContext;
use crate::rows::{CandidateRow, TableRows};
use serde_json::{Map, Value};

/// Handler-local extraction failure. Never escapes `classify`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("expected an array at '{0}'")]
    MissingArray(String),
    #[error("expected an object at '{0}'")]
    MissingObject(String),
    #[error("record {index} under '{path}' is not an object")]
    BadRecord { path: String, index: usize },
    #[error("payload carries no recognised series key")]
    UnknownSeries,
}

/// Resolve a dotted path. `null` counts as absent.
pub fn lookup<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    let mut current = value;
    if !path.is_empty() {
        for segment in path.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
    }
    (!current.is_null()).then_some(current)
}

pub fn array_at<'v>(value: &'v Value, path: &str) -> Result<&'v [Value], ShapeError> {
    lookup(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| ShapeError::MissingArray(display_path(path)))
}

pub fn object_at<'v>(value: &'v Value, path: &str) -> Result<&'v Map<String, Value>, ShapeError> {
    lookup(value, path)
        .and_then(Value::as_object)
        .ok_or_else(|| ShapeError::MissingObject(display_path(path)))
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<payload>".to_string()
    } else {
        path.to_string()
    }
}

/// Date portion of an ISO date-time string
pub fn date_part(s: &str) -> &str {
    s.split(['T', ' ']).next().unwrap_or(s)
}

/// Where a column's value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Path(&'static str),
    /// First path that resolves
    Either(&'static str, &'static str),
    /// No source; the default always applies
    Constant,
}

/// Column-from-path mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub column: &'static str,
    pub source: Source,
    /// Written when the source is absent; `None` omits the column
    pub default: Option<i64>,
}

pub const fn field(column: &'static str, path: &'static str) -> Field {
    Field {
        column,
        source: Source::Path(path),
        default: None,
    }
}

pub const fn either(column: &'static str, path: &'static str, alt: &'static str) -> Field {
    Field {
        column,
        source: Source::Either(path, alt),
        default: None,
    }
}

pub const fn or_zero(field: Field) -> Field {
    Field {
        default: Some(0),
        ..field
    }
}

pub const fn constant(column: &'static str, value: i64) -> Field {
    Field {
        column,
        source: Source::Constant,
        default: Some(value),
    }
}

impl Field {
    pub fn resolve(&self, record: &Value) -> Option<Value> {
        let found = match self.source {
            Source::Path(path) => lookup(record, path),
            Source::Either(path, alt) => lookup(record, path).or_else(|| lookup(record, alt)),
            Source::Constant => None,
        };
        found.cloned().or_else(|| self.default.map(Value::from))
    }
}

/// Copy every resolvable field of `record` into `row`
pub fn project(record: &Value, fields: &[Field], row: &mut CandidateRow) {
    for f in fields {
        if let Some(value) = f.resolve(record) {
            row.insert(f.column.to_string(), value);
        }
    }
}

/// Where a row's `date` comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateAnchor {
    /// Path inside the leaf record
    Record(&'static str),
    /// First of two paths inside the leaf record
    RecordEither(&'static str, &'static str),
    /// Date portion of a date-time inside the leaf record
    RecordDatePart(&'static str),
    /// Path inside the enclosing (outer) record of a nested walk
    Parent(&'static str),
    /// Path from the payload root, falling back to the reference date
    Payload(&'static str),
    /// The classifier's reference date
    Reference,
}

impl DateAnchor {
    fn resolve(self, ctx: &ShapeContext<'_>, payload: &Value, parent: Option<&Value>, record: &Value) -> Option<Value> {
        match self {
            DateAnchor::Record(path) => lookup(record, path).cloned(),
            DateAnchor::RecordEither(path, alt) => {
                lookup(record, path).or_else(|| lookup(record, alt)).cloned()
            }
            DateAnchor::RecordDatePart(path) => lookup(record, path)
                .and_then(Value::as_str)
                .map(|s| Value::String(date_part(s).to_string())),
            DateAnchor::Parent(path) => parent.and_then(|p| lookup(p, path)).cloned(),
            DateAnchor::Payload(path) => lookup(payload, path)
                .cloned()
                .or_else(|| Some(ctx.reference_date_value())),
            DateAnchor::Reference => Some(ctx.reference_date_value()),
        }
    }
}

/// Which records a spec walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPath {
    /// Every element of the array at the path (`""` = the payload itself)
    Array(&'static str),
    /// The single object at the path
    Single(&'static str),
    /// Every element of `inner` inside every element of `outer`
    Nested {
        outer: &'static str,
        inner: &'static str,
    },
}

/// Per-record hook for columns that a flat field list cannot express
pub type Enrich = fn(&Value, &mut CandidateRow) -> Result<(), ShapeError>;

/// Declarative description of one table's extraction
#[derive(Debug, Clone, Copy)]
pub struct RecordSpec {
    pub table: &'static str,
    pub records: RecordPath,
    pub anchor: DateAnchor,
    pub fields: &'static [Field],
    /// Fields read from the outer record of a nested walk
    pub parent_fields: &'static [Field],
    /// Records lacking this path are skipped
    pub skip_unless: Option<&'static str>,
    pub enrich: Option<Enrich>,
}

impl RecordSpec {
    pub const fn new(table: &'static str, records: RecordPath, anchor: DateAnchor, fields: &'static [Field]) -> Self {
        RecordSpec {
            table,
            records,
            anchor,
            fields,
            parent_fields: &[],
            skip_unless: None,
            enrich: None,
        }
    }

    pub const fn with_parent_fields(mut self, fields: &'static [Field]) -> Self {
        self.parent_fields = fields;
        self
    }

    pub const fn skip_unless(mut self, path: &'static str) -> Self {
        self.skip_unless = Some(path);
        self
    }

    pub const fn with_enrich(mut self, enrich: Enrich) -> Self {
        self.enrich = Some(enrich);
        self
    }

    /// Extract this spec's rows into `out`. The table is created even when
    /// no record qualifies.
    pub fn extract_into(&self, ctx: &ShapeContext<'_>, payload: &Value, out: &mut TableRows) -> Result<(), ShapeError> {
        let mut rows = Vec::new();

        match self.records {
            RecordPath::Array(path) => {
                for (index, record) in array_at(payload, path)?.iter().enumerate() {
                    ensure_object(record, path, index)?;
                    if let Some(row) = self.build_row(ctx, payload, None, record)? {
                        rows.push(row);
                    }
                }
            }
            RecordPath::Single(path) => {
                let record = lookup(payload, path)
                    .filter(|v| v.is_object())
                    .ok_or_else(|| ShapeError::MissingObject(display_path(path)))?;
                if let Some(row) = self.build_row(ctx, payload, None, record)? {
                    rows.push(row);
                }
            }
            RecordPath::Nested { outer, inner } => {
                for (outer_index, parent) in array_at(payload, outer)?.iter().enumerate() {
                    ensure_object(parent, outer, outer_index)?;
                    let inner_path = format!("{}[{outer_index}].{inner}", display_path(outer));
                    let leaves = lookup(parent, inner)
                        .and_then(Value::as_array)
                        .ok_or_else(|| ShapeError::MissingArray(inner_path.clone()))?;
                    for (index, record) in leaves.iter().enumerate() {
                        ensure_object(record, &inner_path, index)?;
                        if let Some(row) = self.build_row(ctx, payload, Some(parent), record)? {
                            rows.push(row);
                        }
                    }
                }
            }
        }

        out.extend_table(self.table, rows);
        Ok(())
    }

    fn build_row(
        &self,
        ctx: &ShapeContext<'_>,
        payload: &Value,
        parent: Option<&Value>,
        record: &Value,
    ) -> Result<Option<CandidateRow>, ShapeError> {
        if let Some(path) = self.skip_unless {
            if lookup(record, path).is_none() {
                return Ok(None);
            }
        }

        let mut row = ctx.row(self.anchor.resolve(ctx, payload, parent, record));
        if let Some(parent) = parent {
            project(parent, self.parent_fields, &mut row);
        }
        project(record, self.fields, &mut row);
        if let Some(enrich) = self.enrich {
            enrich(record, &mut row)?;
        }
        Ok(Some(row))
    }
}

fn ensure_object(record: &Value, path: &str, index: usize) -> Result<(), ShapeError> {
    if record.is_object() {
        Ok(())
    } else {
        Err(ShapeError::BadRecord {
            path: display_path(path),
            index,
        })
    }
}

/// Run several specs against one payload; all tables or none.
pub fn extract_all(ctx: &ShapeContext<'_>, payload: &Value, specs: &[RecordSpec]) -> Result<TableRows, ShapeError> {
    let mut out = TableRows::new();
    for spec in specs {
        spec.extract_into(ctx, payload, &mut out)?;
    }
    Ok(out)
}
