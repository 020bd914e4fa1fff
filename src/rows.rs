//! Row containers shared by the classifier, validator and report.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// A flat row keyed by column name, in insertion order.
pub type CandidateRow = Map<String, Value>;

/// Insertion-ordered mapping from table name to rows.
///
/// Used both for classifier output and for the corrected payload handed to
/// storage. Serializes as a JSON object whose keys keep their order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRows {
    tables: Vec<(String, Vec<CandidateRow>)>,
}

impl TableRows {
    pub fn new() -> Self {
        TableRows { tables: Vec::new() }
    }

    /// No tables at all (an empty table still counts as present)
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Total rows across all tables
    pub fn row_count(&self) -> usize {
        self.tables.iter().map(|(_, rows)| rows.len()).sum()
    }

    /// Get the row list for a table, creating an empty one at the end if absent
    pub fn ensure_table(&mut self, table: &str) -> &mut Vec<CandidateRow> {
        let pos = match self.tables.iter().position(|(name, _)| name == table) {
            Some(pos) => pos,
            None => {
                self.tables.push((table.to_string(), Vec::new()));
                self.tables.len() - 1
            }
        };
        &mut self.tables[pos].1
    }

    pub fn push_row(&mut self, table: &str, row: CandidateRow) {
        self.ensure_table(table).push(row);
    }

    pub fn extend_table(&mut self, table: &str, rows: impl IntoIterator<Item = CandidateRow>) {
        self.ensure_table(table).extend(rows);
    }

    pub fn get(&self, table: &str) -> Option<&[CandidateRow]> {
        self.tables
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, rows)| rows.as_slice())
    }

    pub fn contains(&self, table: &str) -> bool {
        self.get(table).is_some()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CandidateRow])> {
        self.tables
            .iter()
            .map(|(name, rows)| (name.as_str(), rows.as_slice()))
    }

    /// Append another mapping: rows for a known table are concatenated,
    /// new tables keep their relative order at the end.
    pub fn merge(&mut self, other: TableRows) {
        for (table, rows) in other.tables {
            self.extend_table(&table, rows);
        }
    }
}

impl IntoIterator for TableRows {
    type Item = (String, Vec<CandidateRow>);
    type IntoIter = std::vec::IntoIter<(String, Vec<CandidateRow>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}

impl FromIterator<(String, Vec<CandidateRow>)> for TableRows {
    fn from_iter<I: IntoIterator<Item = (String, Vec<CandidateRow>)>>(iter: I) -> Self {
        let mut rows = TableRows::new();
        for (table, table_rows) in iter {
            rows.extend_table(&table, table_rows);
        }
        rows
    }
}

impl Serialize for TableRows {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for (table, rows) in &self.tables {
            map.serialize_entry(table, rows)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TableRows {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableRowsVisitor;

        impl<'de> Visitor<'de> for TableRowsVisitor {
            type Value = TableRows;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping table names to arrays of row objects")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<TableRows, A::Error> {
                let mut rows = TableRows::new();
                while let Some((table, table_rows)) =
                    access.next_entry::<String, Vec<CandidateRow>>()?
                {
                    rows.extend_table(&table, table_rows);
                }
                Ok(rows)
            }
        }

        deserializer.deserialize_map(TableRowsVisitor)
    }
}
