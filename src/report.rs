//! # Report Aggregator
//!
//! Folds row reports into per-table reports and per-table reports into a
//! batch report. The batch summary carries the outcome counts and the
//! corrected payload destined for storage.

use crate::rows::{CandidateRow, TableRows};
use crate::schema::validator::{ErrorKind, FieldOutcome, RowReport, WHOLE_RECORD};
use serde::Serialize;

/// Outcomes and corrected rows for one table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableReport {
    pub table_name: String,
    pub successes: Vec<FieldOutcome>,
    pub warnings: Vec<FieldOutcome>,
    pub errors: Vec<FieldOutcome>,
    pub corrected_rows: Vec<CandidateRow>,
    /// Rows handed to `add_row`
    pub rows_processed: usize,
    /// Rows reported but not emitted
    pub rows_rejected: usize,
}

impl TableReport {
    pub fn new(table_name: impl Into<String>) -> Self {
        TableReport {
            table_name: table_name.into(),
            ..TableReport::default()
        }
    }

    /// Route one outcome into the matching list
    pub fn add_outcome(&mut self, outcome: FieldOutcome) {
        debug_assert_eq!(outcome.table_name(), self.table_name);
        match outcome {
            FieldOutcome::Success { .. } => self.successes.push(outcome),
            FieldOutcome::Warning { .. } => self.warnings.push(outcome),
            FieldOutcome::Error { .. } => self.errors.push(outcome),
        }
    }

    /// Fold a row report into this table.
    ///
    /// A row report without outcomes means the validator skipped the row
    /// entirely; it is recorded as an internal error and not emitted.
    pub fn add_row(&mut self, row: RowReport) {
        self.rows_processed += 1;

        if row.outcomes.is_empty() {
            let table = self.table_name.clone();
            self.add_outcome(FieldOutcome::error(
                &table,
                WHOLE_RECORD,
                "row produced no outcomes",
                ErrorKind::InternalError,
            ));
            self.rows_rejected += 1;
            return;
        }

        for outcome in row.outcomes {
            self.add_outcome(outcome);
        }

        match row.corrected_row {
            Some(corrected) => self.corrected_rows.push(corrected),
            None => self.rows_rejected += 1,
        }
    }

    pub fn outcome_count(&self) -> usize {
        self.successes.len() + self.warnings.len() + self.errors.len()
    }

    /// No warnings and no errors
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }
}

/// Outcomes for a whole classified payload
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub table_reports: Vec<TableReport>,
    pub success_count: usize,
    pub warning_count: usize,
    pub error_count: usize,
}

/// Counts plus the corrected payload
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub successes: usize,
    pub warnings: usize,
    pub errors: usize,
    pub corrected_payload: TableRows,
}

impl BatchReport {
    pub fn new() -> Self {
        BatchReport::default()
    }

    /// Append a table report and tally its outcomes
    pub fn add_table(&mut self, report: TableReport) {
        self.success_count += report.successes.len();
        self.warning_count += report.warnings.len();
        self.error_count += report.errors.len();
        self.table_reports.push(report);
    }

    pub fn is_empty(&self) -> bool {
        self.table_reports.is_empty()
    }

    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.table_reports.iter().find(|t| t.table_name == name)
    }

    /// Every outcome, table by table
    pub fn outcomes(&self) -> impl Iterator<Item = &FieldOutcome> {
        self.table_reports
            .iter()
            .flat_map(|t| t.successes.iter().chain(&t.warnings).chain(&t.errors))
    }

    /// Corrected rows per table; tables without emitted rows are left out
    pub fn corrected_payload(&self) -> TableRows {
        self.table_reports
            .iter()
            .filter(|t| !t.corrected_rows.is_empty())
            .map(|t| (t.table_name.clone(), t.corrected_rows.clone()))
            .collect()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            successes: self.success_count,
            warnings: self.warning_count,
            errors: self.error_count,
            corrected_payload: self.corrected_payload(),
        }
    }

    /// Like [`summary`](Self::summary) without cloning the rows
    pub fn into_summary(self) -> Summary {
        let mut payload = TableRows::new();
        for report in self.table_reports {
            if !report.corrected_rows.is_empty() {
                payload.extend_table(&report.table_name, report.corrected_rows);
            }
        }
        Summary {
            successes: self.success_count,
            warnings: self.warning_count,
            errors: self.error_count,
            corrected_payload: payload,
        }
    }
}
