use serde::Serialize;
use std::fmt;

use super::format::VendorFormat;

/// Problems found on one source row. `row` is 1-based, header excluded.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RowReport {
    pub row: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl RowReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Per-batch accounting of what the parser kept and what it dropped.
///
/// Only rows with at least one error or warning get a [`RowReport`].
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub format: VendorFormat,
    pub total_rows: usize,
    pub valid_rows: usize,
    pub rows: Vec<RowReport>,
}

impl IngestReport {
    pub fn new(format: VendorFormat) -> Self {
        Self {
            format,
            total_rows: 0,
            valid_rows: 0,
            rows: Vec::new(),
        }
    }

    pub(crate) fn push_row(&mut self, index: usize, errors: Vec<String>, warnings: Vec<String>) {
        self.total_rows += 1;
        if errors.is_empty() {
            self.valid_rows += 1;
        }
        if !errors.is_empty() || !warnings.is_empty() {
            self.rows.push(RowReport {
                row: index + 1,
                errors,
                warnings,
            });
        }
    }

    pub fn invalid_rows(&self) -> usize {
        self.total_rows - self.valid_rows
    }

    pub fn error_count(&self) -> usize {
        self.rows.iter().map(|r| r.errors.len()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.rows.iter().map(|r| r.warnings.len()).sum()
    }

    /// Rows that were dropped.
    pub fn rejected(&self) -> impl Iterator<Item = &RowReport> {
        self.rows.iter().filter(|r| !r.is_valid())
    }

    pub fn all_valid(&self) -> bool {
        self.valid_rows == self.total_rows
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} rows valid", self.valid_rows, self.total_rows)
    }
}

/// Records kept by a parser together with the batch report.
#[derive(Debug, Clone)]
pub struct ParseOutcome<T> {
    pub records: Vec<T>,
    pub report: IngestReport,
}
