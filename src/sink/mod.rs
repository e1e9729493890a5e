//! Structured error collection for the customer import pipeline.
//!
//! Parsing never aborts on bad data; everything wrong with a file ends up
//! here instead. This module contains:
//!
//! - [`ErrorKind`] - validation | parsing | transformation | exception
//! - [`ErrorEntry`] - one immutable recorded error with row/column context
//! - [`ErrorSink`] - the append-only store with queries and a text report
//!
//! Entries are never mutated or removed individually; the only bulk
//! operation is [`ErrorSink::clear`]. Row 0 is reserved for header/file
//! scoped errors.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::validation::ValidationOutcome;

/// Fixed report body for a sink with no entries.
pub const NO_ERRORS_REPORT: &str = "No errors recorded.";

// =============================================================================
// Error Kind
// =============================================================================

/// Category of a recorded error.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// A content rule failed (cell, row, or record layer).
    Validation,
    /// A structural/file-level failure (bad header, too-short file).
    Parsing,
    /// A value could not be normalized (explicitly raised, never implied).
    Transformation,
    /// An unexpected failure caught at a row boundary.
    Exception,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::Parsing => "parsing",
            Self::Transformation => "transformation",
            Self::Exception => "exception",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Error Entry
// =============================================================================

/// One recorded error. Immutable after creation: the sink only hands out
/// shared references, and nothing here has a setter.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEntry {
    pub kind: ErrorKind,
    /// Row the error belongs to (0 = header/file scope, data rows from 1).
    pub row: usize,
    /// Column, when the error is cell-scoped (1-based).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// Column name, for transformation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Free-text label for exception errors ("row processing", ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ErrorEntry {
    fn new(kind: ErrorKind, row: usize, message: String) -> Self {
        Self {
            kind,
            row,
            column: None,
            message,
            expected: None,
            actual: None,
            field: None,
            context: None,
            timestamp: Utc::now(),
        }
    }

    /// One-line rendering used by [`ErrorSink::report`].
    pub fn render(&self) -> String {
        match self.column {
            Some(column) => format!("[{}] Row {}, Column {}: {}", self.kind, self.row, column, self.message),
            None => format!("[{}] Row {}: {}", self.kind, self.row, self.message),
        }
    }
}

// =============================================================================
// Error Sink
// =============================================================================

/// Append-only error store for one parse, or for several when shared.
/// Not internally synchronized: sharing across parses means passing the
/// same `&mut ErrorSink` sequentially, which the borrow checker
/// enforces.
#[derive(Debug, Default)]
pub struct ErrorSink {
    entries: Vec<ErrorEntry>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand every message of an outcome into one validation entry, all
    /// sharing the outcome's row/column. A valid outcome adds nothing.
    pub fn record_validation(&mut self, outcome: &ValidationOutcome) {
        for message in outcome.errors() {
            if message.is_empty() {
                continue;
            }
            let mut entry =
                ErrorEntry::new(ErrorKind::Validation, outcome.row, message.clone());
            entry.column = outcome.column;
            self.entries.push(entry);
        }
    }

    /// Append one parsing entry. No-op when `message` is empty.
    pub fn record_parsing(
        &mut self,
        row: usize,
        column: Option<usize>,
        message: impl Into<String>,
        expected: Option<String>,
        actual: Option<String>,
    ) {
        let message = message.into();
        if message.is_empty() {
            return;
        }
        let mut entry = ErrorEntry::new(ErrorKind::Parsing, row, message);
        entry.column = column;
        entry.expected = expected;
        entry.actual = actual;
        self.entries.push(entry);
    }

    /// Append one exception entry whose message embeds the context and
    /// the underlying failure's description.
    pub fn record_exception(&mut self, row: usize, error: &dyn fmt::Display, context: &str) {
        let mut entry =
            ErrorEntry::new(ErrorKind::Exception, row, format!("{context}: {error}"));
        entry.context = Some(context.to_string());
        self.entries.push(entry);
    }

    /// Append one transformation entry. No-op when `message` is empty.
    pub fn record_transformation(
        &mut self,
        row: usize,
        field: &str,
        actual_value: &str,
        message: impl Into<String>,
    ) {
        let message = message.into();
        if message.is_empty() {
            return;
        }
        let mut entry = ErrorEntry::new(ErrorKind::Transformation, row, message);
        entry.field = Some(field.to_string());
        entry.actual = Some(actual_value.to_string());
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    /// All entries, in insertion order.
    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    /// Entries belonging to one row, in insertion order.
    pub fn entries_for_row(&self, row: usize) -> Vec<&ErrorEntry> {
        self.entries.iter().filter(|e| e.row == row).collect()
    }

    /// Per-kind totals, kinds listed in first-seen order.
    pub fn count_by_kind(&self) -> Vec<(ErrorKind, usize)> {
        let mut counts: Vec<(ErrorKind, usize)> = Vec::new();
        for entry in &self.entries {
            match counts.iter_mut().find(|(kind, _)| *kind == entry.kind) {
                Some((_, count)) => *count += 1,
                None => counts.push((entry.kind, 1)),
            }
        }
        counts
    }

    /// Entries grouped by row number, rows ascending.
    pub fn entries_by_row(&self) -> BTreeMap<usize, Vec<&ErrorEntry>> {
        let mut grouped: BTreeMap<usize, Vec<&ErrorEntry>> = BTreeMap::new();
        for entry in &self.entries {
            grouped.entry(entry.row).or_default().push(entry);
        }
        grouped
    }

    /// Render the whole sink as a text report: a timestamped header, the
    /// total count, then one section per kind in first-seen order. An
    /// empty sink returns exactly [`NO_ERRORS_REPORT`].
    pub fn report(&self) -> String {
        if self.entries.is_empty() {
            return NO_ERRORS_REPORT.to_string();
        }
        let mut lines = Vec::new();
        lines.push(format!("Error report generated at {}", Utc::now().to_rfc3339()));
        lines.push(format!("Total errors: {}", self.entries.len()));
        for (kind, count) in self.count_by_kind() {
            lines.push(String::new());
            lines.push(format!("{kind} errors ({count}):"));
            for entry in self.entries.iter().filter(|e| e.kind == kind) {
                lines.push(format!("  {}", entry.render()));
            }
        }
        lines.join("\n")
    }

    /// Empty all state; subsequent queries behave as on a fresh sink.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// =============================================================================
// Tests
// =============================================================================
