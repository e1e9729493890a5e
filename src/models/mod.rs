//! Domain models for the customer import pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`CustomerRecord`] - the normalized record every format is parsed into
//! - [`RawRow`] - one physical CSV line as an ordered column→cell mapping
//!
//! A [`CustomerRecord`] is never mutated after construction. Later stages
//! (enrichment in particular) produce a new copy with selected fields
//! overridden via the `with_*` builders, so a record handed to a caller
//! never changes underneath them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Customer Record
// =============================================================================

/// The normalized customer record, common to all input formats.
///
/// `metadata` keeps insertion order and carries provenance such as the
/// original column list, the department, and the phone-source tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerRecord {
    /// Customer/employee identifier, as found in the file.
    pub identifier: String,
    /// Normalized full name ("John Smith").
    pub full_name: String,
    /// Primary email, lower-cased.
    pub email: String,
    /// Secondary email (format B's personal email), if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub secondary_email: Option<String>,
    /// Normalized phone, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone: Option<String>,
    /// Salary as a plain number; 0.0 when the source cell was absent or
    /// unparsable (record validation rejects non-positive salaries).
    pub salary: f64,
    /// Ordered provenance metadata.
    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub metadata: Map<String, Value>,
}

impl CustomerRecord {
    /// Create a record with the required fields; optional fields start empty.
    pub fn new(identifier: String, full_name: String, email: String, salary: f64) -> Self {
        Self {
            identifier,
            full_name,
            email,
            secondary_email: None,
            phone: None,
            salary,
            metadata: Map::new(),
        }
    }

    /// Copy of this record with the secondary email set.
    pub fn with_secondary_email(mut self, email: impl Into<String>) -> Self {
        self.secondary_email = Some(email.into());
        self
    }

    /// Copy of this record with the phone set.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Copy of this record with one metadata key set (last write wins).
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether the phone field is present and non-blank.
    pub fn has_phone(&self) -> bool {
        self.phone
            .as_deref()
            .map(|p| !p.trim().is_empty())
            .unwrap_or(false)
    }
}

// =============================================================================
// Raw Row
// =============================================================================

/// One physical CSV line, as an ordered mapping from the column header
/// (exactly as it appeared in the file) to the raw cell string.
///
/// Lookups are ASCII case-insensitive because header acceptance is; the
/// stored column spelling is preserved for provenance metadata. Built per
/// line, consumed within one row-processing pass, then dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column→cell pair. A duplicate header (case-insensitive)
    /// overwrites the earlier value but keeps the first spelling and slot.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self
            .cells
            .iter_mut()
            .find(|(c, _)| c.eq_ignore_ascii_case(&column))
        {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column, value)),
        }
    }

    /// Cell value for a column, matched case-insensitively.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(column))
            .map(|(_, v)| v.as_str())
    }

    /// Cell value for a column, only when present and non-blank.
    pub fn get_filled(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !v.trim().is_empty())
    }

    /// Whether the column appeared in this row.
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Column names in file order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    /// (column, cell) pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
