//! The three built-in CSV formats.
//!
//! A format is a small configuration value: its tag, the headers it
//! expects, and one extra row check layered on top of the shared
//! cell/row validation. New formats are added by building another
//! [`FormatSpec`] and registering it, not by subclassing anything.

use crate::fields::{
    CORPORATE_EMAIL_COLUMN, DEPARTMENT_COLUMN, FIRST_NAME_COLUMN, FULL_NAME_COLUMN,
    LAST_NAME_COLUMN, NAME_COLUMN, PERSONAL_EMAIL_COLUMN, SURNAME_COLUMN,
};
use crate::models::RawRow;
use crate::validation::ValidationOutcome;

/// Everything format-specific about a parser.
#[derive(Clone, Copy)]
pub struct FormatSpec {
    /// Registry tag ("format-a", ...).
    pub tag: &'static str,
    /// Headers that must be present (case-insensitive, any order,
    /// extra columns tolerated).
    pub expected_headers: &'static [&'static str],
    /// Format-specific row validation, run after the generic layers.
    pub row_check: fn(&RawRow, usize) -> ValidationOutcome,
}

/// Format A: one identifier, a single full-name column, one email.
pub fn format_a() -> FormatSpec {
    FormatSpec {
        tag: "format-a",
        expected_headers: &["CustomerID", "Full Name", "Email", "Phone", "Salary"],
        row_check: check_format_a,
    }
}

/// Format B: split name, corporate + personal email pair.
pub fn format_b() -> FormatSpec {
    FormatSpec {
        tag: "format-b",
        expected_headers: &[
            "ID",
            "Name",
            "Surname",
            "CorporateEmail",
            "PersonalEmail",
            "Salary",
        ],
        row_check: check_format_b,
    }
}

/// Format C: split name, work email, department.
pub fn format_c() -> FormatSpec {
    FormatSpec {
        tag: "format-c",
        expected_headers: &[
            "EmployeeID",
            "FirstName",
            "LastName",
            "WorkEmail",
            "Phone",
            "Salary",
            "Department",
        ],
        row_check: check_format_c,
    }
}

/// The full name must carry at least a first and a last name. Blank
/// names are left to the generic required-column check.
fn check_format_a(row: &RawRow, row_number: usize) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::new(row_number);
    if let Some(full_name) = row.get(FULL_NAME_COLUMN) {
        if !full_name.trim().is_empty() && full_name.split_whitespace().count() < 2 {
            outcome.add_error("full name must contain first and last name");
        }
    }
    outcome
}

/// Both name parts and BOTH emails must be populated. Format B treats
/// the corporate and personal addresses as equally mandatory, so this
/// is stricter than the generic "at least one email" pair rule.
fn check_format_b(row: &RawRow, row_number: usize) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::new(row_number);
    if row.get_filled(NAME_COLUMN).is_none() || row.get_filled(SURNAME_COLUMN).is_none() {
        outcome.add_error("name and surname are both required");
    }
    if row.get_filled(CORPORATE_EMAIL_COLUMN).is_none()
        || row.get_filled(PERSONAL_EMAIL_COLUMN).is_none()
    {
        outcome.add_error("corporate and personal email are both required");
    }
    outcome
}

/// Both name parts and the department must be populated.
fn check_format_c(row: &RawRow, row_number: usize) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::new(row_number);
    if row.get_filled(FIRST_NAME_COLUMN).is_none() || row.get_filled(LAST_NAME_COLUMN).is_none() {
        outcome.add_error("first name and last name are both required");
    }
    if row.get_filled(DEPARTMENT_COLUMN).is_none() {
        outcome.add_error("department is required");
    }
    outcome
}
