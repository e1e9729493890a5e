//! Validation for the customer import pipeline.
//!
//! Three layers, each catching a different class of defect:
//!
//! 1. **Cell** ([`CustomerValidator::validate_cell`]) - role-generic rules
//!    applied to one raw value; reusable across formats. Blank cells pass
//!    here because absence is a row-level concern.
//! 2. **Row** ([`CustomerValidator::validate_row`]) - which of the columns
//!    actually present in this header set are mandatory, plus the
//!    corporate/personal email pair rule.
//! 3. **Record** ([`CustomerValidator::validate_record`]) - the final,
//!    format-independent acceptance gate on the built record.
//!
//! Errors at every layer accumulate into a [`ValidationOutcome`]; nothing
//! short-circuits, so one pass reports everything wrong with a row.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::fields::{
    FieldRole, CORPORATE_EMAIL_COLUMN, EMAIL_COLUMN, FIRST_NAME_COLUMN, FULL_NAME_COLUMN,
    IDENTIFIER_COLUMNS, LAST_NAME_COLUMN, NAME_COLUMN, PERSONAL_EMAIL_COLUMN, SALARY_COLUMNS,
    SURNAME_COLUMN, WORK_EMAIL_COLUMN,
};
use crate::models::{CustomerRecord, RawRow};

/// `local@domain.tld`: at least one '@', a '.' after it, no whitespace.
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// Optional leading '+', then 1-16 digits, first digit non-zero.
static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("phone regex"));

// =============================================================================
// Validation Outcome
// =============================================================================

/// The accumulated result of one validation call.
///
/// Starts valid with zero errors; [`add_error`](Self::add_error) flips
/// validity to false irreversibly. There is no way to set an outcome back
/// to valid short of constructing a new one, which is why the flag and
/// the message list are not public fields.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    valid: bool,
    /// Row this outcome describes (0 = header/file scope).
    pub row: usize,
    /// Column, when the outcome is cell-scoped (1-based).
    pub column: Option<usize>,
    errors: Vec<String>,
}

impl ValidationOutcome {
    /// A fresh, valid outcome scoped to a row.
    pub fn new(row: usize) -> Self {
        Self {
            valid: true,
            row,
            column: None,
            errors: Vec::new(),
        }
    }

    /// A fresh, valid outcome scoped to one cell.
    pub fn for_cell(row: usize, column: usize) -> Self {
        Self {
            column: Some(column),
            ..Self::new(row)
        }
    }

    /// Append an error message and flip validity to false.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    /// Fold another outcome's messages (and invalidity) into this one.
    /// The receiver keeps its own row/column scope.
    pub fn merge(&mut self, other: ValidationOutcome) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Error messages, in the order they were added.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

// =============================================================================
// Customer Validator
// =============================================================================

/// Stateless validator shared by all format parsers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerValidator;

impl CustomerValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate one raw cell by the semantic role of its column.
    ///
    /// Columns outside the vocabulary and blank values yield a valid
    /// outcome. Checks within a role do not short-circuit each other.
    pub fn validate_cell(
        &self,
        value: &str,
        field_name: &str,
        row: usize,
        column: usize,
    ) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::for_cell(row, column);
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return outcome;
        }
        let Some(role) = FieldRole::of(field_name) else {
            return outcome;
        };
        match role {
            FieldRole::Identifier => {
                if trimmed.chars().count() < 3 {
                    outcome.add_error(format!(
                        "{field_name}: identifier must be at least 3 characters"
                    ));
                }
            }
            FieldRole::Name => {
                if trimmed.chars().count() < 2 {
                    outcome.add_error(format!("{field_name}: name must be at least 2 characters"));
                }
                if !trimmed.chars().all(is_name_char) {
                    outcome.add_error(format!("{field_name}: name contains invalid characters"));
                }
            }
            FieldRole::Email => {
                if !EMAIL_REGEX.is_match(trimmed) {
                    outcome
                        .add_error(format!("{field_name}: invalid email format ('{trimmed}')"));
                }
            }
            FieldRole::Phone => {
                if !PHONE_REGEX.is_match(trimmed) {
                    outcome
                        .add_error(format!("{field_name}: invalid phone format ('{trimmed}')"));
                }
            }
            FieldRole::Salary => {
                if !trimmed.parse::<f64>().map_or(false, |v| v > 0.0) {
                    outcome.add_error(format!("{field_name}: invalid salary ('{trimmed}')"));
                }
            }
            FieldRole::Department => {}
        }
        outcome
    }

    /// Validate cross-field requirements for one row.
    ///
    /// Only columns actually present in this row are considered: a format
    /// without a `Phone` column is not penalized for lacking one. Present
    /// identifier/name/email/salary columns must be non-blank, except the
    /// corporate/personal pair, which errors only when both are blank.
    pub fn validate_row(&self, row: &RawRow, row_number: usize) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new(row_number);

        let required = IDENTIFIER_COLUMNS
            .iter()
            .chain([
                &FULL_NAME_COLUMN,
                &NAME_COLUMN,
                &SURNAME_COLUMN,
                &FIRST_NAME_COLUMN,
                &LAST_NAME_COLUMN,
                &EMAIL_COLUMN,
                &WORK_EMAIL_COLUMN,
            ])
            .chain(SALARY_COLUMNS.iter());
        for column in required {
            if let Some(value) = row.get(column) {
                if value.trim().is_empty() {
                    outcome.add_error(format!("{column} is required"));
                }
            }
        }

        let corporate = row.get(CORPORATE_EMAIL_COLUMN);
        let personal = row.get(PERSONAL_EMAIL_COLUMN);
        match (corporate, personal) {
            (Some(c), Some(p)) if c.trim().is_empty() && p.trim().is_empty() => {
                outcome.add_error("at least one email required");
            }
            (Some(c), None) if c.trim().is_empty() => {
                outcome.add_error(format!("{CORPORATE_EMAIL_COLUMN} is required"));
            }
            (None, Some(p)) if p.trim().is_empty() => {
                outcome.add_error(format!("{PERSONAL_EMAIL_COLUMN} is required"));
            }
            _ => {}
        }

        outcome
    }

    /// Final acceptance gate on a built record.
    ///
    /// Catches defects that survive the earlier layers, such as a
    /// transformation producing an empty value, or a salary that was
    /// defaulted to zero because its column was absent.
    pub fn validate_record(&self, record: &CustomerRecord, row_number: usize) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new(row_number);
        if record.identifier.trim().is_empty() {
            outcome.add_error("identifier is empty");
        }
        if record.full_name.trim().is_empty() {
            outcome.add_error("full name is empty");
        }
        let email = record.email.trim();
        if email.is_empty() {
            outcome.add_error("email is empty");
        } else if !EMAIL_REGEX.is_match(email) {
            outcome.add_error(format!("invalid email format ('{email}')"));
        }
        if !(record.salary > 0.0) {
            outcome.add_error("salary must be positive");
        }
        outcome
    }
}

/// Letters (any script), whitespace, hyphen, apostrophe.
fn is_name_char(c: char) -> bool {
    c.is_alphabetic() || c.is_whitespace() || c == '-' || c == '\''
}

// =============================================================================
// Tests
// =============================================================================
