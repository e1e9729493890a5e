//! Field transformation and record building.
//!
//! [`CustomerTransformer`] does three jobs, in pipeline order:
//!
//! 1. normalize one raw cell by its column's semantic role
//!    ([`transform_cell`](CustomerTransformer::transform_cell))
//! 2. build the normalized [`CustomerRecord`] from a raw row using the
//!    field-priority rules ([`build_record`](CustomerTransformer::build_record))
//! 3. optionally fill a missing phone from the external directory
//!    ([`enrich`](CustomerTransformer::enrich))
//!
//! Enrichment never fails a row; it only annotates provenance in the
//! record's metadata.

use std::sync::Arc;

use crate::enrich::PhoneDirectory;
use crate::fields::{
    FieldRole, CORPORATE_EMAIL_COLUMN, DEPARTMENT_COLUMN, EMAIL_COLUMN, FIRST_NAME_COLUMN,
    FULL_NAME_COLUMN, IDENTIFIER_COLUMNS, LAST_NAME_COLUMN, NAME_COLUMN, PERSONAL_EMAIL_COLUMN,
    PHONE_COLUMNS, SALARY_COLUMNS, SURNAME_COLUMN, WORK_EMAIL_COLUMN,
};
use crate::models::{CustomerRecord, RawRow};

/// Metadata key listing the original columns of the source row.
pub const COLUMNS_KEY: &str = "columns";
/// Metadata key for format C's department.
pub const DEPARTMENT_KEY: &str = "department";
/// Metadata key recording where the phone number came from.
pub const PHONE_SOURCE_KEY: &str = "phone_source";
/// Phone was filled in from the external directory.
pub const PHONE_SOURCE_EXTERNAL: &str = "external_directory";
/// The directory failed or knew no number; phone stays absent.
pub const PHONE_SOURCE_UNAVAILABLE: &str = "not available";

// =============================================================================
// Customer Transformer
// =============================================================================

/// Normalizes cells and assembles records; shared by all format parsers.
#[derive(Clone)]
pub struct CustomerTransformer {
    directory: Arc<dyn PhoneDirectory>,
}

impl CustomerTransformer {
    pub fn new(directory: Arc<dyn PhoneDirectory>) -> Self {
        Self { directory }
    }

    /// Normalize one raw cell by the semantic role of its column.
    ///
    /// Blank input passes through unchanged; columns outside the
    /// vocabulary are only trimmed.
    pub fn transform_cell(&self, value: &str, field_name: &str) -> String {
        if value.trim().is_empty() {
            return value.to_string();
        }
        match FieldRole::of(field_name) {
            Some(FieldRole::Name) => title_case(value),
            Some(FieldRole::Email) => value.trim().to_lowercase(),
            Some(FieldRole::Phone) => digits_with_plus(value),
            Some(FieldRole::Salary) => decimal_form(value),
            _ => value.trim().to_string(),
        }
    }

    /// Assemble the normalized record from one raw row.
    ///
    /// Field priorities: identifier from the first identifier column
    /// present; full name from `Full Name`, else `Name`+`Surname`, else
    /// `FirstName`+`LastName`; email from `Email`, else the corporate/
    /// personal pair with corporate winning, else `WorkEmail`; phone from
    /// the first non-blank phone column; salary from the first salary
    /// column, 0.0 when absent or unparsable so the record-validation
    /// gate rejects it downstream.
    pub fn build_record(&self, row: &RawRow) -> CustomerRecord {
        let identifier = IDENTIFIER_COLUMNS
            .iter()
            .find_map(|column| row.get(column).map(|v| self.transform_cell(v, column)))
            .unwrap_or_default();

        let full_name = if let Some(value) = row.get(FULL_NAME_COLUMN) {
            self.transform_cell(value, FULL_NAME_COLUMN)
        } else if row.contains(NAME_COLUMN) || row.contains(SURNAME_COLUMN) {
            self.join_name_parts(row, NAME_COLUMN, SURNAME_COLUMN)
        } else {
            self.join_name_parts(row, FIRST_NAME_COLUMN, LAST_NAME_COLUMN)
        };

        let mut secondary_email = None;
        let email = if let Some(value) = row.get(EMAIL_COLUMN) {
            self.transform_cell(value, EMAIL_COLUMN)
        } else {
            let corporate = row
                .get_filled(CORPORATE_EMAIL_COLUMN)
                .map(|v| self.transform_cell(v, CORPORATE_EMAIL_COLUMN));
            let personal = row
                .get_filled(PERSONAL_EMAIL_COLUMN)
                .map(|v| self.transform_cell(v, PERSONAL_EMAIL_COLUMN));
            match (corporate, personal) {
                (Some(corporate), personal) => {
                    secondary_email = personal;
                    corporate
                }
                (None, Some(personal)) => personal,
                (None, None) => row
                    .get(WORK_EMAIL_COLUMN)
                    .map(|v| self.transform_cell(v, WORK_EMAIL_COLUMN))
                    .unwrap_or_default(),
            }
        };

        let phone = PHONE_COLUMNS
            .iter()
            .find_map(|column| row.get_filled(column).map(|v| self.transform_cell(v, column)));

        let salary = SALARY_COLUMNS
            .iter()
            .find_map(|column| row.get(column).map(|v| self.transform_cell(v, column)))
            .and_then(|normalized| normalized.parse::<f64>().ok())
            .unwrap_or(0.0);

        let columns = row.columns().collect::<Vec<_>>().join(", ");
        let mut record = CustomerRecord::new(identifier, full_name, email, salary)
            .with_metadata(COLUMNS_KEY, columns);
        if let Some(secondary) = secondary_email {
            record = record.with_secondary_email(secondary);
        }
        if let Some(phone) = phone {
            record = record.with_phone(phone);
        }
        if let Some(department) = row.get(DEPARTMENT_COLUMN) {
            record = record.with_metadata(DEPARTMENT_KEY, department.trim());
        }
        record
    }

    /// Fill a missing phone from the external directory.
    ///
    /// A record that already has a phone is returned unchanged without
    /// any external call, as is one whose identifier is blank. Lookup
    /// misses and failures are treated identically: the phone stays
    /// absent and the record is tagged `"not available"`.
    pub async fn enrich(&self, record: CustomerRecord) -> CustomerRecord {
        if record.has_phone() || record.identifier.trim().is_empty() {
            return record;
        }
        let looked_up = self.directory.lookup_phone(record.identifier.trim()).await;
        match looked_up {
            Ok(Some(phone)) => record
                .with_phone(phone)
                .with_metadata(PHONE_SOURCE_KEY, PHONE_SOURCE_EXTERNAL),
            Ok(None) | Err(_) => record.with_metadata(PHONE_SOURCE_KEY, PHONE_SOURCE_UNAVAILABLE),
        }
    }

    fn join_name_parts(&self, row: &RawRow, first: &str, second: &str) -> String {
        let a = row
            .get(first)
            .map(|v| self.transform_cell(v, first))
            .unwrap_or_default();
        let b = row
            .get(second)
            .map(|v| self.transform_cell(v, second))
            .unwrap_or_default();
        format!("{a} {b}").trim().to_string()
    }
}

// =============================================================================
// Normalization rules
// =============================================================================

/// Trim, lower-case, title-case each whitespace token, single spaces.
fn title_case(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Keep digits and '+', then make sure the result starts with '+'.
fn digits_with_plus(value: &str) -> String {
    let kept: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    if kept.is_empty() || kept.starts_with('+') {
        kept
    } else {
        format!("+{kept}")
    }
}

/// Keep digits, '.' and ',', then normalize decimal commas to dots.
fn decimal_form(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect::<String>()
        .replace(',', ".")
}

// =============================================================================
// Tests
// =============================================================================
