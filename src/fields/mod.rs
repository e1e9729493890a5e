//! Field vocabulary for the customer import pipeline.
//!
//! Every supported CSV format draws its column names from one shared
//! vocabulary. This module contains:
//!
//! - [`FieldRole`] - semantic role of a column (identifier, name, ...)
//! - the ordered column-name constants the transformer resolves by
//!
//! Column names are matched case-insensitively everywhere, but the
//! constants keep the display form used in generated files and reports.

use serde::{Deserialize, Serialize};

// =============================================================================
// Column Name Constants
// =============================================================================

/// Identifier columns, in resolution priority order.
pub const IDENTIFIER_COLUMNS: &[&str] = &["CustomerID", "ID", "EmployeeID"];

/// Single-column full name ("John Smith").
pub const FULL_NAME_COLUMN: &str = "Full Name";
/// First part of a split name (paired with [`SURNAME_COLUMN`]).
pub const NAME_COLUMN: &str = "Name";
/// Second part of a split name (paired with [`NAME_COLUMN`]).
pub const SURNAME_COLUMN: &str = "Surname";
/// First part of a split name (paired with [`LAST_NAME_COLUMN`]).
pub const FIRST_NAME_COLUMN: &str = "FirstName";
/// Second part of a split name (paired with [`FIRST_NAME_COLUMN`]).
pub const LAST_NAME_COLUMN: &str = "LastName";

/// Plain email column.
pub const EMAIL_COLUMN: &str = "Email";
/// Corporate email, wins over personal when both are present.
pub const CORPORATE_EMAIL_COLUMN: &str = "CorporateEmail";
/// Personal email, becomes the secondary email when corporate exists.
pub const PERSONAL_EMAIL_COLUMN: &str = "PersonalEmail";
/// Work email, lowest-priority primary email source.
pub const WORK_EMAIL_COLUMN: &str = "WorkEmail";

/// Phone columns, in resolution priority order.
pub const PHONE_COLUMNS: &[&str] = &["Phone", "MobileNumber"];

/// Salary columns, in resolution priority order.
pub const SALARY_COLUMNS: &[&str] = &["Salary", "AnnualSalary"];

/// Department column (metadata only, never normalized into a field).
pub const DEPARTMENT_COLUMN: &str = "Department";

// =============================================================================
// Field Role
// =============================================================================

/// Semantic role of a CSV column.
///
/// Validation and transformation rules key off the role, not the exact
/// column name, so `Email` and `CorporateEmail` share one rule set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    /// Customer/employee identifier.
    Identifier,
    /// Any name column, whole or split.
    Name,
    /// Any email column.
    Email,
    /// Any phone column.
    Phone,
    /// Any salary column.
    Salary,
    /// Department label.
    Department,
}

impl FieldRole {
    /// Classify a column header into its role.
    ///
    /// Returns `None` for headers outside the vocabulary; those columns
    /// are passed through untouched by validation and transformation.
    pub fn of(header: &str) -> Option<Self> {
        let normalized = header.trim().to_lowercase();
        match normalized.as_str() {
            "customerid" | "id" | "employeeid" => Some(Self::Identifier),
            "full name" | "name" | "surname" | "firstname" | "lastname" => Some(Self::Name),
            "email" | "corporateemail" | "personalemail" | "workemail" => Some(Self::Email),
            "phone" | "mobilenumber" => Some(Self::Phone),
            "salary" | "annualsalary" => Some(Self::Salary),
            "department" => Some(Self::Department),
            _ => None,
        }
    }

    /// Display-form column names carrying this role, in priority order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Identifier => IDENTIFIER_COLUMNS,
            Self::Name => &[
                FULL_NAME_COLUMN,
                NAME_COLUMN,
                SURNAME_COLUMN,
                FIRST_NAME_COLUMN,
                LAST_NAME_COLUMN,
            ],
            Self::Email => &[
                EMAIL_COLUMN,
                CORPORATE_EMAIL_COLUMN,
                PERSONAL_EMAIL_COLUMN,
                WORK_EMAIL_COLUMN,
            ],
            Self::Phone => PHONE_COLUMNS,
            Self::Salary => SALARY_COLUMNS,
            Self::Department => &[DEPARTMENT_COLUMN],
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_of_is_case_insensitive() {
        assert_eq!(FieldRole::of("CustomerID"), Some(FieldRole::Identifier));
        assert_eq!(FieldRole::of("customerid"), Some(FieldRole::Identifier));
        assert_eq!(FieldRole::of("CUSTOMERID"), Some(FieldRole::Identifier));
        assert_eq!(FieldRole::of("  Email  "), Some(FieldRole::Email));
    }

    #[test]
    fn test_role_of_covers_every_vocabulary_column() {
        assert_eq!(FieldRole::of("Full Name"), Some(FieldRole::Name));
        assert_eq!(FieldRole::of("Surname"), Some(FieldRole::Name));
        assert_eq!(FieldRole::of("FirstName"), Some(FieldRole::Name));
        assert_eq!(FieldRole::of("LastName"), Some(FieldRole::Name));
        assert_eq!(FieldRole::of("CorporateEmail"), Some(FieldRole::Email));
        assert_eq!(FieldRole::of("PersonalEmail"), Some(FieldRole::Email));
        assert_eq!(FieldRole::of("WorkEmail"), Some(FieldRole::Email));
        assert_eq!(FieldRole::of("MobileNumber"), Some(FieldRole::Phone));
        assert_eq!(FieldRole::of("AnnualSalary"), Some(FieldRole::Salary));
        assert_eq!(FieldRole::of("Department"), Some(FieldRole::Department));
        assert_eq!(FieldRole::of("EmployeeID"), Some(FieldRole::Identifier));
    }

    #[test]
    fn test_unknown_header_has_no_role() {
        assert_eq!(FieldRole::of("FavoriteColor"), None);
        assert_eq!(FieldRole::of(""), None);
    }

    #[test]
    fn test_columns_round_trip_through_of() {
        for role in [
            FieldRole::Identifier,
            FieldRole::Name,
            FieldRole::Email,
            FieldRole::Phone,
            FieldRole::Salary,
            FieldRole::Department,
        ] {
            for column in role.columns() {
                assert_eq!(FieldRole::of(column), Some(role), "column {column}");
            }
        }
    }
}
