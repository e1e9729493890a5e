//! Error types for the customer import pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - file access errors at the parsing edge
//! - [`RegistryError`] - format registry errors
//! - [`EnrichError`] - enrichment lookup errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Row-level problems (bad cells, structure mismatches, rejected rows)
//! are NOT represented here. Those are collected as entries in
//! [`crate::sink::ErrorSink`] so a parse can keep going; the types below
//! cover only failures that abort an operation outright.

use thiserror::Error;

// =============================================================================
// CSV File Errors
// =============================================================================

/// Errors while reading a CSV file from disk.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),
}

// =============================================================================
// Registry Errors
// =============================================================================

/// Errors from the format registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Requested format tag is not registered.
    #[error("Unknown format '{tag}' (supported: {})", .supported.join(", "))]
    UnknownFormat { tag: String, supported: Vec<String> },
}

// =============================================================================
// Enrichment Errors
// =============================================================================

/// Errors from a phone directory lookup.
///
/// The enrichment step treats every variant the same way (the record is
/// tagged and the phone left absent), but implementations can still say
/// what went wrong for logging.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The directory was reached but the lookup itself failed.
    #[error("Phone lookup failed: {0}")]
    Lookup(String),

    /// The directory is not reachable at all.
    #[error("Phone directory unavailable")]
    Unavailable,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV file operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type for enrichment operations.
pub type EnrichResult<T> = Result<T, EnrichError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format_names_supported_tags() {
        let err = RegistryError::UnknownFormat {
            tag: "format-x".into(),
            supported: vec!["format-a".into(), "format-b".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("format-x"));
        assert!(msg.contains("format-a, format-b"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CsvError = io.into();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_enrich_error_messages() {
        assert!(EnrichError::Lookup("timeout".into())
            .to_string()
            .contains("timeout"));
        assert!(EnrichError::Unavailable.to_string().contains("unavailable"));
    }
}
