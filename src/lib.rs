//! # Custload - heterogeneous customer CSV import
//!
//! Custload parses customer CSV files in several fixed layouts (formats
//! A, B and C) into one normalized record type, collecting every data
//! problem in a queryable error sink instead of aborting.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐    ┌───────────────┐    ┌───────────────────────────────┐
//! │ CSV file │───▶│ FormatParser  │───▶│ validate ▶ transform ▶ enrich │──▶ Records
//! └──────────┘    │ (per format)  │    │          ▶ validate           │
//!                 └───────┬───────┘    └───────────────┬───────────────┘
//!                         │ structure errors           │ row errors
//!                         ▼                            ▼
//!                    ┌─────────────────────────────────────┐
//!                    │              ErrorSink              │
//!                    └─────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use custload::{ErrorSink, ParserRegistry, StaticPhoneDirectory};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = ParserRegistry::new(Arc::new(StaticPhoneDirectory::empty()));
//!     let parser = registry.create("format-a").unwrap();
//!     let mut sink = ErrorSink::new();
//!     let records = parser.parse("customers.csv".as_ref(), &mut sink).await;
//!     println!("{} records parsed", records.len());
//!     println!("{}", sink.report());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`fields`] - Column vocabulary and semantic roles
//! - [`models`] - Domain models (CustomerRecord, RawRow)
//! - [`validation`] - Cell/row/record validation layers
//! - [`sink`] - Structured error collection and reporting
//! - [`transform`] - Cell normalization, record building, enrichment
//! - [`parser`] - Format specs and the per-file pipeline
//! - [`registry`] - Tag → parser selection
//! - [`enrich`] - External phone-directory port
//! - [`logs`] - Progress log broadcasting

// Core modules
pub mod error;
pub mod fields;
pub mod models;

// Validation and error collection
pub mod sink;
pub mod validation;

// Transformation and enrichment
pub mod enrich;
pub mod transform;

// Parsing
pub mod parser;
pub mod registry;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, CsvResult, EnrichError, EnrichResult, RegistryError, RegistryResult};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use fields::FieldRole;
pub use models::{CustomerRecord, RawRow};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{CustomerValidator, ValidationOutcome};

// =============================================================================
// Re-exports - Error Sink
// =============================================================================

pub use sink::{ErrorEntry, ErrorKind, ErrorSink, NO_ERRORS_REPORT};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    CustomerTransformer, COLUMNS_KEY, DEPARTMENT_KEY, PHONE_SOURCE_EXTERNAL, PHONE_SOURCE_KEY,
    PHONE_SOURCE_UNAVAILABLE,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{format_a, format_b, format_c, split_line, FormatParser, FormatSpec};

// =============================================================================
// Re-exports - Registry
// =============================================================================

pub use registry::ParserRegistry;

// =============================================================================
// Re-exports - Enrichment
// =============================================================================

pub use enrich::{PhoneDirectory, StaticPhoneDirectory};

// =============================================================================
// Re-exports - Logs
// =============================================================================

pub use logs::{
    log_error, log_info, log_info_indent, log_success, log_success_indent, log_warning,
    LogBroadcaster, LogEntry, LogLevel, LOG_BROADCASTER,
};
