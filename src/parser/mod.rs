//! Format-aware CSV parsing.
//!
//! One [`FormatParser`] drives the whole per-file pipeline: structure
//! check, line splitting, per-row validate→transform→enrich→validate,
//! and error collection. The parser never raises for bad data; every
//! problem becomes an [`ErrorSink`] entry and processing moves on, so a
//! single bad row never aborts a file.
//!
//! Splitting is plain comma splitting (trim, strip surrounding double
//! quotes): quoted separators and embedded newlines are out of scope
//! for these feeds.

pub mod formats;

use std::panic::AssertUnwindSafe;
use std::path::Path;

use futures::FutureExt;

use crate::error::CsvResult;
use crate::logs::{log_info, log_success_indent, log_warning};
use crate::models::{CustomerRecord, RawRow};
use crate::sink::ErrorSink;
use crate::transform::CustomerTransformer;
use crate::validation::{CustomerValidator, ValidationOutcome};

pub use formats::{format_a, format_b, format_c, FormatSpec};

/// Split one CSV line into cells: comma-separated, trimmed, surrounding
/// double quotes stripped.
pub fn split_line(line: &str) -> Vec<String> {
    line.split(',')
        .map(|cell| cell.trim().trim_matches('"').to_string())
        .collect()
}

fn read_lines(path: &Path) -> CsvResult<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content.lines().map(String::from).collect())
}

/// Zip header names with a line's cells positionally. The shorter side
/// wins: extra cells are ignored, missing cells leave their column
/// absent from the row.
fn zip_row(headers: &[String], line: &str) -> RawRow {
    let mut row = RawRow::new();
    for (column, value) in headers.iter().zip(split_line(line)) {
        row.insert(column.as_str(), value);
    }
    row
}

// =============================================================================
// Format Parser
// =============================================================================

/// A parser bound to one format plus the shared validator/transformer.
///
/// Instances come from [`crate::registry::ParserRegistry`]. The error
/// sink is passed per call, so one sink can collect across several
/// files by handing the same `&mut` borrow to each parse.
#[derive(Clone)]
pub struct FormatParser {
    spec: FormatSpec,
    validator: CustomerValidator,
    transformer: CustomerTransformer,
}

impl FormatParser {
    pub fn new(
        spec: FormatSpec,
        validator: CustomerValidator,
        transformer: CustomerTransformer,
    ) -> Self {
        Self {
            spec,
            validator,
            transformer,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.spec.tag
    }

    pub fn expected_headers(&self) -> &'static [&'static str] {
        self.spec.expected_headers
    }

    /// Whether a parsed header row satisfies this format: every expected
    /// header present, case-insensitive, extra columns tolerated.
    pub fn matches_header(&self, headers: &[String]) -> bool {
        self.spec
            .expected_headers
            .iter()
            .all(|expected| headers.iter().any(|h| h.eq_ignore_ascii_case(expected)))
    }

    /// Probe a file's header row. Unreadable or empty files don't match.
    pub fn matches_file(&self, path: &Path) -> bool {
        match read_lines(path) {
            Ok(lines) => lines
                .first()
                .map(|header| self.matches_header(&split_line(header)))
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Parse a whole file into records.
    ///
    /// Structural failures (unreadable file, header mismatch, too-short
    /// file) record one row-0 parsing entry and return an empty list.
    /// Otherwise every data line is processed independently: rejected
    /// rows record their validation outcome and are absent from the
    /// result, and a panic while processing one row is caught at the
    /// row boundary as an exception entry. Output order is input order.
    pub async fn parse(&self, path: &Path, sink: &mut ErrorSink) -> Vec<CustomerRecord> {
        log_info(format!("Parsing {} as {}", path.display(), self.spec.tag));
        let lines = match read_lines(path) {
            Ok(lines) => lines,
            Err(err) => {
                sink.record_parsing(
                    0,
                    None,
                    format!("{}: {err}", self.spec.tag),
                    None,
                    None,
                );
                log_warning(format!("{}: unreadable file", self.spec.tag));
                return Vec::new();
            }
        };

        let Some(header_line) = lines.first() else {
            sink.record_parsing(
                0,
                None,
                format!("{}: file is empty", self.spec.tag),
                Some(self.spec.expected_headers.join(", ")),
                None,
            );
            return Vec::new();
        };
        let headers = split_line(header_line);
        if !self.matches_header(&headers) {
            sink.record_parsing(
                0,
                None,
                format!("file does not match {} structure", self.spec.tag),
                Some(self.spec.expected_headers.join(", ")),
                Some(headers.join(", ")),
            );
            log_warning(format!("{}: structure check failed", self.spec.tag));
            return Vec::new();
        }
        if lines.len() < 2 {
            sink.record_parsing(
                0,
                None,
                format!(
                    "{}: file too short, expected a header and at least one data row",
                    self.spec.tag
                ),
                None,
                None,
            );
            return Vec::new();
        }

        let errors_before = sink.len();
        let mut records = Vec::new();
        for (index, line) in lines.iter().skip(1).enumerate() {
            // header occupies row 0, first data line is row 1
            let row_number = index + 1;
            if line.trim().is_empty() {
                continue;
            }
            let processed =
                AssertUnwindSafe(self.process_row(&headers, line, row_number, sink))
                    .catch_unwind()
                    .await;
            match processed {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(panic) => {
                    let description = panic_description(panic);
                    sink.record_exception(row_number, &description, "row processing");
                }
            }
        }
        log_success_indent(
            format!(
                "{}: {} records, {} new errors",
                self.spec.tag,
                records.len(),
                sink.len() - errors_before
            ),
            1,
        );
        records
    }

    /// One data line: validate the raw row, then build, enrich and
    /// gate-check the record. Returns `None` for rejected rows, with
    /// their outcome already recorded.
    async fn process_row(
        &self,
        headers: &[String],
        line: &str,
        row_number: usize,
        sink: &mut ErrorSink,
    ) -> Option<CustomerRecord> {
        let row = zip_row(headers, line);

        let mut outcome = ValidationOutcome::new(row_number);
        for (column_index, (column, value)) in row.iter().enumerate() {
            outcome.merge(
                self.validator
                    .validate_cell(value, column, row_number, column_index + 1),
            );
        }
        outcome.merge(self.validator.validate_row(&row, row_number));
        outcome.merge((self.spec.row_check)(&row, row_number));
        if !outcome.is_valid() {
            sink.record_validation(&outcome);
            return None;
        }

        let record = self.transformer.build_record(&row);
        let record = self.transformer.enrich(record).await;
        let outcome = self.validator.validate_record(&record, row_number);
        if !outcome.is_valid() {
            sink.record_validation(&outcome);
            return None;
        }
        Some(record)
    }
}

fn panic_description(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::enrich::{PhoneDirectory, StaticPhoneDirectory};
    use crate::error::EnrichResult;
    use crate::sink::ErrorKind;
    use crate::transform::{DEPARTMENT_KEY, PHONE_SOURCE_EXTERNAL, PHONE_SOURCE_KEY};

    fn parser_for(spec: FormatSpec) -> FormatParser {
        parser_with_directory(spec, Arc::new(StaticPhoneDirectory::empty()))
    }

    fn parser_with_directory(spec: FormatSpec, directory: Arc<dyn PhoneDirectory>) -> FormatParser {
        FormatParser::new(
            spec,
            CustomerValidator::new(),
            CustomerTransformer::new(directory),
        )
    }

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    struct PanickingDirectory;

    #[async_trait]
    impl PhoneDirectory for PanickingDirectory {
        async fn lookup_phone(&self, identifier: &str) -> EnrichResult<Option<String>> {
            panic!("directory blew up for {identifier}");
        }
    }

    #[test]
    fn test_split_line_trims_and_unquotes() {
        assert_eq!(
            split_line(r#"CUST001, "John Doe" ,john@d.co,, 75000"#),
            ["CUST001", "John Doe", "john@d.co", "", "75000"]
        );
    }

    #[test]
    fn test_matches_header_any_order_any_case_extra_columns() {
        let parser = parser_for(format_a());
        let ok = split_line("salary,PHONE,email,full name,CustomerID,Comment");
        assert!(parser.matches_header(&ok));
        let missing = split_line("CustomerID,Name,Email,Phone,Salary");
        assert!(!parser.matches_header(&missing));
    }

    #[tokio::test]
    async fn test_parse_format_a_happy_path() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "a.csv",
            "CustomerID,Full Name,Email,Phone,Salary\n\
             CUST001, John Doe, john.doe@email.com, +1234567890, 75000\n\
             CUST002,jane roe,Jane.Roe@Email.com,+19995550000,50000\n",
        );
        let mut sink = ErrorSink::new();
        let records = parser_for(format_a()).parse(&path, &mut sink).await;

        assert!(sink.is_empty(), "report: {}", sink.report());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identifier, "CUST001");
        assert_eq!(records[0].full_name, "John Doe");
        assert_eq!(records[0].email, "john.doe@email.com");
        assert_eq!(records[0].phone.as_deref(), Some("+1234567890"));
        assert_eq!(records[0].salary, 75000.0);
        assert_eq!(records[1].full_name, "Jane Roe");
    }

    #[tokio::test]
    async fn test_parse_keeps_order_and_drops_bad_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "a.csv",
            "CustomerID,Full Name,Email,Phone,Salary\n\
             CUST001,John Doe,john@d.co,+1234567890,75000\n\
             CUST002,,bad-email,+1234567890,75000\n\
             CUST003,Ana Lima,ana@l.co,+5511987654321,60000\n",
        );
        let mut sink = ErrorSink::new();
        let records = parser_for(format_a()).parse(&path, &mut sink).await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identifier, "CUST001");
        assert_eq!(records[1].identifier, "CUST003");
        assert!(sink.has_errors());
        assert!(!sink.entries_for_row(2).is_empty());
        assert!(sink
            .entries()
            .iter()
            .all(|e| e.kind == ErrorKind::Validation && e.row == 2));
    }

    #[tokio::test]
    async fn test_structure_mismatch_rejects_file_outright() {
        let dir = TempDir::new().unwrap();
        // "Full Name" missing, stray "Name" instead
        let path = write_file(
            &dir,
            "bad.csv",
            "CustomerID,Name,Email,Phone,Salary\nCUST001,John Doe,john@d.co,+123,75000\n",
        );
        let mut sink = ErrorSink::new();
        let records = parser_for(format_a()).parse(&path, &mut sink).await;

        assert!(records.is_empty());
        assert_eq!(sink.len(), 1);
        let entry = &sink.entries()[0];
        assert_eq!(entry.kind, ErrorKind::Parsing);
        assert_eq!(entry.row, 0);
        assert!(entry.message.contains("format-a"));
        assert!(entry.expected.as_deref().unwrap().contains("Full Name"));
        assert!(entry.actual.as_deref().unwrap().contains("Name"));
    }

    #[tokio::test]
    async fn test_header_only_file_is_too_short() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "short.csv", "CustomerID,Full Name,Email,Phone,Salary\n");
        let mut sink = ErrorSink::new();
        let records = parser_for(format_a()).parse(&path, &mut sink).await;

        assert!(records.is_empty());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.entries()[0].row, 0);
        assert!(sink.entries()[0].message.contains("file too short"));
    }

    #[tokio::test]
    async fn test_unreadable_file_records_parsing_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.csv");
        let mut sink = ErrorSink::new();
        let records = parser_for(format_a()).parse(&path, &mut sink).await;

        assert!(records.is_empty());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.entries()[0].kind, ErrorKind::Parsing);
        assert_eq!(sink.entries()[0].row, 0);
    }

    #[tokio::test]
    async fn test_parse_accepts_shuffled_quoted_header() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "shuffled.csv",
            "\"EMAIL\", phone ,FULL NAME,customerid,Salary,Extra\n\
             j@d.co,+1234567890,John Doe,CUST001,75000,ignored\n",
        );
        let mut sink = ErrorSink::new();
        let records = parser_for(format_a()).parse(&path, &mut sink).await;

        assert!(sink.is_empty(), "report: {}", sink.report());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identifier, "CUST001");
        assert_eq!(records[0].email, "j@d.co");
    }

    #[tokio::test]
    async fn test_format_b_rejects_blank_personal_email() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "b.csv",
            "ID,Name,Surname,CorporateEmail,PersonalEmail,Salary\n\
             EMP001, Alice, Brown, alice.brown@company.com, , 90000\n",
        );
        let mut sink = ErrorSink::new();
        let records = parser_for(format_b()).parse(&path, &mut sink).await;

        assert!(records.is_empty());
        assert_eq!(sink.len(), 1);
        let entry = &sink.entries()[0];
        assert_eq!(entry.kind, ErrorKind::Validation);
        assert_eq!(entry.row, 1);
        assert!(entry.message.contains("both required"));
    }

    #[tokio::test]
    async fn test_format_b_happy_path_sets_secondary_email() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "b.csv",
            "ID,Name,Surname,CorporateEmail,PersonalEmail,Salary\n\
             EMP001,alice,brown,Alice.Brown@Company.com,alice@home.net,90000\n",
        );
        let mut sink = ErrorSink::new();
        let records = parser_for(format_b()).parse(&path, &mut sink).await;

        assert!(sink.is_empty(), "report: {}", sink.report());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_name, "Alice Brown");
        assert_eq!(records[0].email, "alice.brown@company.com");
        assert_eq!(records[0].secondary_email.as_deref(), Some("alice@home.net"));
    }

    #[tokio::test]
    async fn test_format_c_enriches_missing_phone() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "c.csv",
            "EmployeeID,FirstName,LastName,WorkEmail,Phone,Salary,Department\n\
             EMP100,maria,garcia,maria@work.org,,64000,Engineering\n\
             EMP101,li,wei,li@work.org,+8613912345678,71000,Research\n",
        );
        let directory = StaticPhoneDirectory::empty().with_number("EMP100", "+34600111222");
        let mut sink = ErrorSink::new();
        let records = parser_with_directory(format_c(), Arc::new(directory))
            .parse(&path, &mut sink)
            .await;

        assert!(sink.is_empty(), "report: {}", sink.report());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].phone.as_deref(), Some("+34600111222"));
        assert_eq!(records[0].metadata[PHONE_SOURCE_KEY], PHONE_SOURCE_EXTERNAL);
        assert_eq!(records[0].metadata[DEPARTMENT_KEY], "Engineering");
        assert_eq!(records[1].phone.as_deref(), Some("+8613912345678"));
        assert!(!records[1].metadata.contains_key(PHONE_SOURCE_KEY));
    }

    #[tokio::test]
    async fn test_row_panic_is_contained_to_that_row() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "c.csv",
            "EmployeeID,FirstName,LastName,WorkEmail,Phone,Salary,Department\n\
             EMP100,maria,garcia,maria@work.org,,64000,Engineering\n\
             EMP101,li,wei,li@work.org,+8613912345678,71000,Research\n",
        );
        let mut sink = ErrorSink::new();
        let records = parser_with_directory(format_c(), Arc::new(PanickingDirectory))
            .parse(&path, &mut sink)
            .await;

        // row 1 needed enrichment and blew up; row 2 had a phone already
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identifier, "EMP101");
        assert_eq!(sink.len(), 1);
        let entry = &sink.entries()[0];
        assert_eq!(entry.kind, ErrorKind::Exception);
        assert_eq!(entry.row, 1);
        assert!(entry.message.contains("row processing"));
        assert!(entry.message.contains("directory blew up"));
    }

    #[tokio::test]
    async fn test_shared_sink_collects_across_files() {
        let dir = TempDir::new().unwrap();
        let good = write_file(
            &dir,
            "good.csv",
            "CustomerID,Full Name,Email,Phone,Salary\nCUST001,John Doe,j@d.co,+1234,75000\n",
        );
        let bad = write_file(&dir, "bad.csv", "CustomerID,Name\nCUST001,John\n");
        let parser = parser_for(format_a());
        let mut sink = ErrorSink::new();
        parser.parse(&good, &mut sink).await;
        parser.parse(&bad, &mut sink).await;

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.entries()[0].kind, ErrorKind::Parsing);
    }

    #[test]
    fn test_matches_file_probe() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "probe.csv",
            "ID,Name,Surname,CorporateEmail,PersonalEmail,Salary\n",
        );
        assert!(parser_for(format_b()).matches_file(&path));
        assert!(!parser_for(format_a()).matches_file(&path));
        assert!(!parser_for(format_a()).matches_file(&dir.path().join("absent.csv")));
    }

    #[tokio::test]
    async fn test_blank_lines_are_skipped_but_keep_numbering() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "gaps.csv",
            "CustomerID,Full Name,Email,Phone,Salary\n\
             CUST001,John Doe,j@d.co,+1234,75000\n\
             \n\
             CUST003,,bad,=,75000\n",
        );
        let mut sink = ErrorSink::new();
        let records = parser_for(format_a()).parse(&path, &mut sink).await;

        assert_eq!(records.len(), 1);
        // the bad line is physical row 3: header 0, data 1, blank 2
        assert!(sink.entries().iter().all(|e| e.row == 3));
        assert!(sink.has_errors());
    }
}
