//! Format registry: tag → ready-to-use parser.
//!
//! The registry owns the shared validator and transformer and hands out
//! [`FormatParser`] instances bound to them. Formats are plain
//! [`FormatSpec`] values, so new ones can be registered at runtime
//! without touching the built-ins.

use std::path::Path;
use std::sync::Arc;

use crate::enrich::PhoneDirectory;
use crate::error::{RegistryError, RegistryResult};
use crate::parser::{format_a, format_b, format_c, FormatParser, FormatSpec};
use crate::transform::CustomerTransformer;
use crate::validation::CustomerValidator;

/// Registry of supported CSV formats, in registration order.
pub struct ParserRegistry {
    validator: CustomerValidator,
    transformer: CustomerTransformer,
    specs: Vec<FormatSpec>,
}

impl ParserRegistry {
    /// A registry with the three built-in formats, enriching through the
    /// given directory.
    pub fn new(directory: Arc<dyn PhoneDirectory>) -> Self {
        let mut registry = Self::with_no_formats(directory);
        registry.register(format_a());
        registry.register(format_b());
        registry.register(format_c());
        registry
    }

    /// An empty registry; useful when only custom formats apply.
    pub fn with_no_formats(directory: Arc<dyn PhoneDirectory>) -> Self {
        Self {
            validator: CustomerValidator::new(),
            transformer: CustomerTransformer::new(directory),
            specs: Vec::new(),
        }
    }

    /// Add a format. A spec whose tag is already registered (tag match is
    /// case-insensitive) replaces the old binding in place; otherwise it
    /// is appended.
    pub fn register(&mut self, spec: FormatSpec) {
        match self
            .specs
            .iter_mut()
            .find(|existing| existing.tag.eq_ignore_ascii_case(spec.tag))
        {
            Some(existing) => *existing = spec,
            None => self.specs.push(spec),
        }
    }

    /// Build a parser for a tag.
    pub fn create(&self, tag: &str) -> RegistryResult<FormatParser> {
        self.specs
            .iter()
            .find(|spec| spec.tag.eq_ignore_ascii_case(tag))
            .map(|spec| self.parser_for(*spec))
            .ok_or_else(|| RegistryError::UnknownFormat {
                tag: tag.to_string(),
                supported: self
                    .supported_formats()
                    .iter()
                    .map(|tag| tag.to_string())
                    .collect(),
            })
    }

    /// Registered tags, in registration order.
    pub fn supported_formats(&self) -> Vec<&'static str> {
        self.specs.iter().map(|spec| spec.tag).collect()
    }

    pub fn supports(&self, tag: &str) -> bool {
        self.specs
            .iter()
            .any(|spec| spec.tag.eq_ignore_ascii_case(tag))
    }

    /// Probe a file's header against every registered format, in
    /// registration order, and return a parser for the first match.
    pub fn detect(&self, path: &Path) -> Option<FormatParser> {
        self.specs
            .iter()
            .map(|spec| self.parser_for(*spec))
            .find(|parser| parser.matches_file(path))
    }

    fn parser_for(&self, spec: FormatSpec) -> FormatParser {
        FormatParser::new(spec, self.validator, self.transformer.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::StaticPhoneDirectory;
    use crate::models::RawRow;
    use crate::validation::ValidationOutcome;

    fn registry() -> ParserRegistry {
        ParserRegistry::new(Arc::new(StaticPhoneDirectory::empty()))
    }

    fn no_extra_checks(_row: &RawRow, row_number: usize) -> ValidationOutcome {
        ValidationOutcome::new(row_number)
    }

    #[test]
    fn test_built_ins_in_registration_order() {
        let registry = registry();
        assert_eq!(
            registry.supported_formats(),
            ["format-a", "format-b", "format-c"]
        );
        assert!(registry.supports("format-b"));
        assert!(registry.supports("FORMAT-B"));
        assert!(!registry.supports("format-x"));
    }

    #[test]
    fn test_create_is_case_insensitive() {
        let registry = registry();
        assert_eq!(registry.create("format-c").unwrap().tag(), "format-c");
        assert_eq!(registry.create("Format-A").unwrap().tag(), "format-a");
    }

    #[test]
    fn test_create_unknown_tag_names_supported_set() {
        let err = registry().create("format-x").err().expect("unknown tag must error");
        let message = err.to_string();
        assert!(message.contains("format-x"));
        assert!(message.contains("format-a, format-b, format-c"));
    }

    #[test]
    fn test_register_appends_new_format() {
        let mut registry = registry();
        registry.register(FormatSpec {
            tag: "format-d",
            expected_headers: &["CustomerID", "Email", "Salary"],
            row_check: no_extra_checks,
        });
        assert!(registry.supports("format-d"));
        assert_eq!(registry.supported_formats().len(), 4);
        assert_eq!(registry.create("format-d").unwrap().tag(), "format-d");
    }

    #[test]
    fn test_register_replaces_same_tag_in_place() {
        let mut registry = registry();
        registry.register(FormatSpec {
            tag: "format-b",
            expected_headers: &["ID", "Email"],
            row_check: no_extra_checks,
        });
        assert_eq!(
            registry.supported_formats(),
            ["format-a", "format-b", "format-c"]
        );
        assert_eq!(
            registry.create("format-b").unwrap().expected_headers(),
            ["ID", "Email"]
        );
    }

    #[test]
    fn test_empty_registry_supports_nothing() {
        let registry = ParserRegistry::with_no_formats(Arc::new(StaticPhoneDirectory::empty()));
        assert!(registry.supported_formats().is_empty());
        assert!(registry.create("format-a").is_err());
    }

    #[test]
    fn test_detect_probes_in_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("b.csv");
        std::fs::write(&path, "ID,Name,Surname,CorporateEmail,PersonalEmail,Salary\n").unwrap();
        let detected = registry().detect(&path).unwrap();
        assert_eq!(detected.tag(), "format-b");

        let other = dir.path().join("none.csv");
        std::fs::write(&other, "Just,Some,Columns\n").unwrap();
        assert!(registry().detect(&other).is_none());
    }
}
