//! External phone enrichment.
//!
//! The pipeline only needs one operation from the outside world: given a
//! customer identifier, asynchronously return an optional phone number.
//! [`PhoneDirectory`] is that port; the pipeline treats every failure
//! uniformly (the record is tagged and the phone left absent), so
//! implementations are free to fail however they like.
//!
//! No real network client lives here. [`StaticPhoneDirectory`] backs the
//! demo binary and the tests; an embedding application provides its own
//! implementation for production use.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::EnrichResult;

/// Port for the external "phone by identifier" lookup.
#[async_trait]
pub trait PhoneDirectory: Send + Sync {
    /// Look up a phone number. `Ok(None)` means the directory answered
    /// but knows no number for this identifier.
    async fn lookup_phone(&self, identifier: &str) -> EnrichResult<Option<String>>;
}

/// In-memory directory used by the demo and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPhoneDirectory {
    numbers: HashMap<String, String>,
}

impl StaticPhoneDirectory {
    /// A directory that knows no numbers at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add one identifier→phone binding.
    pub fn with_number(mut self, identifier: impl Into<String>, phone: impl Into<String>) -> Self {
        self.numbers.insert(identifier.into(), phone.into());
        self
    }
}

#[async_trait]
impl PhoneDirectory for StaticPhoneDirectory {
    async fn lookup_phone(&self, identifier: &str) -> EnrichResult<Option<String>> {
        Ok(self.numbers.get(identifier).cloned())
    }
}
