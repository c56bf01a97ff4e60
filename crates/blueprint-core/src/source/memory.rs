//! In-process content source.
//!
//! Useful for blueprints compiled into a binary with [`include_str!`]:
//!
//! ```ignore
//! let source = MemorySource::new()
//!     .with_entry("invoice", include_str!("invoice.json"), Some(include_str!("invoice.hbs")))
//!     .with_partial("header", include_str!("header.hbs"));
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::ContentSource;
use crate::error::Result;

#[derive(Debug, Clone)]
struct MemoryEntry {
    metadata: String,
    body: Option<String>,
}

/// A fixed catalog of blueprint documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: BTreeMap<String, MemoryEntry>,
    partials: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(
        mut self,
        entry: impl Into<String>,
        metadata: impl Into<String>,
        body: Option<&str>,
    ) -> Self {
        self.entries.insert(
            entry.into(),
            MemoryEntry {
                metadata: metadata.into(),
                body: body.map(str::to_string),
            },
        );
        self
    }

    pub fn with_partial(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.partials.insert(name.into(), body.into());
        self
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn list_entries(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    async fn read_metadata(&self, entry: &str) -> Result<Option<String>> {
        Ok(self.entries.get(entry).map(|e| e.metadata.clone()))
    }

    async fn read_body(&self, entry: &str) -> Result<Option<String>> {
        Ok(self.entries.get(entry).and_then(|e| e.body.clone()))
    }

    async fn read_partials(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .partials
            .iter()
            .map(|(name, body)| (name.clone(), body.clone()))
            .collect())
    }
}
