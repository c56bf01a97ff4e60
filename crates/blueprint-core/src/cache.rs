//! Process-lifetime memo of parsed blueprints, keyed by template type.
//!
//! Entries never expire. [`TemplateCache::clear`] is the only way to drop them.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::metadata::Template;

/// Type → template map behind a reader-writer lock.
///
/// Once a type is cached, every lookup returns the same `Arc` until the
/// cache is cleared.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: RwLock<HashMap<String, Arc<Template>>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, template_type: &str) -> Option<Arc<Template>> {
        self.entries.read().get(template_type).cloned()
    }

    /// Insert `template` unless its type is already cached, and return the
    /// cached instance. The first writer wins so concurrent misses for the
    /// same type agree on one instance.
    pub fn insert(&self, template: Template) -> Arc<Template> {
        let mut entries = self.entries.write();
        entries
            .entry(template.template_type().to_string())
            .or_insert_with(|| Arc::new(template))
            .clone()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Cached types, sorted.
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.entries.read().keys().cloned().collect();
        types.sort();
        types
    }
}
