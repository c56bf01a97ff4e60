//! Metadata store: the catalog of blueprints read from a [`ContentSource`].
//!
//! Reads go through the [`TemplateCache`]; a type is read from the source at
//! most once until [`MetadataStore::clear`]. Faulty entries (unreadable,
//! malformed JSON, broken invariants) are logged and left out of the catalog.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::TemplateCache;
use crate::error::{BlueprintError, Result};
use crate::metadata::{BlueprintMetadata, Template};
use crate::source::ContentSource;

pub struct MetadataStore {
    source: Arc<dyn ContentSource>,
    cache: TemplateCache,
}

impl MetadataStore {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            cache: TemplateCache::new(),
        }
    }

    pub fn source(&self) -> &Arc<dyn ContentSource> {
        &self.source
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    /// Read every entry of the source into the cache.
    ///
    /// An entry is only cataloged when its declared `type` equals its entry
    /// name, the same rule a cache miss in [`MetadataStore::get_metadata`]
    /// applies, so the catalog looks the same before and after a clear.
    ///
    /// Returns the number of blueprints in the catalog afterwards. Only a
    /// failure to list the source is an error; individual entries that fail
    /// are skipped.
    pub async fn load_all(&self) -> Result<usize> {
        let entries = self.source.list_entries().await?;
        let mut skipped = 0usize;

        for entry in &entries {
            match self.read_entry(entry).await {
                Ok(Some(metadata)) if metadata.template_type != *entry => {
                    warn!(
                        entry = %entry,
                        declared = %metadata.template_type,
                        "blueprint entry declares a different type, skipping"
                    );
                    skipped += 1;
                }
                Ok(Some(metadata)) => {
                    self.cache.insert(Template::new(metadata, entry.clone()));
                }
                Ok(None) => {
                    warn!(entry = %entry, "blueprint metadata disappeared while loading");
                    skipped += 1;
                }
                Err(e) => {
                    warn!(entry = %entry, error = %e, "skipping malformed blueprint");
                    skipped += 1;
                }
            }
        }

        let loaded = self.cache.len();
        info!(loaded, skipped, "blueprint catalog loaded");
        Ok(loaded)
    }

    /// Look up a blueprint by type, reading it from the source on a cache miss.
    ///
    /// Missing, unreadable and malformed entries all yield `None`.
    pub async fn get_metadata(&self, template_type: &str) -> Option<Arc<Template>> {
        if let Some(template) = self.cache.get(template_type) {
            debug!(template_type, "template cache hit");
            return Some(template);
        }
        debug!(template_type, "template cache miss");

        let metadata = match self.read_entry(template_type).await {
            Ok(Some(metadata)) => metadata,
            Ok(None) => return None,
            Err(e) => {
                warn!(template_type, error = %e, "failed to load blueprint");
                return None;
            }
        };

        if metadata.template_type != template_type {
            warn!(
                template_type,
                declared = %metadata.template_type,
                "blueprint entry declares a different type"
            );
            return None;
        }

        Some(self.cache.insert(Template::new(metadata, template_type)))
    }

    /// The template body, read from the source on first use and memoized on
    /// the cached template.
    pub async fn body<'a>(&self, template: &'a Template) -> Result<&'a str> {
        let body = template
            .body
            .get_or_try_init(|| async {
                debug!(entry = %template.entry, "reading template body");
                self.source.read_body(&template.entry).await.and_then(|body| {
                    body.ok_or_else(|| BlueprintError::BodyNotFound(template.template_type().into()))
                })
            })
            .await?;
        Ok(body.as_str())
    }

    /// Partials shipped with the source. A read failure is logged and yields
    /// no partials.
    pub async fn partials(&self) -> Vec<(String, String)> {
        match self.source.read_partials().await {
            Ok(partials) => partials,
            Err(e) => {
                warn!(error = %e, "failed to read partials");
                Vec::new()
            }
        }
    }

    /// Drop every cached blueprint; the next lookup re-reads the source.
    pub fn clear(&self) {
        self.cache.clear();
        debug!("template cache cleared");
    }

    /// Drop the cache and read the whole catalog again.
    pub async fn reload(&self) -> Result<usize> {
        self.clear();
        self.load_all().await
    }

    async fn read_entry(&self, entry: &str) -> Result<Option<BlueprintMetadata>> {
        match self.source.read_metadata(entry).await? {
            Some(contents) => BlueprintMetadata::parse(entry, &contents).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::source::MemorySource;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Wraps a source and counts metadata and body reads.
    pub(crate) struct CountingSource {
        pub inner: MemorySource,
        pub metadata_reads: AtomicUsize,
        pub body_reads: AtomicUsize,
    }

    impl CountingSource {
        pub fn new(inner: MemorySource) -> Self {
            Self {
                inner,
                metadata_reads: AtomicUsize::new(0),
                body_reads: AtomicUsize::new(0),
            }
        }

        pub fn metadata_reads(&self) -> usize {
            self.metadata_reads.load(Ordering::SeqCst)
        }

        pub fn body_reads(&self) -> usize {
            self.body_reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContentSource for CountingSource {
        async fn list_entries(&self) -> Result<Vec<String>> {
            self.inner.list_entries().await
        }

        async fn read_metadata(&self, entry: &str) -> Result<Option<String>> {
            self.metadata_reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read_metadata(entry).await
        }

        async fn read_body(&self, entry: &str) -> Result<Option<String>> {
            self.body_reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read_body(entry).await
        }

        async fn read_partials(&self) -> Result<Vec<(String, String)>> {
            self.inner.read_partials().await
        }
    }

    fn catalog() -> MemorySource {
        MemorySource::new()
            .with_entry(
                "test",
                r#"{ "type": "test", "name": "Test", "variables": [
                    { "name": "title", "type": "string", "required": true }
                ] }"#,
                Some("<h1>{{title}}</h1>"),
            )
            .with_entry("broken", "{ not json", None)
            .with_entry("memo", r#"{ "type": "memo" }"#, None)
    }

    #[tokio::test]
    async fn test_load_all_skips_malformed() {
        let store = MetadataStore::new(Arc::new(catalog()));
        assert_eq!(store.load_all().await.unwrap(), 2);
        assert_eq!(store.cache().types(), vec!["memo", "test"]);
    }

    #[tokio::test]
    async fn test_get_metadata_after_load_all_does_not_reread() {
        let source = Arc::new(CountingSource::new(catalog()));
        let store = MetadataStore::new(source.clone());
        store.load_all().await.unwrap();
        let reads_after_load = source.metadata_reads();

        let a = store.get_metadata("test").await.unwrap();
        let b = store.get_metadata("test").await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(source.metadata_reads(), reads_after_load);
    }

    #[tokio::test]
    async fn test_get_metadata_lazy_miss_reads_once() {
        let source = Arc::new(CountingSource::new(catalog()));
        let store = MetadataStore::new(source.clone());

        let a = store.get_metadata("test").await.unwrap();
        let b = store.get_metadata("test").await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(source.metadata_reads(), 1);
    }

    #[tokio::test]
    async fn test_get_metadata_unknown_and_malformed() {
        let store = MetadataStore::new(Arc::new(catalog()));
        assert!(store.get_metadata("nope").await.is_none());
        assert!(store.get_metadata("broken").await.is_none());
    }

    #[tokio::test]
    async fn test_get_metadata_type_mismatch() {
        let source = MemorySource::new().with_entry("alias", r#"{ "type": "real" }"#, None);
        let store = MetadataStore::new(Arc::new(source));
        assert!(store.get_metadata("alias").await.is_none());
        assert!(store.cache().is_empty());
    }

    #[tokio::test]
    async fn test_clear_forces_reread() {
        let source = Arc::new(CountingSource::new(catalog()));
        let store = MetadataStore::new(source.clone());

        let first = store.get_metadata("test").await.unwrap();
        store.clear();
        let second = store.get_metadata("test").await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(source.metadata_reads(), 2);
    }

    #[tokio::test]
    async fn test_reload_counts_catalog() {
        let store = MetadataStore::new(Arc::new(catalog()));
        store.get_metadata("memo").await.unwrap();
        assert_eq!(store.reload().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_load_all_skips_type_mismatch() {
        let source = MemorySource::new()
            .with_entry("foo", r#"{ "type": "bar" }"#, None)
            .with_entry("memo", r#"{ "type": "memo" }"#, None);
        let store = MetadataStore::new(Arc::new(source));
        assert_eq!(store.load_all().await.unwrap(), 1);
        assert_eq!(store.cache().types(), vec!["memo"]);
        assert!(store.get_metadata("bar").await.is_none());

        store.clear();
        assert!(store.get_metadata("bar").await.is_none());
        assert!(store.get_metadata("memo").await.is_some());
    }

    #[tokio::test]
    async fn test_body_read_once() {
        let source = Arc::new(CountingSource::new(catalog()));
        let store = MetadataStore::new(source.clone());
        let template = store.get_metadata("test").await.unwrap();

        assert_eq!(store.body(&template).await.unwrap(), "<h1>{{title}}</h1>");
        assert_eq!(store.body(&template).await.unwrap(), "<h1>{{title}}</h1>");
        assert_eq!(source.body_reads(), 1);
        assert!(template.cached_body().is_some());
    }

    #[tokio::test]
    async fn test_body_not_found() {
        let store = MetadataStore::new(Arc::new(catalog()));
        let template = store.get_metadata("memo").await.unwrap();
        let err = store.body(&template).await.unwrap_err();
        assert!(matches!(err, BlueprintError::BodyNotFound(t) if t == "memo"));
    }
}
