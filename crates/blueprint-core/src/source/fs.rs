//! Filesystem content source.
//!
//! ## Directory layout
//!
//! ```text
//! <content_root>/
//! ├── invoice.json          # metadata, entry "invoice"
//! ├── invoice.hbs           # body (first existing extension wins)
//! ├── memo.json
//! ├── memo.md
//! └── partials/
//!     └── header.hbs        # partial "header"
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::ContentSource;
use crate::config::EngineConfig;
use crate::error::Result;

const METADATA_EXTENSION: &str = "json";
const PARTIAL_EXTENSION: &str = "hbs";

/// Reads blueprints from a directory tree.
#[derive(Debug, Clone)]
pub struct FsContentSource {
    root: PathBuf,
    body_extensions: Vec<String>,
    partials_dir: String,
}

impl FsContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let defaults = EngineConfig::default();
        Self {
            root: root.into(),
            body_extensions: defaults.body_extensions,
            partials_dir: defaults.partials_dir,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            root: config.content_root.clone(),
            body_extensions: config.body_extensions.clone(),
            partials_dir: config.partials_dir.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the first body file that exists for `entry`.
    pub async fn locate_body(&self, entry: &str) -> Option<PathBuf> {
        for ext in &self.body_extensions {
            let path = self.root.join(format!("{entry}.{ext}"));
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Some(path);
            }
        }
        None
    }
}

/// Read a file, mapping "not found" to `None`.
async fn read_optional(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// File stems of `dir` entries with extension `ext`, sorted.
async fn stems_with_extension(dir: &Path, ext: &str) -> Result<Vec<String>> {
    let mut read_dir = match tokio::fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut stems = Vec::new();
    while let Some(item) = read_dir.next_entry().await? {
        let path = item.path();
        if !item.file_type().await?.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(ext) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.push(stem.to_string());
        }
    }
    stems.sort();
    Ok(stems)
}

#[async_trait]
impl ContentSource for FsContentSource {
    async fn list_entries(&self) -> Result<Vec<String>> {
        let entries = stems_with_extension(&self.root, METADATA_EXTENSION).await?;
        debug!(root = %self.root.display(), count = entries.len(), "listed blueprint entries");
        Ok(entries)
    }

    async fn read_metadata(&self, entry: &str) -> Result<Option<String>> {
        read_optional(&self.root.join(format!("{entry}.{METADATA_EXTENSION}"))).await
    }

    async fn read_body(&self, entry: &str) -> Result<Option<String>> {
        match self.locate_body(entry).await {
            Some(path) => read_optional(&path).await,
            None => Ok(None),
        }
    }

    async fn read_partials(&self) -> Result<Vec<(String, String)>> {
        let dir = self.root.join(&self.partials_dir);
        let mut partials = Vec::new();
        for name in stems_with_extension(&dir, PARTIAL_EXTENSION).await? {
            let path = dir.join(format!("{name}.{PARTIAL_EXTENSION}"));
            if let Some(body) = read_optional(&path).await? {
                partials.push((name, body));
            }
        }
        Ok(partials)
    }
}
