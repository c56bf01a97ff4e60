//! Content sources: where blueprint metadata, bodies and partials are read from.
//!
//! A source is a key-value view over a catalog of entries. Each entry has a
//! metadata document and, optionally, a body. Absence is reported as
//! `Ok(None)`; only genuine read faults are errors, and the metadata store
//! recovers from those by skipping the entry.
//!
//! Two implementations ship with the crate:
//! - [`fs::FsContentSource`]: a directory of `{entry}.json` + `{entry}.<ext>` files
//! - [`memory::MemorySource`]: an in-process catalog, for embedding and tests

pub mod fs;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;

pub use fs::FsContentSource;
pub use memory::MemorySource;

/// Read access to blueprint definitions.
///
/// Reads are the only suspending operations of the engine; everything after
/// a successful read (validation, rendering) is synchronous.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// All entry keys that have a metadata document, in a stable order.
    async fn list_entries(&self) -> Result<Vec<String>>;

    /// Raw metadata document of `entry`, or `None` when it does not exist.
    async fn read_metadata(&self, entry: &str) -> Result<Option<String>>;

    /// Raw body of `entry`, or `None` when it has no body.
    async fn read_body(&self, entry: &str) -> Result<Option<String>>;

    /// Named partial fragments shipped with the catalog.
    async fn read_partials(&self) -> Result<Vec<(String, String)>> {
        Ok(Vec::new())
    }
}
