//! CLI command implementations for blueprint.
//!
//! Each module corresponds to a subcommand (`blueprint <command>`).

pub mod list;
pub mod render;
pub mod show;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use blueprint_core::{Engine, EngineConfig};

/// Build an engine from the config file at `config_path`, falling back to
/// defaults when it does not exist. `root` overrides the catalog directory.
pub fn build_engine(config_path: &Path, root: Option<&Path>) -> Result<Engine> {
    let mut config = EngineConfig::load_or_default(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    if let Some(root) = root {
        config.content_root = root.to_path_buf();
    }
    tracing::debug!(root = %config.content_root.display(), "using blueprint catalog");
    Ok(Engine::from_config(config))
}

/// Read a JSON data file.
pub fn read_data(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading data file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("parsing data file {} as JSON", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_engine_root_override() {
        let dir = tempfile::tempdir().unwrap();
        let engine = build_engine(&dir.path().join("missing.json"), Some(dir.path())).unwrap();
        assert_eq!(engine.config().content_root, dir.path());
    }

    #[test]
    fn test_build_engine_reads_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blueprint.config.json");
        std::fs::write(&path, r#"{ "content_root": "docs", "default_currency": "EUR" }"#).unwrap();
        let engine = build_engine(&path, None).unwrap();
        assert_eq!(engine.config().content_root, Path::new("docs"));
        assert_eq!(engine.config().default_currency, "EUR");
    }

    #[test]
    fn test_read_data_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        assert!(read_data(&path).is_err());
        std::fs::write(&path, "{ nope").unwrap();
        assert!(read_data(&path).is_err());
        std::fs::write(&path, r#"{ "title": "x" }"#).unwrap();
        assert_eq!(read_data(&path).unwrap()["title"], "x");
    }
}
