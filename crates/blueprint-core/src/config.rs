//! Engine configuration and its JSON persistence.
//!
//! Loaded from `blueprint.config.json`. Every field has a default so a partial
//! file (or no file at all, see [`EngineConfig::default`]) is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BlueprintError, Result};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "blueprint.config.json";

/// Settings shared by the metadata store, the content source and the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding `{type}.json` metadata and `{type}.<ext>` bodies.
    pub content_root: PathBuf,
    /// Body file extensions, tried in order.
    pub body_extensions: Vec<String>,
    /// Sub-directory of `content_root` whose `*.hbs` files become partials.
    pub partials_dir: String,
    /// HTML-escape `{{placeholder}}` output. Off for plain-text documents.
    pub escape_html: bool,
    /// Currency code used by the `currency` helper when none is given.
    pub default_currency: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("templates"),
            body_extensions: vec!["hbs".into(), "html".into(), "md".into(), "txt".into()],
            partials_dir: "partials".into(),
            escape_html: false,
            default_currency: "USD".into(),
        }
    }
}

impl EngineConfig {
    /// Load the configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| BlueprintError::ConfigNotFound {
                path: path.to_path_buf(),
                source: e,
            })?;
        serde_json::from_str(&contents).map_err(|e| BlueprintError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| BlueprintError::ConfigParse {
                path: path.to_path_buf(),
                source: e,
            })?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let config = EngineConfig {
            content_root: PathBuf::from("blueprints"),
            escape_html: true,
            default_currency: "EUR".into(),
            ..EngineConfig::default()
        };
        config.save(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "content_root": "docs" }"#).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded.content_root, PathBuf::from("docs"));
        assert_eq!(loaded.default_currency, "USD");
        assert_eq!(loaded.body_extensions[0], "hbs");
        assert!(!loaded.escape_html);
    }

    #[test]
    fn test_load_nonexistent() {
        let result = EngineConfig::load(Path::new("/tmp/nonexistent_blueprint_config.json"));
        assert!(matches!(result, Err(BlueprintError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            EngineConfig::load(&path),
            Err(BlueprintError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = EngineConfig::load_or_default(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(loaded, EngineConfig::default());
    }
}
