//! Blueprint metadata: the variable schema and descriptive fields read from
//! a `{type}.json` definition.
//!
//! ```json
//! {
//!   "name": "Invoice",
//!   "type": "invoice",
//!   "version": "1.0.0",
//!   "variables": [
//!     { "name": "customer", "type": "string", "required": true },
//!     { "name": "due", "type": "date", "required": false, "default": "2024-01-31" }
//!   ],
//!   "sections": ["header", "lines", "footer"]
//! }
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::error::{BlueprintError, Result};

/// Declared type of a blueprint variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    String,
    Number,
    Boolean,
    Array,
    /// A date value, or a string/number convertible to one.
    Date,
}

impl VariableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared input slot of a blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
    /// Filled into the render context when the variable is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Descriptive fields plus the ordered variable schema of one blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Lookup key of the blueprint.
    #[serde(rename = "type")]
    pub template_type: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub variables: Vec<VariableSpec>,
    /// Structural hints for callers; not enforced.
    #[serde(default)]
    pub sections: Vec<String>,
}

impl BlueprintMetadata {
    /// Parse a metadata document read from content-source entry `entry`.
    pub fn parse(entry: &str, contents: &str) -> Result<Self> {
        let metadata: Self =
            serde_json::from_str(contents).map_err(|e| BlueprintError::MetadataParse {
                entry: entry.to_string(),
                source: e,
            })?;
        metadata.check(entry)?;
        Ok(metadata)
    }

    fn check(&self, entry: &str) -> Result<()> {
        if self.template_type.trim().is_empty() {
            return Err(BlueprintError::InvalidMetadata {
                entry: entry.to_string(),
                reason: "empty `type`".into(),
            });
        }
        let mut seen = HashSet::new();
        for var in &self.variables {
            if !seen.insert(var.name.as_str()) {
                return Err(BlueprintError::InvalidMetadata {
                    entry: entry.to_string(),
                    reason: format!("duplicate variable `{}`", var.name),
                });
            }
        }
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Option<&VariableSpec> {
        self.variables.iter().find(|v| v.name == name)
    }
}

/// A cached blueprint: its metadata and a handle to its body.
///
/// Shared as `Arc<Template>`; the body is read at most once, on first render.
#[derive(Debug)]
pub struct Template {
    pub metadata: BlueprintMetadata,
    /// Content-source entry the metadata was read from; locates the body.
    pub entry: String,
    pub(crate) body: OnceCell<String>,
}

impl Template {
    pub fn new(metadata: BlueprintMetadata, entry: impl Into<String>) -> Self {
        Self {
            metadata,
            entry: entry.into(),
            body: OnceCell::new(),
        }
    }

    pub fn template_type(&self) -> &str {
        &self.metadata.template_type
    }

    /// The body, if it has already been read.
    pub fn cached_body(&self) -> Option<&str> {
        self.body.get().map(String::as_str)
    }
}
