//! Unified error types for the blueprint engine.
//!
//! Schema violations and helper faults are not errors: validation returns a
//! [`crate::validation::ValidationResult`] and helpers degrade to an empty
//! string. This enum covers configuration, content-source and template
//! authoring faults only.

use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur during blueprint operations.
#[derive(Error, Debug)]
pub enum BlueprintError {
    // --- Configuration ---

    /// The configuration file (`blueprint.config.json`) was not found.
    #[error("config file not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file exists but contains invalid JSON.
    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // --- Metadata ---

    /// A blueprint metadata document is not valid JSON or misses the `type` key.
    #[error("failed to parse blueprint metadata '{entry}'")]
    MetadataParse {
        entry: String,
        #[source]
        source: serde_json::Error,
    },

    /// A blueprint metadata document parsed but breaks a schema invariant.
    #[error("invalid blueprint metadata '{entry}': {reason}")]
    InvalidMetadata { entry: String, reason: String },

    /// The blueprint exists but no body file was found next to its metadata.
    #[error("no template body found for blueprint type '{0}'")]
    BodyNotFound(String),

    // --- Templates ---

    /// Registering the partial would make it include itself.
    #[error("partial '{name}' would include itself: {}", .chain.join(" -> "))]
    PartialCycle { name: String, chain: Vec<String> },

    /// A template or partial body does not compile.
    #[error("template syntax error: {0}")]
    TemplateSyntax(String),

    /// Handlebars rendering failed (unknown helper, malformed block).
    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    // --- General ---

    /// A filesystem I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Alias for `Result<T, BlueprintError>`.
pub type Result<T> = std::result::Result<T, BlueprintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_cycle_message_shows_chain() {
        let err = BlueprintError::PartialCycle {
            name: "a".into(),
            chain: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "partial 'a' would include itself: a -> b -> a");
    }

    #[test]
    fn test_io_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: BlueprintError = io.into();
        assert_eq!(err.to_string(), "denied");
    }
}
