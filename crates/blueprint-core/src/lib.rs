//! Core library for blueprint: reusable document templates rendered from
//! caller-supplied data.
//!
//! A blueprint is a metadata document (a typed variable schema plus
//! descriptive fields) and a Handlebars body. The [`engine::Engine`] ties the
//! pieces together:
//!
//! - [`source`] — where definitions are read from (filesystem or memory)
//! - [`store`] / [`cache`] — the catalog, memoized per template type
//! - [`validation`] — schema checks reporting every violation at once
//! - [`helpers`] / [`partials`] — the vocabulary available to bodies
//! - [`render`] — Handlebars rendering with that vocabulary
//!
//! Reading definitions is the only asynchronous step; validation and
//! rendering are synchronous.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod helpers;
pub mod metadata;
pub mod partials;
pub mod render;
pub mod source;
pub mod store;
pub mod validation;
pub mod value;

pub use config::EngineConfig;
pub use engine::{Engine, RenderOutcome};
pub use error::{BlueprintError, Result};
pub use helpers::Helper;
pub use metadata::{BlueprintMetadata, Template, VariableSpec, VariableType};
pub use validation::ValidationResult;
