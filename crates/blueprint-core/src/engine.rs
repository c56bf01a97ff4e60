//! The engine: one instance owning the catalog, the cache and the render
//! vocabulary.
//!
//! Construct it once, register helpers and partials, then render many times.
//! `Engine` is `Send + Sync`; share it with `Arc` across tasks.
//!
//! ```ignore
//! let engine = Engine::from_config(EngineConfig::default());
//! engine.load_all().await?;
//! engine.register_helper("uppercase", |args: &[Value]| {
//!     args.first().map(value::to_display).unwrap_or_default().to_uppercase()
//! });
//!
//! match engine.render_template("invoice", &data).await? {
//!     RenderOutcome::Rendered { content } => println!("{content}"),
//!     RenderOutcome::Invalid(result) => eprintln!("{:?}", result.errors),
//! }
//! ```

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::helpers::Helper;
use crate::metadata::{BlueprintMetadata, Template};
use crate::render::Renderer;
use crate::source::{ContentSource, FsContentSource};
use crate::store::MetadataStore;
use crate::validation::{self, ValidationResult};

/// Result of [`Engine::render_template`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered { content: String },
    /// The data did not satisfy the schema (or the type is unknown); nothing
    /// was rendered.
    Invalid(ValidationResult),
}

impl RenderOutcome {
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Rendered { content } => Some(content),
            Self::Invalid(_) => None,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }
}

pub struct Engine {
    config: EngineConfig,
    store: MetadataStore,
    renderer: Renderer,
    /// Partials registered from the source by the last `load_all`.
    source_partials: Mutex<BTreeSet<String>>,
}

impl Engine {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self::with_config(source, EngineConfig::default())
    }

    pub fn with_config(source: Arc<dyn ContentSource>, config: EngineConfig) -> Self {
        let renderer = Renderer::new(&config);
        Self {
            config,
            store: MetadataStore::new(source),
            renderer,
            source_partials: Mutex::new(BTreeSet::new()),
        }
    }

    /// An engine reading from the filesystem tree at `config.content_root`.
    pub fn from_config(config: EngineConfig) -> Self {
        let source = Arc::new(FsContentSource::from_config(&config));
        Self::with_config(source, config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    // --- Catalog ---

    /// Read the whole catalog and the partials shipped with it.
    ///
    /// Returns the number of blueprints loaded. Malformed blueprints and
    /// partials are skipped with a warning. Partials an earlier `load_all`
    /// took from the source and the source no longer provides are removed;
    /// partials registered through [`Engine::register_partial`] are kept.
    pub async fn load_all(&self) -> Result<usize> {
        let loaded = self.store.load_all().await?;

        let mut registered = BTreeSet::new();
        for (name, body) in self.store.partials().await {
            match self.renderer.register_partial(&name, &body) {
                Ok(()) => {
                    registered.insert(name);
                }
                Err(e) => warn!(partial = %name, error = %e, "skipping partial"),
            }
        }

        let previous = std::mem::replace(&mut *self.source_partials.lock(), registered.clone());
        for stale in previous.difference(&registered) {
            self.renderer.unregister_partial(stale);
        }
        Ok(loaded)
    }

    /// Purge the cache and read the catalog and its partials again.
    pub async fn reload(&self) -> Result<usize> {
        self.store.clear();
        self.load_all().await
    }

    /// Purge the cache; the next lookup of each type re-reads the source.
    pub fn clear_cache(&self) {
        self.store.clear();
    }

    pub async fn get_metadata(&self, template_type: &str) -> Option<Arc<Template>> {
        self.store.get_metadata(template_type).await
    }

    /// Types currently in the catalog, sorted.
    pub fn template_types(&self) -> Vec<String> {
        self.store.cache().types()
    }

    // --- Vocabulary ---

    /// Register a helper under `name`; replaces any helper of that name.
    pub fn register_helper<H: Helper + 'static>(&self, name: &str, helper: H) {
        self.renderer.register_helper(name, Arc::new(helper));
    }

    /// Register a partial under `name`; replaces any partial of that name.
    pub fn register_partial(&self, name: &str, body: &str) -> Result<()> {
        self.renderer.register_partial(name, body)?;
        self.source_partials.lock().remove(name);
        Ok(())
    }

    pub fn helper_names(&self) -> Vec<String> {
        self.renderer.helper_names()
    }

    pub fn partial_names(&self) -> Vec<String> {
        self.renderer.partial_names()
    }

    // --- Validation & rendering ---

    /// Validate `data` against the schema of `template_type`.
    pub async fn validate(&self, template_type: &str, data: &Value) -> ValidationResult {
        match self.store.get_metadata(template_type).await {
            Some(template) => validation::validate(&template.metadata, data),
            None => ValidationResult::not_found(),
        }
    }

    /// Render a template body against `data`.
    pub fn render(&self, body: &str, data: &Value) -> Result<String> {
        self.renderer.render(body, data)
    }

    /// Validate `data` against `template_type` and, when valid, render its body.
    ///
    /// Declared defaults are filled in for optional variables the data leaves
    /// out; `data` itself is not modified.
    pub async fn render_template(&self, template_type: &str, data: &Value) -> Result<RenderOutcome> {
        let Some(template) = self.store.get_metadata(template_type).await else {
            debug!(template_type, "render requested for unknown type");
            return Ok(RenderOutcome::Invalid(ValidationResult::not_found()));
        };

        let result = validation::validate(&template.metadata, data);
        if !result.valid {
            info!(
                template_type,
                errors = result.errors.len(),
                "data failed validation, not rendering"
            );
            return Ok(RenderOutcome::Invalid(result));
        }

        let body = self.store.body(&template).await?;
        let context = with_defaults(&template.metadata, data);
        let content = self.renderer.render(body, &context)?;
        debug!(template_type, bytes = content.len(), "rendered template");
        Ok(RenderOutcome::Rendered { content })
    }
}

/// `data` with declared defaults filled in for absent or null variables.
fn with_defaults<'a>(metadata: &BlueprintMetadata, data: &'a Value) -> Cow<'a, Value> {
    let Value::Object(map) = data else {
        return Cow::Borrowed(data);
    };

    let missing: Vec<(&str, &Value)> = metadata
        .variables
        .iter()
        .filter_map(|spec| {
            let default = spec.default.as_ref()?;
            map.get(&spec.name)
                .map_or(true, Value::is_null)
                .then_some((spec.name.as_str(), default))
        })
        .collect();
    if missing.is_empty() {
        return Cow::Borrowed(data);
    }

    let mut filled = map.clone();
    for (name, default) in missing {
        filled.insert(name.to_string(), default.clone());
    }
    Cow::Owned(Value::Object(filled))
}
