//! Handlebars-based render engine.
//!
//! Wraps a [`handlebars::Handlebars`] registry together with the
//! [`HelperRegistry`] and [`PartialRegistry`] it was populated from, all
//! behind one reader-writer lock: renders share the read side, registration
//! takes the write side.
//!
//! Documents are rendered in **non-strict mode**: an unresolved `{{path}}`
//! renders as an empty string so a document with a gap still comes out.
//! Block constructs are the Handlebars built-ins:
//!
//! ```text
//! {{#if paid}}Paid{{else}}Due {{formatDate due "long"}}{{/if}}
//! {{#each lines}}{{this.item}}: {{currency this.amount}}{{/each}}
//! {{> footer}}
//! ```

use std::sync::Arc;

use handlebars::{
    Context, Handlebars, Helper as HbsHelper, HelperDef, RenderContext, RenderError, ScopedJson,
};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{BlueprintError, Result};
use crate::helpers::{Helper, HelperRegistry};
use crate::partials::PartialRegistry;

/// Exposes a [`Helper`] to Handlebars. Arguments are the evaluated
/// positional parameters; unresolved paths arrive as `null`.
struct HelperBridge(Arc<dyn Helper>);

impl HelperDef for HelperBridge {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &HbsHelper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> std::result::Result<ScopedJson<'rc>, RenderError> {
        let args: Vec<Value> = h.params().iter().map(|p| p.value().clone()).collect();
        Ok(ScopedJson::Derived(Value::String(self.0.call(&args))))
    }
}

struct RenderState {
    hbs: Handlebars<'static>,
    helpers: HelperRegistry,
    partials: PartialRegistry,
}

/// Template renderer holding the helper and partial vocabulary.
pub struct Renderer {
    state: RwLock<RenderState>,
}

impl Renderer {
    /// Create a renderer with the built-in helpers registered.
    pub fn new(config: &EngineConfig) -> Self {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(false);
        if !config.escape_html {
            hbs.register_escape_fn(handlebars::no_escape);
        }

        let helpers = HelperRegistry::with_builtins(&config.default_currency);
        for (name, helper) in helpers.iter() {
            hbs.register_helper(name, Box::new(HelperBridge(Arc::clone(helper))));
        }

        Self {
            state: RwLock::new(RenderState {
                hbs,
                helpers,
                partials: PartialRegistry::new(),
            }),
        }
    }

    /// Register a helper, replacing any helper (built-in or custom) of the
    /// same name.
    pub fn register_helper(&self, name: &str, helper: Arc<dyn Helper>) {
        let mut state = self.state.write();
        state
            .hbs
            .register_helper(name, Box::new(HelperBridge(Arc::clone(&helper))));
        let replaced = state.helpers.register(name, helper).is_some();
        debug!(helper = name, replaced, "registered helper");
    }

    /// Register a partial. Rejects fragments that do not compile and
    /// fragments that would include themselves.
    pub fn register_partial(&self, name: &str, body: &str) -> Result<()> {
        let mut state = self.state.write();
        state.partials.check(name, body)?;
        state
            .hbs
            .register_partial(name, body)
            .map_err(|e| BlueprintError::TemplateSyntax(e.to_string()))?;
        state.partials.insert(name, body)?;
        debug!(partial = name, "registered partial");
        Ok(())
    }

    /// Remove a partial; returns whether it was registered.
    pub fn unregister_partial(&self, name: &str) -> bool {
        let mut state = self.state.write();
        state.hbs.unregister_template(name);
        let removed = state.partials.remove(name).is_some();
        debug!(partial = name, removed, "unregistered partial");
        removed
    }

    /// Render `body` against `data`.
    ///
    /// Rendering is a pure function of the body, the data and the registered
    /// vocabulary; no state is kept between calls.
    pub fn render(&self, body: &str, data: &Value) -> Result<String> {
        self.state
            .read()
            .hbs
            .render_template(body, data)
            .map_err(|e| BlueprintError::TemplateRender(e.to_string()))
    }

    /// Call a registered helper directly.
    pub fn call_helper(&self, name: &str, args: &[Value]) -> Option<String> {
        let helper = self.state.read().helpers.get(name)?;
        Some(helper.call(args))
    }

    pub fn helper_names(&self) -> Vec<String> {
        self.state.read().helpers.names()
    }

    pub fn partial_names(&self) -> Vec<String> {
        self.state.read().partials.names()
    }

    pub fn partial(&self, name: &str) -> Option<String> {
        self.state.read().partials.get(name).map(str::to_string)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
