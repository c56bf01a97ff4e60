//! Helper registry: named formatting functions callable from template bodies.
//!
//! A helper receives its evaluated arguments and returns text. Helpers are
//! total: on input of the wrong shape they return an empty string instead of
//! failing, so a document still renders when one value is off.
//!
//! ## Built-in helpers
//!
//! | Name          | Call                                  | Example output            |
//! |---------------|---------------------------------------|---------------------------|
//! | `formatDate`  | `{{formatDate due "long"}}`           | `Monday, January 15, 2024`|
//! | `currency`    | `{{currency total "EUR"}}`            | `€1,234.50`               |
//! | `percentage`  | `{{percentage rate 1}}`               | `12.5%`                   |
//! | `conditional` | `{{conditional paid "Paid" "Due"}}`   | `Paid`                    |
//! | `list`        | `{{list tags " / "}}`                 | `a / b`                   |
//!
//! Custom helpers are any `Fn(&[Value]) -> String + Send + Sync`; registering
//! under an existing name (built-ins included) replaces the previous helper.

pub mod builtin;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

pub use builtin::{conditional, currency, format_date, list, percentage, DateStyle};

/// A named pure formatting function.
pub trait Helper: Send + Sync {
    fn call(&self, args: &[Value]) -> String;
}

impl<F> Helper for F
where
    F: Fn(&[Value]) -> String + Send + Sync,
{
    fn call(&self, args: &[Value]) -> String {
        self(args)
    }
}

/// Name → helper map.
#[derive(Clone, Default)]
pub struct HelperRegistry {
    helpers: HashMap<String, Arc<dyn Helper>>,
}

impl HelperRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in helpers. `currency` falls back to
    /// `default_currency` when called without a code.
    pub fn with_builtins(default_currency: &str) -> Self {
        let mut registry = Self::new();
        for (name, helper) in builtin::builtins(default_currency) {
            registry.register(name, helper);
        }
        registry
    }

    /// Register `helper` under `name`, returning the helper it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        helper: Arc<dyn Helper>,
    ) -> Option<Arc<dyn Helper>> {
        self.helpers.insert(name.into(), helper)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Helper>> {
        self.helpers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    /// Call a helper by name; `None` when no such helper exists.
    pub fn call(&self, name: &str, args: &[Value]) -> Option<String> {
        self.helpers.get(name).map(|h| h.call(args))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.helpers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Helper>)> {
        self.helpers.iter().map(|(name, h)| (name.as_str(), h))
    }
}

impl fmt::Debug for HelperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelperRegistry")
            .field("helpers", &self.names())
            .finish()
    }
}
