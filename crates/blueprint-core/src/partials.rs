//! Partial registry: named template fragments included with `{{> name}}`.
//!
//! A partial renders against the same data context as the body including it.
//! Partials may include other partials, but never themselves: registration
//! rejects any fragment that would close an inclusion cycle, directly
//! (`a` includes `a`) or transitively (`a` → `b` → `a`). Partials referenced
//! before they are registered are allowed; the cycle check runs again when
//! they arrive.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{BlueprintError, Result};

/// Matches `{{> name}}`, `{{~> name}}`, `{{#> name}}` and quoted names.
static PARTIAL_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{~?#?>\s*["']?([A-Za-z0-9_\-./]+)["']?"#).unwrap()
});

/// Comments (`{{! }}`, `{{!-- --}}`) and raw blocks (`{{{{raw}}}}...{{{{/raw}}}}`),
/// whose contents are never evaluated.
static INERT_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)\{\{~?!--.*?--~?\}\}|\{\{~?!.*?\}\}|\{\{\{\{[^}]*\}\}\}\}.*?\{\{\{\{/[^}]*\}\}\}\}",
    )
    .unwrap()
});

/// Names of the partials a template body includes. Dynamic partials
/// (`{{> (expr)}}`), `@partial-block` and references inside comments or raw
/// blocks are not listed.
pub fn references(body: &str) -> BTreeSet<String> {
    let live = INERT_SPAN.replace_all(body, "");
    PARTIAL_REFERENCE
        .captures_iter(&live)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct PartialRegistry {
    bodies: HashMap<String, String>,
    /// Partial → partials it includes.
    references: HashMap<String, BTreeSet<String>>,
}

impl PartialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`BlueprintError::PartialCycle`] if registering `body`
    /// under `name` would let `name` include itself.
    pub fn check(&self, name: &str, body: &str) -> Result<()> {
        let mut visited = HashSet::new();
        for reference in references(body) {
            if let Some(path) = self.path_to(&reference, name, &mut visited) {
                let mut chain = Vec::with_capacity(path.len() + 1);
                chain.push(name.to_string());
                chain.extend(path);
                return Err(BlueprintError::PartialCycle {
                    name: name.to_string(),
                    chain,
                });
            }
        }
        Ok(())
    }

    /// Register (or replace) a partial after the cycle check.
    pub fn insert(&mut self, name: &str, body: &str) -> Result<()> {
        self.check(name, body)?;
        self.references.insert(name.to_string(), references(body));
        self.bodies.insert(name.to_string(), body.to_string());
        Ok(())
    }

    /// Remove a partial; returns its body if it was registered.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.references.remove(name);
        self.bodies.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.bodies.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bodies.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bodies.keys().cloned().collect();
        names.sort();
        names
    }

    /// Inclusion path from `from` to `target`, both ends included.
    fn path_to(
        &self,
        from: &str,
        target: &str,
        visited: &mut HashSet<String>,
    ) -> Option<Vec<String>> {
        if from == target {
            return Some(vec![target.to_string()]);
        }
        if !visited.insert(from.to_string()) {
            return None;
        }
        for next in self.references.get(from).into_iter().flatten() {
            if let Some(mut path) = self.path_to(next, target, visited) {
                path.insert(0, from.to_string());
                return Some(path);
            }
        }
        None
    }
}
