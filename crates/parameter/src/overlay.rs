//! Copy-on-write parameter layer over a shared store.

use std::collections::{BTreeSet, HashMap};

use crate::pattern::full_match;
use crate::store::{ParameterSource, ParameterStore};

/// Stage parameters layered over a frozen [`ParameterStore`].
///
/// Values set on the overlay shadow the store for the same key; the store is
/// never modified. An overlay lives only while its stage runs, and several
/// overlays may borrow the same store from different threads.
#[derive(Debug, Clone)]
pub struct ParameterOverlay<'a> {
    base: &'a ParameterStore,
    global: HashMap<String, String>,
    scoped: HashMap<String, HashMap<String, String>>,
}

impl<'a> ParameterOverlay<'a> {
    /// An empty overlay over `base`.
    #[must_use]
    pub fn new(base: &'a ParameterStore) -> Self {
        Self {
            base,
            global: HashMap::new(),
            scoped: HashMap::new(),
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn base(&self) -> &'a ParameterStore {
        self.base
    }

    /// Shadow a global value.
    pub fn set_global(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value = self.base.replacements().apply(value.into());
        self.global.insert(name.into(), value);
    }

    /// Shadow a scoped value.
    pub fn set_scoped(
        &mut self,
        scope: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        let value = self.base.replacements().apply(value.into());
        self.scoped
            .entry(scope.into())
            .or_default()
            .insert(name.into(), value);
    }

    /// Whether the overlay shadows nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.scoped.values().all(HashMap::is_empty)
    }
}

impl ParameterSource for ParameterOverlay<'_> {
    fn get(&self, name: &str) -> Option<&str> {
        self.global
            .get(name)
            .map(String::as_str)
            .or_else(|| self.base.get(name))
    }

    fn get_scoped(&self, scope: &str, name: &str) -> Option<&str> {
        self.scoped
            .get(scope)
            .and_then(|params| params.get(name))
            .map(String::as_str)
            .or_else(|| self.base.get_scoped(scope, name))
    }

    fn names_matching(&self, scope: &str, pattern: &str) -> crate::Result<BTreeSet<String>> {
        let regex = full_match(pattern)?;
        let own = self
            .scoped
            .get(scope)
            .into_iter()
            .flat_map(|params| params.keys().map(String::as_str));
        Ok(own
            .chain(self.base.scope_names(scope))
            .filter(|name| regex.is_match(name))
            .map(str::to_owned)
            .collect())
    }
}
