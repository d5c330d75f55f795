//! Global and stage-scoped parameter values.

use std::collections::{BTreeSet, HashMap};

use crate::key::ParameterKey;
use crate::pattern::full_match;
use crate::replace::ReplacementTable;

/// Read access to parameters.
///
/// Implemented by [`ParameterStore`] and by [`ParameterOverlay`](crate::ParameterOverlay),
/// so callers do not care whether stage parameters are layered on top.
pub trait ParameterSource {
    /// The global value of `name`.
    fn get(&self, name: &str) -> Option<&str>;

    /// The value of `name` scoped to `scope`. No fallback to the global value.
    fn get_scoped(&self, scope: &str, name: &str) -> Option<&str>;

    /// Names of `scope`'s parameters that fully match `pattern`.
    fn names_matching(&self, scope: &str, pattern: &str) -> crate::Result<BTreeSet<String>>;
}

/// Global and stage-scoped parameter values.
///
/// Every set is last-write-wins and passes the value through the store's
/// [`ReplacementTable`] once.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    global: HashMap<String, String>,
    scoped: HashMap<String, HashMap<String, String>>,
    replacements: ReplacementTable,
}

impl ParameterStore {
    /// An empty store without replacements.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store applying `replacements` on every set.
    #[must_use]
    pub fn with_replacements(replacements: ReplacementTable) -> Self {
        Self {
            replacements,
            ..Self::default()
        }
    }

    /// The replacement table applied on set.
    #[must_use]
    pub fn replacements(&self) -> &ReplacementTable {
        &self.replacements
    }

    /// Set a global value; returns the previous value.
    pub fn set_global(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = self.replacements.apply(value.into());
        tracing::trace!(parameter = %name, %value, "set global parameter");
        self.global.insert(name, value)
    }

    /// Set a value scoped to `scope`; returns the previous value.
    pub fn set_scoped(
        &mut self,
        scope: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        let scope = scope.into();
        let name = name.into();
        let value = self.replacements.apply(value.into());
        tracing::trace!(%scope, parameter = %name, %value, "set scoped parameter");
        self.scoped.entry(scope).or_default().insert(name, value)
    }

    /// Set a value by key.
    pub fn set(&mut self, key: ParameterKey, value: impl Into<String>) -> Option<String> {
        match key.scope {
            Some(scope) => self.set_scoped(scope, key.name, value),
            None => self.set_global(key.name, value),
        }
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get_key(&self, key: &ParameterKey) -> Option<&str> {
        match &key.scope {
            Some(scope) => self.get_scoped(scope, &key.name),
            None => self.get(&key.name),
        }
    }

    /// Scopes that hold at least one parameter.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scoped.keys().map(String::as_str)
    }

    /// Every parameter, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (ParameterKey, &str)> {
        let global = self
            .global
            .iter()
            .map(|(name, value)| (ParameterKey::global(name.as_str()), value.as_str()));
        let scoped = self.scoped.iter().flat_map(|(scope, params)| {
            params.iter().map(move |(name, value)| {
                (
                    ParameterKey::scoped(scope.as_str(), name.as_str()),
                    value.as_str(),
                )
            })
        });
        global.chain(scoped)
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.global.len() + self.scoped.values().map(HashMap::len).sum::<usize>()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn scope_names(&self, scope: &str) -> impl Iterator<Item = &str> {
        self.scoped
            .get(scope)
            .into_iter()
            .flat_map(|params| params.keys().map(String::as_str))
    }
}

impl ParameterSource for ParameterStore {
    fn get(&self, name: &str) -> Option<&str> {
        self.global.get(name).map(String::as_str)
    }

    fn get_scoped(&self, scope: &str, name: &str) -> Option<&str> {
        self.scoped.get(scope)?.get(name).map(String::as_str)
    }

    fn names_matching(&self, scope: &str, pattern: &str) -> crate::Result<BTreeSet<String>> {
        let regex = full_match(pattern)?;
        Ok(self
            .scope_names(scope)
            .filter(|name| regex.is_match(name))
            .map(str::to_owned)
            .collect())
    }
}
