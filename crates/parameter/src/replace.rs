//! Token replacement applied to parameter values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Whole-value substitutions applied when a parameter is set.
///
/// A value equal to a token is stored as the token's literal. The lookup
/// happens exactly once; the literal is not looked up again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplacementTable {
    entries: HashMap<String, String>,
}

impl ReplacementTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `token` to be replaced by `literal`.
    pub fn insert(&mut self, token: impl Into<String>, literal: impl Into<String>) {
        self.entries.insert(token.into(), literal.into());
    }

    /// The literal for `token`, if any.
    #[must_use]
    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    /// The value to store for `value`.
    #[must_use]
    pub fn apply(&self, value: String) -> String {
        match self.entries.get(&value) {
            Some(literal) => literal.clone(),
            None => value,
        }
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no token is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ReplacementTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_whole_values_once() {
        let table: ReplacementTable = [("$out$", "/tmp/out"), ("/tmp/out", "never")]
            .into_iter()
            .collect();
        assert_eq!(table.apply("$out$".to_owned()), "/tmp/out");
        assert_eq!(table.apply("prefix $out$".to_owned()), "prefix $out$");
        assert_eq!(table.lookup("missing"), None);
    }
}
