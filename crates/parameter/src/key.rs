//! Keys of global and scoped parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one parameter: a bare name, or a name scoped to a stage.
///
/// Scopes are stage identities (implementation names). Both parts are
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParameterKey {
    /// Owning stage identity; `None` for a global parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Parameter name local to the scope.
    pub name: String,
}

impl ParameterKey {
    /// A global key.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            scope: None,
            name: name.into(),
        }
    }

    /// A key scoped to a stage identity.
    pub fn scoped(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
            name: name.into(),
        }
    }

    /// Whether the key has no scope.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.scope.is_none()
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{scope}::{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}
