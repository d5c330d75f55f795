//! Name lookup for stage implementations.

use std::collections::HashMap;

use modelforge_core::{ConfigError, ImplementationKind, TargetKind, TransformerKind};

/// Maps configured implementation names to [`ImplementationKind`]s.
///
/// Built-in kinds are registered under their fully qualified name and under
/// their last path segment (`XmlSchema`, `Flattener`, ...). Lookups ignore
/// surrounding whitespace but are otherwise exact.
#[derive(Debug, Clone)]
pub struct ImplementationRegistry {
    by_name: HashMap<String, ImplementationKind>,
}

impl Default for ImplementationRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ImplementationRegistry {
    /// A registry without any names.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    /// A registry holding every built-in target and transformer.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        let builtins = TargetKind::ALL
            .into_iter()
            .map(ImplementationKind::Target)
            .chain(TransformerKind::ALL.into_iter().map(ImplementationKind::Transformer));
        for kind in builtins {
            let name = kind.implementation_name();
            registry.register(name, kind);
            if let Some((_, short)) = name.rsplit_once('.') {
                registry.register(short, kind);
            }
        }
        registry
    }

    /// Register `name` as an alias of `kind`; a later registration wins.
    pub fn register(&mut self, name: impl Into<String>, kind: ImplementationKind) {
        self.by_name.insert(name.into(), kind);
    }

    /// Resolve any implementation.
    pub fn resolve(&self, name: &str) -> crate::Result<ImplementationKind> {
        self.by_name
            .get(name.trim())
            .copied()
            .ok_or_else(|| ConfigError::UnknownImplementation(name.to_owned()))
    }

    /// Resolve a name that must denote a target.
    pub fn resolve_target(&self, name: &str) -> crate::Result<TargetKind> {
        match self.resolve(name)? {
            ImplementationKind::Target(kind) => Ok(kind),
            ImplementationKind::Transformer(_) => Err(ConfigError::ImplementationRoleMismatch {
                name: name.to_owned(),
                expected: "target",
            }),
        }
    }

    /// Resolve a name that must denote a transformer.
    pub fn resolve_transformer(&self, name: &str) -> crate::Result<TransformerKind> {
        match self.resolve(name)? {
            ImplementationKind::Transformer(kind) => Ok(kind),
            ImplementationKind::Target(_) => Err(ConfigError::ImplementationRoleMismatch {
                name: name.to_owned(),
                expected: "transformer",
            }),
        }
    }

    /// Number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether no name is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("de.interactive_instruments.ShapeChange.Target.XmlSchema.XmlSchema", TargetKind::XmlSchema)]
    #[case("XmlSchema", TargetKind::XmlSchema)]
    #[case(" SqlDdl ", TargetKind::SqlDdl)]
    #[case("FOL2Schematron", TargetKind::Fol2Schematron)]
    fn resolves_targets(#[case] name: &str, #[case] expected: TargetKind) {
        let registry = ImplementationRegistry::with_builtins();
        assert_eq!(registry.resolve_target(name).unwrap(), expected);
    }

    #[test]
    fn unknown_name_is_typed_error() {
        let registry = ImplementationRegistry::with_builtins();
        assert_eq!(
            registry.resolve("com.example.Nope").unwrap_err(),
            ConfigError::UnknownImplementation("com.example.Nope".to_owned())
        );
    }

    #[test]
    fn role_mismatch() {
        let registry = ImplementationRegistry::with_builtins();
        let err = registry.resolve_target("Flattener").unwrap_err();
        assert_eq!(err.code(), "CFG_IMPL_ROLE");
        let err = registry.resolve_transformer("JsonSchema").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ImplementationRoleMismatch { expected: "transformer", .. }
        ));
    }

    #[test]
    fn custom_alias() {
        let mut registry = ImplementationRegistry::empty();
        assert!(registry.is_empty());
        registry.register("xsd", ImplementationKind::Target(TargetKind::XmlSchema));
        assert_eq!(registry.resolve_target("xsd").unwrap(), TargetKind::XmlSchema);
        assert_eq!(registry.len(), 1);
    }
}
