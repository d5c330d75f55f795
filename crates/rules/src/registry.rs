//! Rule vocabulary and rule-set inheritance.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::OnceLock;

use indexmap::IndexMap;
use modelforge_core::{ConfigError, Diagnostics, RuleName, RuleSetName};

use crate::chain::{Ancestors, RuleSetChain};

/// A declared rule set: its parent and the rules it grants itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    extends: Option<RuleSetName>,
    rules: HashSet<RuleName>,
}

impl RuleSet {
    /// The parent rule set; `None` only for the root.
    #[must_use]
    pub fn extends(&self) -> Option<&RuleSetName> {
        self.extends.as_ref()
    }

    /// Rules granted directly on this rule set.
    pub fn rules(&self) -> impl Iterator<Item = &RuleName> {
        self.rules.iter()
    }

    /// Whether `rule` is granted directly on this rule set.
    #[must_use]
    pub fn grants(&self, rule: &RuleName) -> bool {
        self.rules.contains(rule)
    }
}

/// Resolved chain of one declared rule set.
#[derive(Debug, Clone)]
struct Chain {
    members: Vec<RuleSetName>,
    cyclic: bool,
}

/// Known rules and the rule-set inheritance graph.
///
/// Populate with [`declare_rule`](Self::declare_rule) and
/// [`declare_rule_set`](Self::declare_rule_set); query with
/// [`rule_applies_under`](Self::rule_applies_under),
/// [`rule_set_matches`](Self::rule_set_matches) and
/// [`ancestors_of`](RuleSetChain::ancestors_of).
///
/// Chains are resolved lazily on the first cascade query and memoized until
/// the next mutation. Resolution never loops: a cyclic chain stops at the
/// first repeated rule set and is reported by [`validate`](Self::validate).
/// Once populated the registry is a pure read structure and may be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: HashSet<RuleName>,
    rule_sets: IndexMap<RuleSetName, RuleSet>,
    chains: OnceLock<HashMap<RuleSetName, Chain>>,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleRegistry {
    /// Create a registry holding only the empty root rule set.
    #[must_use]
    pub fn new() -> Self {
        let mut rule_sets = IndexMap::new();
        rule_sets.insert(RuleSetName::root(), RuleSet::default());
        Self {
            rules: HashSet::new(),
            rule_sets,
            chains: OnceLock::new(),
        }
    }

    /// Add a rule to the vocabulary. Idempotent.
    pub fn declare_rule(&mut self, rule: impl Into<RuleName>) {
        self.rules.insert(rule.into());
    }

    /// Declare a rule set, or extend an existing declaration.
    ///
    /// `extends = None` means the rule set extends the root. A repeated
    /// declaration replaces the parent and adds the new rules to the ones
    /// already granted. Rules missing from the vocabulary are still granted
    /// and reported as [`ConfigError::UnknownRuleReferenced`].
    pub fn declare_rule_set<I, R>(
        &mut self,
        name: impl Into<RuleSetName>,
        extends: Option<RuleSetName>,
        additional_rules: I,
    ) -> Diagnostics
    where
        I: IntoIterator<Item = R>,
        R: Into<RuleName>,
    {
        let name = name.into();
        let mut diagnostics = Diagnostics::new();

        let parent = if name.is_root() {
            None
        } else {
            Some(extends.unwrap_or_else(RuleSetName::root))
        };

        let entry = self.rule_sets.entry(name.clone()).or_default();
        entry.extends = parent;
        for rule in additional_rules {
            let rule = rule.into();
            if !self.rules.contains(&rule) {
                diagnostics.push(ConfigError::UnknownRuleReferenced {
                    rule: rule.clone(),
                    rule_set: name.clone(),
                });
            }
            entry.rules.insert(rule);
        }

        tracing::trace!(rule_set = %name, extends = ?entry.extends, "declared rule set");
        self.chains = OnceLock::new();
        diagnostics
    }

    /// Grant a vocabulary rule on a rule set without checking the vocabulary.
    ///
    /// An undeclared rule set is created extending the root.
    pub fn grant(&mut self, rule: impl Into<RuleName>, rule_set: impl Into<RuleSetName>) {
        let rule_set = rule_set.into();
        let is_root = rule_set.is_root();
        let entry = self.rule_sets.entry(rule_set).or_insert_with(|| RuleSet {
            extends: (!is_root).then(RuleSetName::root),
            rules: HashSet::new(),
        });
        entry.rules.insert(rule.into());
        self.chains = OnceLock::new();
    }

    /// Whether the rule is part of the vocabulary.
    #[must_use]
    pub fn has_rule(&self, rule: &RuleName) -> bool {
        self.rules.contains(rule)
    }

    /// Whether a rule set with this name was declared.
    #[must_use]
    pub fn has_rule_set(&self, rule_set: &RuleSetName) -> bool {
        self.rule_sets.contains_key(rule_set)
    }

    /// The declaration of a rule set.
    #[must_use]
    pub fn rule_set(&self, rule_set: &RuleSetName) -> Option<&RuleSet> {
        self.rule_sets.get(rule_set)
    }

    /// Declared rule set names in declaration order (the root first).
    pub fn rule_set_names(&self) -> impl Iterator<Item = &RuleSetName> {
        self.rule_sets.keys()
    }

    /// Number of rules in the vocabulary.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Whether `rule` is granted on `rule_set` or any of its ancestors.
    ///
    /// A cyclic chain is walked up to the first repeat; a rule granted only
    /// beyond that point is reported as not applying.
    #[must_use]
    pub fn rule_applies_under(&self, rule: &RuleName, rule_set: &RuleSetName) -> bool {
        self.ancestors_of(rule_set).any(|ancestor| {
            self.rule_sets
                .get(ancestor)
                .is_some_and(|declared| declared.grants(rule))
        })
    }

    /// Whether `base` is `rule_set` itself or one of its ancestors.
    #[must_use]
    pub fn rule_set_matches(&self, rule_set: &RuleSetName, base: &RuleSetName) -> bool {
        self.ancestors_of(rule_set).any(|ancestor| ancestor == base)
    }

    /// All rules that apply under `rule_set`, across its whole chain.
    #[must_use]
    pub fn effective_rules(&self, rule_set: &RuleSetName) -> BTreeSet<&RuleName> {
        self.ancestors_of(rule_set)
            .filter_map(|ancestor| self.rule_sets.get(ancestor))
            .flat_map(|declared| declared.rules.iter())
            .collect()
    }

    /// Resolve every chain and report configuration problems.
    ///
    /// Returns the first cyclic rule set (in declaration order) as a fatal
    /// [`ConfigError::CyclicRuleSetInheritance`]. Otherwise returns the
    /// non-fatal [`ConfigError::UnknownBaseRuleSet`] findings.
    pub fn validate(&self) -> Result<Diagnostics, ConfigError> {
        let chains = self.chains();
        for name in self.rule_sets.keys() {
            if let Some(chain) = chains.get(name)
                && chain.cyclic
            {
                return Err(ConfigError::CyclicRuleSetInheritance {
                    rule_set: name.clone(),
                    chain: chain.members.clone(),
                });
            }
        }

        let mut diagnostics = Diagnostics::new();
        for (name, declared) in &self.rule_sets {
            if let Some(base) = &declared.extends
                && !self.rule_sets.contains_key(base)
            {
                diagnostics.push(ConfigError::UnknownBaseRuleSet {
                    rule_set: name.clone(),
                    base: base.clone(),
                });
            }
        }
        Ok(diagnostics)
    }

    fn chains(&self) -> &HashMap<RuleSetName, Chain> {
        self.chains.get_or_init(|| {
            self.rule_sets
                .keys()
                .map(|name| (name.clone(), self.resolve_chain(name)))
                .collect()
        })
    }

    fn resolve_chain(&self, start: &RuleSetName) -> Chain {
        let mut members: Vec<RuleSetName> = Vec::new();
        let mut current = start;
        loop {
            if members.contains(current) {
                return Chain {
                    members,
                    cyclic: true,
                };
            }
            members.push(current.clone());
            match self.rule_sets.get(current).and_then(RuleSet::extends) {
                Some(parent) => current = parent,
                None => {
                    return Chain {
                        members,
                        cyclic: false,
                    };
                }
            }
        }
    }
}

impl RuleSetChain for RuleRegistry {
    fn ancestors_of<'a>(&'a self, rule_set: &'a RuleSetName) -> Ancestors<'a> {
        match self.chains().get(rule_set) {
            Some(chain) => {
                if chain.cyclic {
                    tracing::warn!(
                        rule_set = %rule_set,
                        "rule set inheritance is cyclic; cascade stops at the first repeat"
                    );
                }
                Ancestors::new(&chain.members)
            }
            None => Ancestors::single(rule_set),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn rs(name: &str) -> RuleSetName {
        RuleSetName::new(name)
    }

    fn rule(name: &str) -> RuleName {
        RuleName::new(name)
    }

    fn chain_of(registry: &RuleRegistry, name: &str) -> Vec<String> {
        let name = rs(name);
        registry
            .ancestors_of(&name)
            .map(ToString::to_string)
            .collect()
    }

    /// r1 extends r2 extends r3 (extends root); one rule granted on each.
    fn three_level() -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        for r in ["rule-a", "rule-b", "rule-c", "rule-root", "rule-none"] {
            registry.declare_rule(r);
        }
        registry.declare_rule_set("r3", None, ["rule-c"]);
        registry.declare_rule_set("r2", Some(rs("r3")), ["rule-b"]);
        registry.declare_rule_set("r1", Some(rs("r2")), ["rule-a"]);
        registry.grant("rule-root", RuleSetName::root());
        registry
    }

    #[test]
    fn new_registry_has_only_root() {
        let registry = RuleRegistry::new();
        assert!(registry.has_rule_set(&RuleSetName::root()));
        assert_eq!(registry.rule_set_names().count(), 1);
        assert_eq!(registry.rule_count(), 0);
    }

    #[test]
    fn declare_rule_is_idempotent_and_case_insensitive() {
        let mut registry = RuleRegistry::new();
        registry.declare_rule("Rule-XSD-cls-type");
        registry.declare_rule("rule-xsd-cls-type");
        assert_eq!(registry.rule_count(), 1);
        assert!(registry.has_rule(&rule("RULE-xsd-CLS-type")));
        assert!(!registry.has_rule(&rule("rule-xsd-cls-other")));
    }

    #[test]
    fn ancestors_walk_to_root() {
        let registry = three_level();
        assert_eq!(chain_of(&registry, "r1"), vec!["r1", "r2", "r3", "*"]);
        assert_eq!(chain_of(&registry, "R2"), vec!["r2", "r3", "*"]);
        assert_eq!(chain_of(&registry, "*"), vec!["*"]);
    }

    #[test]
    fn ancestors_are_restartable() {
        let registry = three_level();
        let name = rs("r1");
        let first: Vec<_> = registry.ancestors_of(&name).collect();
        let second: Vec<_> = registry.ancestors_of(&name).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn undeclared_rule_set_is_its_own_chain() {
        let registry = three_level();
        assert_eq!(chain_of(&registry, "unknown"), vec!["unknown"]);
    }

    #[test]
    fn cascade_applies_rules_from_ancestors() {
        let registry = three_level();
        let r1 = rs("r1");
        assert!(registry.rule_applies_under(&rule("rule-a"), &r1));
        assert!(registry.rule_applies_under(&rule("rule-b"), &r1));
        assert!(registry.rule_applies_under(&rule("rule-c"), &r1));
        assert!(registry.rule_applies_under(&rule("rule-root"), &r1));
        assert!(!registry.rule_applies_under(&rule("rule-none"), &r1));

        let r2 = rs("r2");
        assert!(!registry.rule_applies_under(&rule("rule-a"), &r2));
        assert!(registry.rule_applies_under(&rule("rule-b"), &r2));
    }

    #[test]
    fn rule_set_matches_chain_members() {
        let registry = three_level();
        assert!(registry.rule_set_matches(&rs("r1"), &rs("r1")));
        assert!(registry.rule_set_matches(&rs("r1"), &rs("R3")));
        assert!(registry.rule_set_matches(&rs("r1"), &RuleSetName::root()));
        assert!(!registry.rule_set_matches(&rs("r3"), &rs("r1")));
        assert!(registry.rule_set_matches(&rs("unknown"), &rs("unknown")));
    }

    #[test]
    fn effective_rules_unions_chain() {
        let registry = three_level();
        let rules: Vec<&str> = registry
            .effective_rules(&rs("r2"))
            .into_iter()
            .map(RuleName::as_str)
            .collect();
        assert_eq!(rules, vec!["rule-b", "rule-c", "rule-root"]);
    }

    #[test]
    fn unknown_rules_are_reported_but_recorded() {
        let mut registry = RuleRegistry::new();
        registry.declare_rule("rule-known");
        let diagnostics = registry.declare_rule_set("mine", None, ["rule-known", "rule-unknown"]);
        assert_eq!(
            diagnostics.into_vec(),
            vec![ConfigError::UnknownRuleReferenced {
                rule: rule("rule-unknown"),
                rule_set: rs("mine"),
            }]
        );
        assert!(registry.rule_applies_under(&rule("rule-unknown"), &rs("mine")));
    }

    #[test]
    fn redeclaration_replaces_parent_and_unions_rules() {
        let mut registry = RuleRegistry::new();
        registry.declare_rule_set("a", None, ["rule-a1"]);
        registry.declare_rule_set("b", None, ["rule-b"]);
        registry.declare_rule_set("a", Some(rs("b")), ["rule-a2"]);
        assert_eq!(chain_of(&registry, "a"), vec!["a", "b", "*"]);
        assert!(registry.rule_applies_under(&rule("rule-a1"), &rs("a")));
        assert!(registry.rule_applies_under(&rule("rule-a2"), &rs("a")));
        assert!(registry.rule_applies_under(&rule("rule-b"), &rs("a")));
    }

    #[test]
    fn mutation_invalidates_memoized_chains() {
        let mut registry = RuleRegistry::new();
        registry.declare_rule_set("child", Some(rs("parent")), Vec::<RuleName>::new());
        assert_eq!(chain_of(&registry, "child"), vec!["child", "parent"]);
        registry.declare_rule_set("parent", None, Vec::<RuleName>::new());
        assert_eq!(chain_of(&registry, "child"), vec!["child", "parent", "*"]);
    }

    #[test]
    fn cycle_is_rejected_without_hanging() {
        let mut registry = RuleRegistry::new();
        registry.declare_rule_set("a", Some(rs("b")), ["rule-x"]);
        registry.declare_rule_set("b", Some(rs("a")), Vec::<RuleName>::new());

        let err = registry.validate().unwrap_err();
        assert_eq!(
            err,
            ConfigError::CyclicRuleSetInheritance {
                rule_set: rs("a"),
                chain: vec![rs("a"), rs("b")],
            }
        );

        // Queries still terminate.
        assert_eq!(chain_of(&registry, "b"), vec!["b", "a"]);
        assert!(registry.rule_applies_under(&rule("rule-x"), &rs("b")));
        assert!(!registry.rule_applies_under(&rule("rule-y"), &rs("b")));
        assert!(!registry.rule_set_matches(&rs("a"), &RuleSetName::root()));
    }

    #[test]
    fn unknown_base_is_a_diagnostic() {
        let mut registry = RuleRegistry::new();
        registry.declare_rule_set("child", Some(rs("ghost")), Vec::<RuleName>::new());
        let diagnostics = registry.validate().unwrap();
        assert_eq!(
            diagnostics.into_vec(),
            vec![ConfigError::UnknownBaseRuleSet {
                rule_set: rs("child"),
                base: rs("ghost"),
            }]
        );
    }

    #[test]
    fn root_never_gets_a_parent() {
        let mut registry = RuleRegistry::new();
        registry.declare_rule_set("*", Some(rs("other")), ["rule-r"]);
        assert_eq!(registry.rule_set(&RuleSetName::root()).unwrap().extends(), None);
        assert!(registry.validate().unwrap().is_empty());
    }

    #[test]
    fn registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleRegistry>();
    }

    proptest! {
        /// Declaration order of a linear chain never changes cascade answers.
        #[test]
        fn cascade_is_independent_of_declaration_order(order in Just([0usize, 1, 2]).prop_shuffle()) {
            let decls = [
                ("r1", Some("r2"), "rule-a"),
                ("r2", Some("r3"), "rule-b"),
                ("r3", None, "rule-c"),
            ];
            let mut registry = RuleRegistry::new();
            for r in ["rule-a", "rule-b", "rule-c", "rule-d"] {
                registry.declare_rule(r);
            }
            for idx in order {
                let (name, parent, granted) = decls[idx];
                registry.declare_rule_set(name, parent.map(RuleSetName::new), [granted]);
            }
            for r in ["rule-a", "rule-b", "rule-c"] {
                prop_assert!(registry.rule_applies_under(&rule(r), &rs("r1")));
            }
            prop_assert!(!registry.rule_applies_under(&rule("rule-d"), &rs("r1")));
            prop_assert!(!registry.rule_applies_under(&rule("rule-a"), &rs("r3")));
        }

        /// A rule granted anywhere on the chain applies at every descendant.
        #[test]
        fn cascade_is_monotonic(level in 0usize..3, suffix in "[a-z]{1,8}") {
            let names = ["r1", "r2", "r3"];
            let mut registry = RuleRegistry::new();
            registry.declare_rule_set("r3", None, Vec::<RuleName>::new());
            registry.declare_rule_set("r2", Some(rs("r3")), Vec::<RuleName>::new());
            registry.declare_rule_set("r1", Some(rs("r2")), Vec::<RuleName>::new());
            let granted = format!("rule-{suffix}");
            registry.grant(granted.as_str(), names[level]);

            for (idx, name) in names.iter().enumerate() {
                let applies = registry.rule_applies_under(&rule(&granted), &rs(name));
                prop_assert_eq!(applies, idx <= level);
            }
        }
    }
}
