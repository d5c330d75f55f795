//! Root-ward traversal of rule-set inheritance.

use std::iter::FusedIterator;

use modelforge_core::RuleSetName;

/// Anything that can enumerate the ancestors of a rule set.
///
/// Implemented by [`RuleRegistry`](crate::RuleRegistry); mapping tables take
/// this trait so they do not depend on how inheritance is stored.
pub trait RuleSetChain {
    /// The rule set itself followed by its ancestors, nearest first.
    fn ancestors_of<'a>(&'a self, rule_set: &'a RuleSetName) -> Ancestors<'a>;
}

/// Iterator over a rule set and its ancestors, nearest first.
///
/// Always finite. Every call to [`RuleSetChain::ancestors_of`] starts a fresh
/// walk; a clone continues from the position it was cloned at.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    chain: &'a [RuleSetName],
    pos: usize,
}

impl<'a> Ancestors<'a> {
    pub(crate) fn new(chain: &'a [RuleSetName]) -> Self {
        Self { chain, pos: 0 }
    }

    /// A chain holding only `rule_set` (used for undeclared rule sets).
    pub fn single(rule_set: &'a RuleSetName) -> Self {
        Self::new(std::slice::from_ref(rule_set))
    }
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a RuleSetName;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.chain.get(self.pos)?;
        self.pos += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.chain.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Ancestors<'_> {}

impl FusedIterator for Ancestors<'_> {}
