//! The set of mapping tables a configuration populates.

use std::fmt;

use modelforge_core::RuleSetName;
use serde::{Deserialize, Serialize};

use crate::chain::RuleSetChain;
use crate::mapping::{MappingRecord, MappingTable, NamespacedMappingTable};

/// Which shared mapping table a lookup goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MappingKind {
    /// Model type to property type (`direct`, `propertyType`, ...).
    PropertyType,
    /// Model type to XML base type.
    BaseType,
    /// Model type to global element.
    Element,
    /// Model type to attribute.
    Attribute,
    /// Model type to attribute group.
    AttributeGroup,
}

impl MappingKind {
    /// Every kind.
    pub const ALL: [Self; 5] = [
        Self::PropertyType,
        Self::BaseType,
        Self::Element,
        Self::Attribute,
        Self::AttributeGroup,
    ];

    fn index(self) -> usize {
        match self {
            Self::PropertyType => 0,
            Self::BaseType => 1,
            Self::Element => 2,
            Self::Attribute => 3,
            Self::AttributeGroup => 4,
        }
    }
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PropertyType => "property type",
            Self::BaseType => "base type",
            Self::Element => "element",
            Self::Attribute => "attribute",
            Self::AttributeGroup => "attribute group",
        })
    }
}

/// Per-kind mapping tables plus the target-specific overrides.
#[derive(Debug, Clone, Default)]
pub struct MappingTables {
    shared: [MappingTable; 5],
    target_overrides: NamespacedMappingTable,
}

impl MappingTables {
    /// Empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The table of one kind.
    #[must_use]
    pub fn table(&self, kind: MappingKind) -> &MappingTable {
        &self.shared[kind.index()]
    }

    /// Mutable access to the table of one kind.
    pub fn table_mut(&mut self, kind: MappingKind) -> &mut MappingTable {
        &mut self.shared[kind.index()]
    }

    /// Target-specific overrides, keyed by implementation name.
    #[must_use]
    pub fn target_overrides(&self) -> &NamespacedMappingTable {
        &self.target_overrides
    }

    /// Mutable access to the target-specific overrides.
    pub fn target_overrides_mut(&mut self) -> &mut NamespacedMappingTable {
        &mut self.target_overrides
    }

    /// Cascade lookup in the table of `kind`.
    pub fn lookup<C>(
        &self,
        kind: MappingKind,
        subject: &str,
        rule_set: &RuleSetName,
        chain: &C,
    ) -> Option<&MappingRecord>
    where
        C: RuleSetChain + ?Sized,
    {
        self.table(kind).lookup(subject, rule_set, chain)
    }

    /// Total entries across all tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.iter().map(MappingTable::len).sum::<usize>() + self.target_overrides.len()
    }

    /// Whether every table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
