#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Modelforge Rules
//!
//! The encoding-rule cascade and the mapping tables that depend on it.
//!
//! - [`RuleRegistry`] holds the rule vocabulary and the rule sets (encoding
//!   rules) with their `extends` links, and answers cascade queries
//! - [`Ancestors`] is the single root-ward traversal every lookup shares
//! - [`MappingTable`] and [`NamespacedMappingTable`] resolve
//!   `(subject, rule set)` to a record, falling back along the chain
//! - [`MappingTables`] bundles the per-kind tables a configuration fills
//! - [`standard`] preloads the built-in rule vocabulary

pub mod chain;
pub mod mapping;
pub mod registry;
pub mod standard;
pub mod tables;

pub use chain::{Ancestors, RuleSetChain};
pub use mapping::{MappingKey, MappingRecord, MappingTable, NamespacedMappingTable};
pub use registry::{RuleRegistry, RuleSet};
pub use tables::{MappingKind, MappingTables};
