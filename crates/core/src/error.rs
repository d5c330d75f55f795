//! Configuration error taxonomy.

use thiserror::Error;

use crate::id::StageId;
use crate::keys::{RuleName, RuleSetName};

/// Everything that can be wrong with a configuration.
///
/// Some variants are fatal and abort loading or assembly; others are
/// reported as diagnostics while processing continues. See
/// [`ConfigError::is_fatal`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Following `extends` from a rule set never reaches the root.
    #[error("rule set `{rule_set}` has cyclic inheritance: {}", render_chain(.chain))]
    CyclicRuleSetInheritance {
        /// The rule set whose chain does not terminate.
        rule_set: RuleSetName,
        /// The chain walked before the first repeated rule set.
        chain: Vec<RuleSetName>,
    },

    /// A rule set extends a rule set that was never declared.
    #[error("rule set `{rule_set}` extends unknown rule set `{base}`")]
    UnknownBaseRuleSet {
        /// The declaring rule set.
        rule_set: RuleSetName,
        /// The undeclared parent.
        base: RuleSetName,
    },

    /// A rule set grants a rule that is not in the rule vocabulary.
    #[error(
        "rule `{rule}` is unknown, but referenced from rule set `{rule_set}`; \
         this only matters if the rule is used by an encoding rule of the configuration"
    )]
    UnknownRuleReferenced {
        /// The unknown rule.
        rule: RuleName,
        /// The rule set granting it.
        rule_set: RuleSetName,
    },

    /// Two stages share an id.
    #[error("duplicate stage id: {0}")]
    DuplicateStageId(StageId),

    /// A stage names a predecessor that does not exist.
    #[error("{stage} references unknown predecessor `{predecessor}`")]
    DanglingPredecessor {
        /// Description of the referencing stage.
        stage: String,
        /// The unresolved predecessor id.
        predecessor: StageId,
    },

    /// A transformer names itself as its predecessor.
    #[error("transformer `{0}` uses itself as its input")]
    SelfReferentialStage(StageId),

    /// Transformers reference each other in a loop that never reaches the input.
    #[error("cyclic pipeline through transformers: {}", render_stages(.stages))]
    CyclicPipeline {
        /// Transformer ids on the cycle, in predecessor order.
        stages: Vec<StageId>,
    },

    /// A stage that runs depends on a disabled transformer.
    #[error("{stage} depends on disabled transformer `{predecessor}`")]
    DisabledPredecessorOfEnabledStage {
        /// Description of the dependent stage.
        stage: String,
        /// The disabled predecessor.
        predecessor: StageId,
    },

    /// A mode string is not one of the known processing modes.
    #[error("invalid processing mode `{0}`")]
    InvalidProcessingMode(String),

    /// No stage implementation is registered under the given name.
    #[error("unknown stage implementation `{0}`")]
    UnknownImplementation(String),

    /// The implementation exists but plays the other role (target vs transformer).
    #[error("implementation `{name}` cannot be used as a {expected}")]
    ImplementationRoleMismatch {
        /// The configured implementation name.
        name: String,
        /// The role the configuration asked for.
        expected: &'static str,
    },

    /// A mapping record must have between one and four fields.
    #[error("mapping record must have 1 to 4 fields, got {0}")]
    InvalidMappingRecord(usize),

    /// A parameter name pattern is not a valid regular expression.
    #[error("invalid parameter name pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Why the regex engine rejected it.
        reason: String,
    },

    /// A `gmlVersion` parameter names a GML version that is not supported.
    #[error("unknown value for gmlVersion: `{0}` (expected 3.3, 3.2, 3.1 or 2.1)")]
    InvalidGmlVersion(String),

    /// The configuration declares no target.
    #[error("configuration declares no target")]
    NoTargets,
}

impl ConfigError {
    /// Whether the error aborts loading or assembly.
    ///
    /// Non-fatal errors are collected as [`Diagnostics`].
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::UnknownRuleReferenced { .. } | Self::UnknownBaseRuleSet { .. }
        )
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::CyclicRuleSetInheritance { .. } => "CFG_RULESET_CYCLE",
            Self::UnknownBaseRuleSet { .. } => "CFG_RULESET_UNKNOWN_BASE",
            Self::UnknownRuleReferenced { .. } => "CFG_RULE_UNKNOWN",
            Self::DuplicateStageId(_) => "CFG_STAGE_DUPLICATE",
            Self::DanglingPredecessor { .. } => "CFG_STAGE_DANGLING",
            Self::SelfReferentialStage(_) => "CFG_STAGE_SELF",
            Self::CyclicPipeline { .. } => "CFG_PIPELINE_CYCLE",
            Self::DisabledPredecessorOfEnabledStage { .. } => "CFG_STAGE_DISABLED_INPUT",
            Self::InvalidProcessingMode(_) => "CFG_MODE_INVALID",
            Self::UnknownImplementation(_) => "CFG_IMPL_UNKNOWN",
            Self::ImplementationRoleMismatch { .. } => "CFG_IMPL_ROLE",
            Self::InvalidMappingRecord(_) => "CFG_MAPPING_ARITY",
            Self::InvalidPattern { .. } => "CFG_PATTERN_INVALID",
            Self::InvalidGmlVersion(_) => "CFG_GML_VERSION",
            Self::NoTargets => "CFG_NO_TARGETS",
        }
    }
}

fn render_chain(chain: &[RuleSetName]) -> String {
    chain
        .iter()
        .map(RuleSetName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn render_stages(stages: &[StageId]) -> String {
    stages
        .iter()
        .map(StageId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Non-fatal configuration findings collected while loading.
///
/// Every finding is also emitted as a `tracing` warning when it is pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<ConfigError>,
}

impl Diagnostics {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finding.
    pub fn push(&mut self, error: ConfigError) {
        tracing::warn!(code = error.code(), "{error}");
        self.entries.push(error);
    }

    /// Record every finding of another collector.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Iterate over the findings in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &ConfigError> {
        self.entries.iter()
    }

    /// Number of findings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the collector.
    #[must_use]
    pub fn into_vec(self) -> Vec<ConfigError> {
        self.entries
    }
}

impl IntoIterator for Diagnostics {
    type Item = ConfigError;
    type IntoIter = std::vec::IntoIter<ConfigError>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fatality() {
        assert!(
            !ConfigError::UnknownRuleReferenced {
                rule: RuleName::new("rule-x"),
                rule_set: RuleSetName::new("a"),
            }
            .is_fatal()
        );
        assert!(ConfigError::SelfReferentialStage(StageId::new("T1")).is_fatal());
        assert!(ConfigError::InvalidGmlVersion("9.9".to_owned()).is_fatal());
        assert!(
            ConfigError::CyclicRuleSetInheritance {
                rule_set: RuleSetName::new("a"),
                chain: vec![],
            }
            .is_fatal()
        );
    }

    #[test]
    fn renders_cycle_chain() {
        let err = ConfigError::CyclicRuleSetInheritance {
            rule_set: RuleSetName::new("A"),
            chain: vec![RuleSetName::new("a"), RuleSetName::new("b")],
        };
        assert_eq!(err.to_string(), "rule set `a` has cyclic inheritance: a -> b");
    }

    #[test]
    fn renders_pipeline_cycle() {
        let err = ConfigError::CyclicPipeline {
            stages: vec![StageId::new("T1"), StageId::new("T2")],
        };
        assert_eq!(err.to_string(), "cyclic pipeline through transformers: T1 -> T2");
    }

    #[test]
    fn diagnostics_collects_in_order() {
        let mut diags = Diagnostics::new();
        assert!(diags.is_empty());
        diags.push(ConfigError::UnknownRuleReferenced {
            rule: RuleName::new("rule-a"),
            rule_set: RuleSetName::new("x"),
        });
        diags.push(ConfigError::UnknownBaseRuleSet {
            rule_set: RuleSetName::new("x"),
            base: RuleSetName::new("y"),
        });
        assert_eq!(diags.len(), 2);
        let codes: Vec<_> = diags.iter().map(ConfigError::code).collect();
        assert_eq!(codes, vec!["CFG_RULE_UNKNOWN", "CFG_RULESET_UNKNOWN_BASE"]);
    }
}
