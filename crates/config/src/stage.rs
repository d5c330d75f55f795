//! Per-stage view of the resolution context.

use std::collections::BTreeSet;

use modelforge_core::constants::PARAM_DEFAULT_ENCODING_RULE;
use modelforge_core::{ProcessMode, RuleName, RuleSetName, TargetKind};
use modelforge_parameter::{ParameterOverlay, ParameterSource};
use modelforge_pipeline::Stage;

use crate::context::{ResolutionContext, StageSection};

/// A stage's parameters layered over the frozen context.
///
/// The stage's own parameters are seeded into an overlay scoped by the
/// stage's implementation name, so concurrent stages never see each other's
/// values. A FOL-to-Schematron target with a `defaultEncodingRule` also
/// overrides the XML-schema default encoding rule, because Schematron
/// generation follows the XML-schema encoding.
#[derive(Debug, Clone)]
pub struct StageContext<'a> {
    context: &'a ResolutionContext,
    stage: &'a Stage,
    section: &'a StageSection,
    parameters: ParameterOverlay<'a>,
}

impl<'a> StageContext<'a> {
    pub(crate) fn new(context: &'a ResolutionContext, stage: &'a Stage, section: &'a StageSection) -> Self {
        let mut parameters = ParameterOverlay::new(context.parameters());
        let scope = stage.scope();
        for (name, value) in &section.parameters {
            parameters.set_scoped(scope, name.as_str(), value.as_str());
        }

        if let Some(target) = stage.as_target()
            && target.kind == TargetKind::Fol2Schematron
            && let Some(rule) = section.parameters.get(PARAM_DEFAULT_ENCODING_RULE)
        {
            parameters.set_scoped(
                TargetKind::XmlSchema.implementation_name(),
                PARAM_DEFAULT_ENCODING_RULE,
                rule.as_str(),
            );
        }

        tracing::trace!(stage = %stage, parameters = section.parameters.len(), "stage context seeded");
        Self {
            context,
            stage,
            section,
            parameters,
        }
    }

    /// The stage.
    #[must_use]
    pub fn stage(&self) -> &'a Stage {
        self.stage
    }

    /// The shared context.
    #[must_use]
    pub fn context(&self) -> &'a ResolutionContext {
        self.context
    }

    /// Processing mode of the stage.
    #[must_use]
    pub fn mode(&self) -> ProcessMode {
        self.stage.mode()
    }

    /// A parameter of this stage.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get_scoped(self.stage.scope(), name)
    }

    /// Names of this stage's parameters matching `pattern` as a whole.
    pub fn parameter_names_matching(&self, pattern: &str) -> crate::Result<BTreeSet<String>> {
        self.parameters.names_matching(self.stage.scope(), pattern)
    }

    /// Every parameter as seen by this stage.
    #[must_use]
    pub fn parameters(&self) -> &ParameterOverlay<'a> {
        &self.parameters
    }

    /// The stage's default encoding rule, if one is set for its scope.
    #[must_use]
    pub fn default_encoding_rule(&self) -> Option<RuleSetName> {
        self.parameter(PARAM_DEFAULT_ENCODING_RULE).map(RuleSetName::new)
    }

    /// Rule sets the stage declared itself.
    pub fn rule_sets(&self) -> impl Iterator<Item = &RuleSetName> {
        self.section.rule_sets.iter()
    }

    /// Whether one of the stage's own rule sets grants `rule`.
    ///
    /// Transformers only see their own rule sets; encoding rules of targets
    /// go through [`ResolutionContext::rule_applies_under`].
    #[must_use]
    pub fn has_rule(&self, rule: &str) -> bool {
        self.section.rules.contains(&RuleName::new(rule))
    }
}
