//! The frozen resolution context handed to every stage.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use modelforge_core::constants::{
    PARAM_APP_SCHEMA_NAME, PARAM_APP_SCHEMA_NAME_REGEX, PARAM_APP_SCHEMA_NAMESPACE_REGEX,
};
use modelforge_core::{ProcessMode, RuleName, RuleSetName, StageId, TargetKind};
use modelforge_parameter::{ParameterSource, ParameterStore, ReplacementTable, full_match};
use modelforge_pipeline::{Pipeline, Stage};
use modelforge_rules::{MappingKind, MappingRecord, MappingTables, RuleRegistry};

use crate::descriptor::ConfigurationDescriptor;
use crate::loader::{self, Loaded};
use crate::stage::StageContext;
use crate::settings::Settings;
use crate::vocabulary::{Namespace, PackageInfo, Vocabulary};

/// Everything a stage reads while it runs.
///
/// Built once by [`ResolutionContext::load`] and never mutated afterwards;
/// loading again means building a fresh context. The context is `Send + Sync`
/// and can be shared by stages running on several threads.
#[derive(Debug)]
pub struct ResolutionContext {
    pub(crate) registry: RuleRegistry,
    pub(crate) mappings: MappingTables,
    pub(crate) parameters: ParameterStore,
    pub(crate) vocabulary: Vocabulary,
    pub(crate) target_modes: HashMap<TargetKind, ProcessMode>,
    pub(crate) pipeline: Pipeline,
    /// Per-stage configuration, aligned with `pipeline.stages()`.
    pub(crate) sections: Vec<StageSection>,
    pub(crate) settings: Settings,
}

/// What a stage declared for itself.
#[derive(Debug, Clone, Default)]
pub(crate) struct StageSection {
    pub(crate) parameters: IndexMap<String, String>,
    pub(crate) rule_sets: Vec<RuleSetName>,
    pub(crate) rules: BTreeSet<RuleName>,
}

impl ResolutionContext {
    /// Load a configuration with the built-in implementations.
    ///
    /// `replacements` is applied to every parameter value. It belongs to the
    /// caller so it survives repeated loads.
    pub fn load(
        descriptor: &ConfigurationDescriptor,
        replacements: &ReplacementTable,
    ) -> crate::Result<Loaded> {
        loader::load(descriptor, replacements)
    }

    // --- rules ---

    /// Whether `rule` is part of the rule vocabulary.
    #[must_use]
    pub fn has_rule(&self, rule: &str) -> bool {
        self.registry.has_rule(&RuleName::new(rule))
    }

    /// Whether `rule` is granted on `rule_set` or one of its ancestors.
    #[must_use]
    pub fn rule_applies_under(&self, rule: &str, rule_set: &str) -> bool {
        self.registry
            .rule_applies_under(&RuleName::new(rule), &RuleSetName::new(rule_set))
    }

    /// Chain-aware rule check starting at `rule_set`; same answer as
    /// [`rule_applies_under`](Self::rule_applies_under).
    #[must_use]
    pub fn has_rule_in_chain(&self, rule: &str, rule_set: &str) -> bool {
        self.rule_applies_under(rule, rule_set)
    }

    /// Whether `base` is `rule_set` or one of its ancestors.
    #[must_use]
    pub fn rule_set_matches(&self, rule_set: &str, base: &str) -> bool {
        self.registry
            .rule_set_matches(&RuleSetName::new(rule_set), &RuleSetName::new(base))
    }

    /// The rule registry.
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    // --- mappings ---

    /// Resolve `subject` under `rule_set` in the table of `kind`.
    #[must_use]
    pub fn mapping_for(&self, kind: MappingKind, subject: &str, rule_set: &str) -> Option<&MappingRecord> {
        self.mappings
            .lookup(kind, subject, &RuleSetName::new(rule_set), &self.registry)
    }

    /// Resolve `subject` under `rule_set` in the map entries of `target`.
    #[must_use]
    pub fn target_mapping_for(
        &self,
        target: TargetKind,
        subject: &str,
        rule_set: &str,
    ) -> Option<&MappingRecord> {
        self.mappings.target_overrides().lookup(
            target.implementation_name(),
            subject,
            &RuleSetName::new(rule_set),
            &self.registry,
        )
    }

    /// All mapping tables.
    #[must_use]
    pub fn mappings(&self) -> &MappingTables {
        &self.mappings
    }

    // --- parameters ---

    /// A global parameter.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name)
    }

    /// A parameter of `scope`. Does not fall back to the global value.
    #[must_use]
    pub fn parameter_scoped(&self, scope: &str, name: &str) -> Option<&str> {
        self.parameters.get_scoped(scope, name)
    }

    /// Names of `scope`'s parameters matching `pattern` as a whole.
    pub fn parameter_names_matching(&self, scope: &str, pattern: &str) -> crate::Result<BTreeSet<String>> {
        self.parameters.names_matching(scope, pattern)
    }

    /// The parameter store.
    #[must_use]
    pub fn parameters(&self) -> &ParameterStore {
        &self.parameters
    }

    /// Whether `schema` (in namespace `ns`) is excluded by the schema
    /// selection parameters of `target`, or by the global ones.
    ///
    /// Empty selection parameters select everything.
    pub fn skip_schema(&self, target: Option<TargetKind>, schema: &str, ns: &str) -> crate::Result<bool> {
        let selection = |name: &str| {
            let value = match target {
                Some(kind) => self.parameter_scoped(kind.implementation_name(), name),
                None => self.parameter(name),
            };
            value.filter(|value| !value.is_empty())
        };

        if let Some(wanted) = selection(PARAM_APP_SCHEMA_NAME)
            && wanted != schema
        {
            return Ok(true);
        }
        if let Some(pattern) = selection(PARAM_APP_SCHEMA_NAME_REGEX)
            && !full_match(pattern)?.is_match(schema)
        {
            return Ok(true);
        }
        if let Some(pattern) = selection(PARAM_APP_SCHEMA_NAMESPACE_REGEX)
            && !full_match(pattern)?.is_match(ns)
        {
            return Ok(true);
        }
        Ok(false)
    }

    // --- pipeline ---

    /// The assembled pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Stages that run, in a deterministic topological order.
    #[must_use]
    pub fn execution_order(&self) -> Vec<&Stage> {
        self.pipeline.execution_order()
    }

    /// Id of the input stage.
    #[must_use]
    pub fn input_id(&self) -> &StageId {
        &self.pipeline.input().id
    }

    /// Mode of a target kind. Targets that are not configured are disabled.
    ///
    /// When a kind is configured more than once, a running mode wins over
    /// an earlier `disabled`.
    #[must_use]
    pub fn target_mode(&self, kind: TargetKind) -> ProcessMode {
        self.target_modes
            .get(&kind)
            .copied()
            .unwrap_or(ProcessMode::Disabled)
    }

    /// Context for one stage of [`pipeline`](Self::pipeline).
    ///
    /// Returns `None` if the stage does not belong to this pipeline.
    #[must_use]
    pub fn stage_context<'a>(&'a self, stage: &Stage) -> Option<StageContext<'a>> {
        let position = self.pipeline.stages().iter().position(|s| s == stage)?;
        let stage = &self.pipeline.stages()[position];
        let section = self.sections.get(position)?;
        Some(StageContext::new(self, stage, section))
    }

    /// A context per executed stage, in execution order.
    #[must_use]
    pub fn execution_contexts(&self) -> Vec<StageContext<'_>> {
        self.execution_order()
            .into_iter()
            .filter_map(|stage| self.stage_context(stage))
            .collect()
    }

    // --- vocabulary ---

    /// The well-known stereotype an alias stands for, or the input.
    #[must_use]
    pub fn normalize_stereotype<'a>(&'a self, stereotype: &'a str) -> &'a str {
        self.vocabulary.normalize_stereotype(stereotype)
    }

    /// The well-known tag an alias stands for, or the input.
    #[must_use]
    pub fn normalize_tag<'a>(&'a self, tag: &'a str) -> &'a str {
        self.vocabulary.normalize_tag(tag)
    }

    /// Where a descriptor is read from.
    #[must_use]
    pub fn descriptor_source(&self, descriptor: &str) -> Option<&str> {
        self.vocabulary.descriptor_source(descriptor)
    }

    /// Schema information of a package.
    #[must_use]
    pub fn package_info(&self, package: &str) -> Option<&PackageInfo> {
        self.vocabulary.package_info(package)
    }

    /// The namespace registered under `prefix`.
    #[must_use]
    pub fn namespace_for_prefix(&self, prefix: &str) -> Option<&Namespace> {
        self.vocabulary.namespace_for_prefix(prefix)
    }

    /// A prefix registered for `ns`.
    #[must_use]
    pub fn prefix_for_namespace(&self, ns: &str) -> Option<&str> {
        self.vocabulary.prefix_for_namespace(ns)
    }

    /// Schema location of a namespace.
    #[must_use]
    pub fn schema_location(&self, ns: &str) -> Option<&str> {
        self.vocabulary.schema_location(ns)
    }

    /// Settings derived from the parameters.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
