//! Populating a [`ResolutionContext`] from descriptors.
//!
//! Loading runs in a fixed order:
//!
//! 1. the standard rule vocabulary and the standard parameter defaults
//! 2. input, dialog and log parameters (global, in that order)
//! 3. targets: modes, scoped parameters, encoding rules of non-disabled
//!    targets, namespaces and map entries
//! 4. transformers
//! 5. registry validation, then pipeline assembly
//! 6. derived settings
//!
//! Every parameter section is checked for an unsupported `gmlVersion`.
//!
//! Fatal errors abort the load; everything else ends up in [`Diagnostics`].

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use modelforge_core::constants::{
    GML_PREFIX, MAPPING_DIRECT, MAPPING_METADATA_PROPERTY_TYPE, MAPPING_PROPERTY_TYPE,
    PARAM_GML_VERSION, PARAM_LANGUAGE,
};
use modelforge_core::{Diagnostics, GmlVersion, ProcessMode, RuleName, RuleSetName, TargetKind};
use modelforge_parameter::{ParameterStore, ReplacementTable};
use modelforge_pipeline::{InputStage, TargetStage, TransformerStage, assemble};
use modelforge_rules::{MappingKind, MappingRecord, MappingTables, RuleRegistry};

use crate::context::{ResolutionContext, StageSection};
use crate::defaults;
use crate::descriptor::{
    ConfigurationDescriptor, RuleSetDescriptor, TargetDescriptor, XsdMapEntryDescriptor,
    parse_mode,
};
use crate::implementation::ImplementationRegistry;
use crate::settings::Settings;
use crate::vocabulary::Vocabulary;

/// A loaded context and the non-fatal findings of the load.
#[derive(Debug)]
pub struct Loaded {
    /// The frozen context.
    pub context: ResolutionContext,
    /// Non-fatal findings, in the order they were made.
    pub diagnostics: Diagnostics,
}

/// Load with the built-in implementations.
pub fn load(
    descriptor: &ConfigurationDescriptor,
    replacements: &ReplacementTable,
) -> crate::Result<Loaded> {
    load_with(descriptor, replacements, &ImplementationRegistry::with_builtins())
}

/// Load, resolving implementation names through `implementations`.
pub fn load_with(
    descriptor: &ConfigurationDescriptor,
    replacements: &ReplacementTable,
    implementations: &ImplementationRegistry,
) -> crate::Result<Loaded> {
    let mut builder = Builder::new(replacements);

    builder.global_parameters(&descriptor.input.parameters)?;
    builder.global_parameters(&descriptor.dialog_parameters)?;
    builder.global_parameters(&descriptor.log_parameters)?;
    builder.vocabulary.add_input(&descriptor.input);

    let mut targets = Vec::with_capacity(descriptor.targets.len());
    let mut target_sections = Vec::with_capacity(descriptor.targets.len());
    for target in &descriptor.targets {
        let kind = implementations.resolve_target(&target.implementation)?;
        let mode = parse_mode(target.mode.as_deref())?;
        builder.target(kind, mode, target)?;

        let stage = target
            .inputs
            .iter()
            .fold(TargetStage::new(kind).with_mode(mode), |stage, input| {
                stage.with_predecessor(input.as_str())
            });
        targets.push(stage);
        target_sections.push(StageSection::new(&target.parameters, &target.rule_sets));
    }

    let mut transformers = Vec::with_capacity(descriptor.transformers.len());
    let mut transformer_sections = Vec::with_capacity(descriptor.transformers.len());
    for transformer in &descriptor.transformers {
        let kind = implementations.resolve_transformer(&transformer.implementation)?;
        let mode = parse_mode(transformer.mode.as_deref())?;
        check_gml_version(&transformer.parameters)?;
        let mut stage = TransformerStage::new(transformer.id.as_str(), kind).with_mode(mode);
        if let Some(input) = transformer.input.as_deref() {
            stage = stage.with_predecessor(input);
        }
        transformers.push(stage);
        transformer_sections.push(StageSection::new(
            &transformer.parameters,
            &transformer.rule_sets,
        ));
    }

    let mut diagnostics = builder.diagnostics;
    diagnostics.extend(builder.registry.validate()?);

    let input = match descriptor.input.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => InputStage::new(id),
        _ => InputStage::default(),
    };
    let pipeline = assemble(input, transformers, targets)?;

    let mut sections = Vec::with_capacity(pipeline.len());
    sections.push(StageSection::default());
    sections.extend(transformer_sections);
    sections.extend(target_sections);

    let settings = Settings::derive(
        &builder.parameters,
        descriptor.input.parameters.get(PARAM_LANGUAGE).map(String::as_str),
    )?
    .with_gml_namespace(
        builder
            .vocabulary
            .namespace_for_prefix(GML_PREFIX)
            .map(|namespace| namespace.ns.as_str()),
    );

    tracing::debug!(
        rule_sets = builder.registry.rule_set_names().count(),
        mappings = builder.mappings.len(),
        parameters = builder.parameters.len(),
        stages = pipeline.len(),
        diagnostics = diagnostics.len(),
        "configuration loaded"
    );

    Ok(Loaded {
        context: ResolutionContext {
            registry: builder.registry,
            mappings: builder.mappings,
            parameters: builder.parameters,
            vocabulary: builder.vocabulary,
            target_modes: builder.target_modes,
            pipeline,
            sections,
            settings,
        },
        diagnostics,
    })
}

/// Mutable state of the population phase.
struct Builder {
    registry: RuleRegistry,
    mappings: MappingTables,
    parameters: ParameterStore,
    vocabulary: Vocabulary,
    target_modes: HashMap<TargetKind, ProcessMode>,
    diagnostics: Diagnostics,
}

impl Builder {
    fn new(replacements: &ReplacementTable) -> Self {
        let mut parameters = ParameterStore::with_replacements(replacements.clone());
        defaults::seed(&mut parameters);
        Self {
            registry: RuleRegistry::with_standard_rules(),
            mappings: MappingTables::new(),
            parameters,
            vocabulary: Vocabulary::new(),
            target_modes: HashMap::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    fn global_parameters(&mut self, parameters: &IndexMap<String, String>) -> crate::Result<()> {
        check_gml_version(parameters)?;
        for (name, value) in parameters {
            self.parameters.set_global(name.as_str(), value.as_str());
        }
        Ok(())
    }

    fn target(
        &mut self,
        kind: TargetKind,
        mode: ProcessMode,
        target: &TargetDescriptor,
    ) -> crate::Result<()> {
        check_gml_version(&target.parameters)?;
        match self.target_modes.get(&kind).copied() {
            None => {
                self.target_modes.insert(kind, mode);
            }
            Some(existing) if existing.is_disabled() => {
                tracing::debug!(target_kind = %kind, %mode, "repeated target replaces disabled entry");
                self.target_modes.insert(kind, mode);
            }
            Some(existing) => {
                tracing::debug!(target_kind = %kind, kept = %existing, "repeated target keeps earlier mode");
            }
        }

        if !mode.is_disabled() {
            for (name, rule_set) in &target.rule_sets {
                self.rule_set(name, rule_set);
            }
        }

        let scope = kind.implementation_name();
        for (name, value) in &target.parameters {
            if let Some(previous) = self.parameters.set_scoped(scope, name.as_str(), value.as_str())
                && previous != *value
            {
                tracing::debug!(target_kind = %kind, parameter = %name, %previous, "target parameter overridden");
            }
        }

        if kind.uses_xsd_map_entries() {
            for namespace in &target.namespaces {
                self.vocabulary.add_namespace(namespace);
            }
            for entry in &target.xsd_map_entries {
                self.xsd_map_entry(entry)?;
            }
        } else {
            for entry in &target.map_entries {
                let mut fields = vec![entry.rule.clone(), entry.target_type.clone()];
                fields.extend(entry.param.clone());
                let record = MappingRecord::from_fields(fields)?;
                self.mappings.target_overrides_mut().put(
                    scope,
                    entry.type_name.as_str(),
                    entry.rule.as_str(),
                    record,
                );
            }
        }
        Ok(())
    }

    fn rule_set(&mut self, name: &str, rule_set: &RuleSetDescriptor) {
        let extends = rule_set.extends.as_deref().map(RuleSetName::new);
        let found = self.registry.declare_rule_set(
            RuleSetName::new(name),
            extends,
            rule_set.additional_rules.iter().map(String::as_str),
        );
        self.diagnostics.extend(found);
    }

    fn xsd_map_entry(&mut self, entry: &XsdMapEntryDescriptor) -> crate::Result<()> {
        let subject = entry.type_name.as_str();
        let shape = entry.type_shape();
        for rule in &entry.encoding_rules {
            let rule_set = RuleSetName::new(rule);

            if let Some(property_type) = entry.xml_property_type.as_deref() {
                let fields = match (property_type, entry.xml_element.as_deref()) {
                    ("_P_", Some(element)) => vec![MAPPING_PROPERTY_TYPE, element],
                    ("_MP_", Some(element)) => vec![MAPPING_METADATA_PROPERTY_TYPE, element],
                    _ => {
                        let mut fields = vec![MAPPING_DIRECT, property_type, shape.as_str()];
                        fields.extend(entry.xml_type_nil_reason.as_deref());
                        fields
                    }
                };
                self.put(MappingKind::PropertyType, subject, &rule_set, MappingRecord::from_fields(fields)?);
            }
            if let Some(element) = entry.xml_element.as_deref() {
                let record = MappingRecord::from_fields([MAPPING_DIRECT, element])?;
                self.put(MappingKind::Element, subject, &rule_set, record);
            }
            if let Some(xml_type) = entry.xml_type.as_deref() {
                let record = MappingRecord::from_fields([MAPPING_DIRECT, xml_type, shape.as_str()])?;
                self.put(MappingKind::BaseType, subject, &rule_set, record);
            }
            if let Some(attribute) = entry.xml_attribute.as_deref() {
                self.put(MappingKind::Attribute, subject, &rule_set, MappingRecord::single(attribute));
            }
            if let Some(group) = entry.xml_attribute_group.as_deref() {
                self.put(MappingKind::AttributeGroup, subject, &rule_set, MappingRecord::single(group));
            }
        }
        Ok(())
    }

    fn put(&mut self, kind: MappingKind, subject: &str, rule_set: &RuleSetName, record: MappingRecord) {
        if self
            .mappings
            .table_mut(kind)
            .put(subject, rule_set.clone(), record)
            .is_some()
        {
            tracing::debug!(%kind, subject, %rule_set, "map entry replaced");
        }
    }
}

/// Reject a section whose `gmlVersion` is not a supported version.
fn check_gml_version(parameters: &IndexMap<String, String>) -> crate::Result<()> {
    if let Some(version) = parameters.get(PARAM_GML_VERSION) {
        version.parse::<GmlVersion>()?;
    }
    Ok(())
}

impl StageSection {
    fn new(
        parameters: &IndexMap<String, String>,
        rule_sets: &IndexMap<String, RuleSetDescriptor>,
    ) -> Self {
        let rules: BTreeSet<RuleName> = rule_sets
            .values()
            .flat_map(|rule_set| rule_set.additional_rules.iter().map(RuleName::new))
            .collect();
        Self {
            parameters: parameters.clone(),
            rule_sets: rule_sets.keys().map(RuleSetName::new).collect(),
            rules,
        }
    }
}
