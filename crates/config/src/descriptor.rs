//! Parsed configuration records.
//!
//! These are what a document parser hands to [`ResolutionContext::load`](crate::ResolutionContext::load).
//! Field names are camelCase on the wire and every section is optional.

use indexmap::IndexMap;
use modelforge_core::ProcessMode;
use serde::{Deserialize, Serialize};

/// A whole configuration: one input, transformers and targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigurationDescriptor {
    /// The input section.
    pub input: InputDescriptor,
    /// Parameters supplied interactively; set globally after the input's.
    pub dialog_parameters: IndexMap<String, String>,
    /// Logging parameters; set globally after the dialog parameters.
    pub log_parameters: IndexMap<String, String>,
    /// Transformers in declaration order.
    pub transformers: Vec<TransformerDescriptor>,
    /// Targets in declaration order.
    pub targets: Vec<TargetDescriptor>,
}

/// The input section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputDescriptor {
    /// Stage id; absent means `INPUT`.
    pub id: Option<String>,
    /// Global parameters.
    pub parameters: IndexMap<String, String>,
    /// Stereotype alias to well-known stereotype.
    pub stereotype_aliases: IndexMap<String, String>,
    /// Tag alias to well-known tag.
    pub tag_aliases: IndexMap<String, String>,
    /// Where descriptors (definition, alias, ...) are read from.
    pub descriptor_sources: Vec<DescriptorSourceDescriptor>,
    /// Per-package schema information.
    pub package_infos: Vec<PackageInfoDescriptor>,
}

/// One `descriptor -> source` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescriptorSourceDescriptor {
    /// Descriptor name, e.g. `definition`.
    pub descriptor: String,
    /// Source kind, e.g. `ea:notes`, `tag` or `sc:extract`.
    pub source: String,
    /// Token for `sc:extract` sources.
    pub token: Option<String>,
    /// Tag for `tag` sources.
    pub tag: Option<String>,
}

/// Schema information attached to a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackageInfoDescriptor {
    /// Package name.
    pub package_name: String,
    /// Target namespace.
    pub ns: String,
    /// Namespace prefix.
    pub nsabr: String,
    /// Schema document name.
    pub xsd_document: String,
    /// Schema version.
    pub version: Option<String>,
}

/// A transformer section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformerDescriptor {
    /// Unique stage id.
    pub id: String,
    /// Implementation name.
    pub implementation: String,
    /// Processing mode; parsed on load.
    pub mode: Option<String>,
    /// Consumed stage; absent means the input.
    pub input: Option<String>,
    /// Parameters of this transformer.
    pub parameters: IndexMap<String, String>,
    /// Rule sets only this transformer uses.
    pub rule_sets: IndexMap<String, RuleSetDescriptor>,
}

/// A target section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetDescriptor {
    /// Implementation name.
    pub implementation: String,
    /// Processing mode; parsed on load.
    pub mode: Option<String>,
    /// Consumed stages; empty means the input.
    pub inputs: Vec<String>,
    /// Parameters, scoped to the implementation.
    pub parameters: IndexMap<String, String>,
    /// Encoding rules declared by this target.
    pub rule_sets: IndexMap<String, RuleSetDescriptor>,
    /// Type mappings for XML-schema targets.
    pub xsd_map_entries: Vec<XsdMapEntryDescriptor>,
    /// Type mappings for other targets.
    pub map_entries: Vec<ProcessMapEntryDescriptor>,
    /// XML namespaces known to XML-schema targets.
    pub namespaces: Vec<XmlNamespaceDescriptor>,
}

/// An encoding rule declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSetDescriptor {
    /// Parent rule set; absent means the root `*`.
    pub extends: Option<String>,
    /// Rules granted on top of the parent's.
    pub additional_rules: Vec<String>,
}

/// How a model type is represented in XML Schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct XsdMapEntryDescriptor {
    /// Model type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Encoding rules the entry applies to.
    pub encoding_rules: Vec<String>,
    /// Property type, or `_P_` / `_MP_` to derive it from the element.
    pub xml_property_type: Option<String>,
    /// Element name.
    pub xml_element: Option<String>,
    /// XML type name.
    pub xml_type: Option<String>,
    /// `simple` or `complex`.
    pub xml_type_type: Option<String>,
    /// `simple` or `complex` content.
    pub xml_type_content: Option<String>,
    /// Whether the type can carry a nil reason.
    pub xml_type_nil_reason: Option<String>,
    /// Attribute name.
    pub xml_attribute: Option<String>,
    /// Attribute group name.
    pub xml_attribute_group: Option<String>,
}

impl XsdMapEntryDescriptor {
    /// `xmlTypeType/xmlTypeContent`, with missing halves left empty.
    #[must_use]
    pub fn type_shape(&self) -> String {
        format!(
            "{}/{}",
            self.xml_type_type.as_deref().unwrap_or_default(),
            self.xml_type_content.as_deref().unwrap_or_default()
        )
    }
}

/// A type mapping for a non-XML-schema target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessMapEntryDescriptor {
    /// Model type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Encoding rule the entry applies to.
    pub rule: String,
    /// Type in the target representation.
    pub target_type: String,
    /// Optional target-specific parameter.
    pub param: Option<String>,
}

/// An XML namespace declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct XmlNamespaceDescriptor {
    /// Prefix.
    pub nsabr: String,
    /// Namespace URI.
    pub ns: String,
    /// Schema location.
    pub location: Option<String>,
}

pub(crate) fn parse_mode(raw: Option<&str>) -> modelforge_core::Result<ProcessMode> {
    raw.map_or(Ok(ProcessMode::Enabled), str::parse)
}
