//! The closed set of stage implementations a configuration may name.
//!
//! Configurations refer to implementations by a fully qualified name. Each
//! built-in kind carries its canonical name; lookups by name go through an
//! implementation registry so unknown names fail at load time with
//! [`ConfigError::UnknownImplementation`](crate::ConfigError::UnknownImplementation).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::keys::{RuleName, RuleSetName};

/// A target: a stage that renders the model into some output representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// GML application schema / XML Schema.
    XmlSchema,
    /// Schematron derived from first-order-logic constraints.
    Fol2Schematron,
    /// JSON Schema.
    JsonSchema,
    /// Feature catalogue documents.
    FeatureCatalogue,
    /// OWL ontology following ISO 19150-2.
    OwlIso19150,
    /// RDF vocabulary.
    Rdf,
    /// SQL DDL.
    SqlDdl,
    /// ArcGIS workspace.
    ArcGisWorkspace,
    /// Replication XML schema.
    ReplicationSchema,
    /// Application schema metadata.
    ApplicationSchemaMetadata,
}

impl TargetKind {
    /// Every built-in target kind.
    pub const ALL: [Self; 10] = [
        Self::XmlSchema,
        Self::Fol2Schematron,
        Self::JsonSchema,
        Self::FeatureCatalogue,
        Self::OwlIso19150,
        Self::Rdf,
        Self::SqlDdl,
        Self::ArcGisWorkspace,
        Self::ReplicationSchema,
        Self::ApplicationSchemaMetadata,
    ];

    /// Canonical fully qualified implementation name.
    #[must_use]
    pub fn implementation_name(&self) -> &'static str {
        match self {
            Self::XmlSchema => "de.interactive_instruments.ShapeChange.Target.XmlSchema.XmlSchema",
            Self::Fol2Schematron => {
                "de.interactive_instruments.ShapeChange.Target.FOL2Schematron.FOL2Schematron"
            }
            Self::JsonSchema => "de.interactive_instruments.ShapeChange.Target.JSON.JsonSchema",
            Self::FeatureCatalogue => {
                "de.interactive_instruments.ShapeChange.Target.FeatureCatalogue.FeatureCatalogue"
            }
            Self::OwlIso19150 => "de.interactive_instruments.ShapeChange.Target.Ontology.OWLISO19150",
            Self::Rdf => "de.interactive_instruments.ShapeChange.Target.Ontology.RDF",
            Self::SqlDdl => "de.interactive_instruments.ShapeChange.Target.SQL.SqlDdl",
            Self::ArcGisWorkspace => {
                "de.interactive_instruments.ShapeChange.Target.ArcGISWorkspace.ArcGISWorkspace"
            }
            Self::ReplicationSchema => {
                "de.interactive_instruments.ShapeChange.Target.ReplicationSchema.ReplicationXmlSchema"
            }
            Self::ApplicationSchemaMetadata => {
                "de.interactive_instruments.ShapeChange.Target.Metadata.ApplicationSchemaMetadata"
            }
        }
    }

    /// The rule-name family owned by this target, if any.
    #[must_use]
    pub fn rule_family(&self) -> Option<&'static str> {
        match self {
            Self::XmlSchema => Some("xsd"),
            Self::JsonSchema => Some("json"),
            Self::FeatureCatalogue => Some("fc"),
            Self::Rdf => Some("rdf"),
            Self::SqlDdl => Some("sql"),
            Self::OwlIso19150 => Some("owl"),
            Self::ArcGisWorkspace => Some("arcgis"),
            Self::ReplicationSchema => Some("rep"),
            Self::ApplicationSchemaMetadata => Some("asm"),
            Self::Fol2Schematron => None,
        }
    }

    /// The target that owns a rule, judged by the rule's family segment.
    #[must_use]
    pub fn for_rule(rule: &RuleName) -> Option<Self> {
        let family = rule.family()?;
        Self::ALL
            .into_iter()
            .find(|kind| kind.rule_family() == Some(family))
    }

    /// Encoding rule the target falls back to when none is configured.
    #[must_use]
    pub fn default_encoding_rule(&self) -> Option<RuleSetName> {
        match self {
            Self::XmlSchema => Some(RuleSetName::new("iso19136_2007")),
            Self::OwlIso19150 => Some(RuleSetName::new("iso19150_2014")),
            Self::SqlDdl => Some(RuleSetName::new("sql")),
            _ => None,
        }
    }

    /// Whether this target consumes XML-schema style map entries.
    #[must_use]
    pub fn uses_xsd_map_entries(&self) -> bool {
        matches!(self, Self::XmlSchema)
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.implementation_name())
    }
}

/// A transformer: a stage that rewrites the model and hands it on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformerKind {
    /// Flattens inheritance, multiplicity and complex types.
    Flattener,
    /// Restricts the model to selected profiles.
    Profiler,
    /// Adjusts names of model elements.
    NamingModifier,
    /// Converts constraints into other constraint representations.
    ConstraintConverter,
    /// Replaces types by configured substitutes.
    TypeConverter,
    /// Passes the model through unchanged.
    Identity,
}

impl TransformerKind {
    /// Every built-in transformer kind.
    pub const ALL: [Self; 6] = [
        Self::Flattener,
        Self::Profiler,
        Self::NamingModifier,
        Self::ConstraintConverter,
        Self::TypeConverter,
        Self::Identity,
    ];

    /// Canonical fully qualified implementation name.
    #[must_use]
    pub fn implementation_name(&self) -> &'static str {
        match self {
            Self::Flattener => "de.interactive_instruments.ShapeChange.Transformation.Flattening.Flattener",
            Self::Profiler => "de.interactive_instruments.ShapeChange.Transformation.Profiling.Profiler",
            Self::NamingModifier => {
                "de.interactive_instruments.ShapeChange.Transformation.Naming.NamingModifier"
            }
            Self::ConstraintConverter => {
                "de.interactive_instruments.ShapeChange.Transformation.Constraints.ConstraintConverter"
            }
            Self::TypeConverter => {
                "de.interactive_instruments.ShapeChange.Transformation.TypeConversion.TypeConverter"
            }
            Self::Identity => {
                "de.interactive_instruments.ShapeChange.Transformation.Identity.IdentityTransform"
            }
        }
    }
}

impl fmt::Display for TransformerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.implementation_name())
    }
}

/// Either kind of stage implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "kind", rename_all = "snake_case")]
pub enum ImplementationKind {
    /// A target implementation.
    Target(TargetKind),
    /// A transformer implementation.
    Transformer(TransformerKind),
}

impl ImplementationKind {
    /// Canonical fully qualified implementation name.
    #[must_use]
    pub fn implementation_name(&self) -> &'static str {
        match self {
            Self::Target(kind) => kind.implementation_name(),
            Self::Transformer(kind) => kind.implementation_name(),
        }
    }
}

impl fmt::Display for ImplementationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.implementation_name())
    }
}
