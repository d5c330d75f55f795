//! Well-known identifiers and parameter names.

/// Stage id of the input when the configuration does not name one.
pub const INPUT_ID: &str = "INPUT";

/// Name of the implicit base rule set every other rule set extends.
pub const ROOT_RULE_SET: &str = "*";

/// Parameter naming the encoding rule a target uses when a model element
/// carries none.
pub const PARAM_DEFAULT_ENCODING_RULE: &str = "defaultEncodingRule";

/// Parameter selecting a single application schema by name.
pub const PARAM_APP_SCHEMA_NAME: &str = "appSchemaName";

/// Parameter selecting application schemas by a name pattern.
pub const PARAM_APP_SCHEMA_NAME_REGEX: &str = "appSchemaNameRegex";

/// Parameter selecting application schemas by a namespace pattern.
pub const PARAM_APP_SCHEMA_NAMESPACE_REGEX: &str = "appSchemaNamespaceRegex";

/// Input parameter selecting the model language.
pub const PARAM_LANGUAGE: &str = "language";

/// Parameter switching off constraint creation for properties.
pub const PARAM_CONSTRAINT_CREATION_FOR_PROPERTIES: &str = "constraintCreationForProperties";

/// Parameter telling targets to ignore encoding rules set as tagged values.
pub const PARAM_IGNORE_ENCODING_RULE_TAGGED_VALUES: &str = "ignoreEncodingRuleTaggedValues";

/// Parameter enabling string interning in the model loader.
pub const PARAM_USE_STRING_INTERNING: &str = "useStringInterning";

/// Parameter enabling loading of global identifiers.
pub const PARAM_LOAD_GLOBAL_IDENTIFIERS: &str = "loadGlobalIdentifiers";

/// Parameter selecting the GML version of XML-schema encodings.
pub const PARAM_GML_VERSION: &str = "gmlVersion";

/// Input parameter marking the model as AIXM.
pub const PARAM_IS_AIXM: &str = "isAIXM";

/// Input parameter listing packages the model loader skips, comma separated.
pub const PARAM_EXCLUDED_PACKAGES: &str = "excludedPackages";

/// Input parameter limiting constraint loading to the selected schemas.
pub const PARAM_LOAD_CONSTRAINTS_FOR_SELECTED_SCHEMAS_ONLY: &str =
    "loadConstraintsForSelectedSchemasOnly";

/// Input parameter restricting a run to deferrable output writing.
pub const PARAM_ONLY_DEFERRABLE_OUTPUT_WRITE: &str = "onlyDeferrableOutputWrite";

/// Namespace prefix whose namespace replaces the default GML namespace.
pub const GML_PREFIX: &str = "gml";

/// GML namespace used when no `gml` namespace is configured.
pub const GML_NS_DEFAULT: &str = "http://www.opengis.net/gml/3.2";

/// First field of a mapping record that maps a type directly.
pub const MAPPING_DIRECT: &str = "direct";

/// First field of a type mapping that points at a property type element.
pub const MAPPING_PROPERTY_TYPE: &str = "propertyType";

/// First field of a type mapping that points at a metadata property type element.
pub const MAPPING_METADATA_PROPERTY_TYPE: &str = "metadataPropertyType";
