//! Parameter values every load starts from.

use modelforge_core::{GmlVersion, TargetKind};
use modelforge_core::constants::{
    PARAM_APP_SCHEMA_NAME, PARAM_APP_SCHEMA_NAME_REGEX, PARAM_APP_SCHEMA_NAMESPACE_REGEX,
    PARAM_DEFAULT_ENCODING_RULE, PARAM_GML_VERSION,
};
use modelforge_parameter::ParameterStore;

/// Global defaults, overridable by the input, dialog and log parameters.
pub const GLOBAL_DEFAULTS: &[(&str, &str)] = &[
    ("reportLevel", "INFO"),
    ("xsltFile", "src/main/resources/xslt/result.xsl"),
    (PARAM_APP_SCHEMA_NAME, ""),
    (PARAM_APP_SCHEMA_NAME_REGEX, ""),
    (PARAM_APP_SCHEMA_NAMESPACE_REGEX, ""),
    ("publicOnly", "true"),
    ("inputFile", "http://shapechange.net/resources/test/test.xmi"),
    ("inputModelType", "XMI10"),
    ("logFile", "log.xml"),
    ("representTaggedValues", ""),
    ("addTaggedValues", ""),
    ("extractSeparator", "--IMPROBABLE--DUMMY--SEPARATOR--"),
    ("definitionSeparator", "-- Definition --"),
    ("descriptionSeparator", "-- Description --"),
    ("nameSeparator", "-- Name --"),
    ("outputDirectory", "."),
    ("sortedSchemaOutput", "true"),
    ("sortedOutput", "true"),
    ("oclConstraintTypeRegex", "(OCL|Invariant)"),
    ("folConstraintTypeRegex", "(SBVR)"),
];

/// Seed `store` with the global defaults and the per-target defaults.
pub fn seed(store: &mut ParameterStore) {
    for (name, value) in GLOBAL_DEFAULTS {
        store.set_global(*name, *value);
    }
    for kind in TargetKind::ALL {
        if let Some(rule) = kind.default_encoding_rule() {
            store.set_scoped(kind.implementation_name(), PARAM_DEFAULT_ENCODING_RULE, rule.as_str());
        }
    }
    store.set_scoped(
        TargetKind::XmlSchema.implementation_name(),
        PARAM_GML_VERSION,
        GmlVersion::default().as_str(),
    );
    tracing::trace!(parameters = store.len(), "seeded standard parameters");
}
