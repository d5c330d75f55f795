//! Switches derived from parameters once loading is done.

use std::collections::BTreeSet;

use modelforge_core::constants::{
    GML_NS_DEFAULT, PARAM_CONSTRAINT_CREATION_FOR_PROPERTIES, PARAM_EXCLUDED_PACKAGES,
    PARAM_GML_VERSION, PARAM_IGNORE_ENCODING_RULE_TAGGED_VALUES, PARAM_IS_AIXM,
    PARAM_LOAD_CONSTRAINTS_FOR_SELECTED_SCHEMAS_ONLY, PARAM_LOAD_GLOBAL_IDENTIFIERS,
    PARAM_ONLY_DEFERRABLE_OUTPUT_WRITE, PARAM_USE_STRING_INTERNING,
};
use modelforge_core::{ClassCategory, GmlVersion, TargetKind};
use modelforge_parameter::ParameterSource;
use regex::Regex;
use serde::Serialize;

/// Parameter listing the class stereotypes constraints are created for.
pub const PARAM_CLASS_TYPES_TO_CREATE_CONSTRAINTS_FOR: &str = "classTypesToCreateConstraintsFor";

const DEFAULT_LANGUAGE: &str = "en";

/// Derived settings. Read-only after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Create constraints for properties. Off only when set to `false`.
    pub constraint_creation_for_properties: bool,
    /// Ignore encoding rules given as tagged values. On only when set to `true`.
    pub ignore_encoding_rule_tagged_values: bool,
    /// Intern strings while loading the model.
    pub use_string_interning: bool,
    /// Load global identifiers of model elements.
    pub load_global_identifiers: bool,
    /// The model is an AIXM model.
    pub is_aixm: bool,
    /// Load constraints only for the selected application schemas.
    pub load_constraints_for_selected_schemas_only: bool,
    /// Only write deferred output; the model is not read.
    pub only_deferrable_output_write: bool,
    /// Model language, lower case.
    pub language: String,
    /// Class categories to create constraints for; `None` means all.
    pub class_types_to_create_constraints_for: Option<BTreeSet<ClassCategory>>,
    /// Packages the model loader skips.
    pub excluded_packages: BTreeSet<String>,
    /// GML version of the XML-schema encoding.
    pub gml_version: GmlVersion,
    /// The GML namespace, taken from the `gml` prefix when one is configured.
    pub gml_ns: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            constraint_creation_for_properties: true,
            ignore_encoding_rule_tagged_values: false,
            use_string_interning: false,
            load_global_identifiers: false,
            is_aixm: false,
            load_constraints_for_selected_schemas_only: false,
            only_deferrable_output_write: false,
            language: DEFAULT_LANGUAGE.to_owned(),
            class_types_to_create_constraints_for: None,
            excluded_packages: BTreeSet::new(),
            gml_version: GmlVersion::default(),
            gml_ns: GML_NS_DEFAULT.to_owned(),
        }
    }
}

impl Settings {
    /// Derive from the global parameters; `language` comes from the input section.
    ///
    /// The GML version is the one of the XML-schema target. Fails with
    /// [`ConfigError::InvalidGmlVersion`](modelforge_core::ConfigError::InvalidGmlVersion)
    /// if it is not supported.
    pub fn derive(parameters: &impl ParameterSource, language: Option<&str>) -> crate::Result<Self> {
        let flag = |name: &str, expected: &str| {
            parameters
                .get(name)
                .is_some_and(|value| value.trim().eq_ignore_ascii_case(expected))
        };
        let gml_version = parameters
            .get_scoped(TargetKind::XmlSchema.implementation_name(), PARAM_GML_VERSION)
            .map(str::parse::<GmlVersion>)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            constraint_creation_for_properties: !flag(PARAM_CONSTRAINT_CREATION_FOR_PROPERTIES, "false"),
            ignore_encoding_rule_tagged_values: flag(PARAM_IGNORE_ENCODING_RULE_TAGGED_VALUES, "true"),
            use_string_interning: flag(PARAM_USE_STRING_INTERNING, "true"),
            load_global_identifiers: flag(PARAM_LOAD_GLOBAL_IDENTIFIERS, "true"),
            is_aixm: flag(PARAM_IS_AIXM, "true"),
            load_constraints_for_selected_schemas_only: flag(
                PARAM_LOAD_CONSTRAINTS_FOR_SELECTED_SCHEMAS_ONLY,
                "true",
            ),
            only_deferrable_output_write: flag(PARAM_ONLY_DEFERRABLE_OUTPUT_WRITE, "true"),
            language: language
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map_or_else(|| DEFAULT_LANGUAGE.to_owned(), str::to_lowercase),
            class_types_to_create_constraints_for: parameters
                .get(PARAM_CLASS_TYPES_TO_CREATE_CONSTRAINTS_FOR)
                .and_then(split_categories),
            excluded_packages: parameters
                .get(PARAM_EXCLUDED_PACKAGES)
                .map(split_packages)
                .unwrap_or_default(),
            gml_version,
            gml_ns: GML_NS_DEFAULT.to_owned(),
        })
    }

    /// Replace the GML namespace if `ns` is given.
    #[must_use]
    pub fn with_gml_namespace(mut self, ns: Option<&str>) -> Self {
        if let Some(ns) = ns {
            self.gml_ns = ns.to_owned();
        }
        self
    }

    /// Whether constraints are created for classes with `stereotype`.
    ///
    /// Stereotypes are compared by [`ClassCategory`], so `ADEElement` counts
    /// as `FeatureType` and two unknown stereotypes count as the same.
    #[must_use]
    pub fn creates_constraints_for(&self, stereotype: &str) -> bool {
        self.creates_constraints_for_category(ClassCategory::from_stereotype(stereotype))
    }

    /// Whether constraints are created for classes of `category`.
    #[must_use]
    pub fn creates_constraints_for_category(&self, category: ClassCategory) -> bool {
        self.class_types_to_create_constraints_for
            .as_ref()
            .is_none_or(|categories| categories.contains(&category))
    }

    /// Whether the model loader skips `package`.
    #[must_use]
    pub fn is_excluded_package(&self, package: &str) -> bool {
        self.excluded_packages.contains(package)
    }
}

fn split_categories(raw: &str) -> Option<BTreeSet<ClassCategory>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let separator = Regex::new(r"\W*,\W*").ok()?;
    Some(
        separator
            .split(raw)
            .filter(|part| !part.is_empty())
            .map(ClassCategory::from_stereotype)
            .collect(),
    )
}

fn split_packages(raw: &str) -> BTreeSet<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return BTreeSet::new();
    }
    raw.split(',').map(|package| package.trim().to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelforge_parameter::ParameterStore;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn derive(store: &ParameterStore) -> Settings {
        Settings::derive(store, None).unwrap()
    }

    fn with_class_types(raw: &str) -> Settings {
        let mut store = ParameterStore::new();
        store.set_global(PARAM_CLASS_TYPES_TO_CREATE_CONSTRAINTS_FOR, raw);
        derive(&store)
    }

    #[test]
    fn defaults_without_parameters() {
        let settings = derive(&ParameterStore::new());
        assert_eq!(settings, Settings::default());
        assert!(settings.creates_constraints_for("FeatureType"));
        assert_eq!(settings.gml_version, GmlVersion::V3_2);
        assert_eq!(settings.gml_ns, "http://www.opengis.net/gml/3.2");
        assert!(settings.excluded_packages.is_empty());
    }

    #[rstest]
    #[case(" FALSE ", false)]
    #[case("no", true)]
    #[case("true", true)]
    fn constraint_creation_switch(#[case] raw: &str, #[case] expected: bool) {
        let mut store = ParameterStore::new();
        store.set_global(PARAM_CONSTRAINT_CREATION_FOR_PROPERTIES, raw);
        assert_eq!(derive(&store).constraint_creation_for_properties, expected);
    }

    #[test]
    fn enables_opt_in_switches() {
        let mut store = ParameterStore::new();
        store.set_global(PARAM_USE_STRING_INTERNING, "True");
        store.set_global(PARAM_LOAD_GLOBAL_IDENTIFIERS, " true ");
        store.set_global(PARAM_IGNORE_ENCODING_RULE_TAGGED_VALUES, "yes");
        store.set_global(PARAM_IS_AIXM, "TRUE");
        store.set_global(PARAM_LOAD_CONSTRAINTS_FOR_SELECTED_SCHEMAS_ONLY, "true");
        store.set_global(PARAM_ONLY_DEFERRABLE_OUTPUT_WRITE, "false");
        let settings = Settings::derive(&store, Some(" DE ")).unwrap();
        assert!(settings.use_string_interning);
        assert!(settings.load_global_identifiers);
        assert!(!settings.ignore_encoding_rule_tagged_values);
        assert!(settings.is_aixm);
        assert!(settings.load_constraints_for_selected_schemas_only);
        assert!(!settings.only_deferrable_output_write);
        assert_eq!(settings.language, "de");
    }

    #[test]
    fn blank_language_keeps_default() {
        assert_eq!(
            Settings::derive(&ParameterStore::new(), Some("  ")).unwrap().language,
            "en"
        );
    }

    #[test]
    fn class_types_become_categories() {
        let settings = with_class_types("FeatureType , DataType,union");
        assert_eq!(
            settings.class_types_to_create_constraints_for,
            Some(BTreeSet::from([
                ClassCategory::Feature,
                ClassCategory::DataType,
                ClassCategory::Union,
            ]))
        );
        assert!(settings.creates_constraints_for("DataType"));
        assert!(settings.creates_constraints_for_category(ClassCategory::Union));
        assert!(!settings.creates_constraints_for("codelist"));
    }

    #[rstest]
    #[case("FeatureType", "ADEElement", true)]
    #[case("adeelement", "FeatureType", true)]
    #[case("foo", "bar", true)]
    #[case("Type", "type", true)]
    #[case("interface", "Type", false)]
    #[case("foo", "FeatureType", false)]
    fn stereotypes_compare_by_category(
        #[case] configured: &str,
        #[case] stereotype: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(with_class_types(configured).creates_constraints_for(stereotype), expected);
    }

    #[test]
    fn excluded_packages_split_on_commas() {
        let mut store = ParameterStore::new();
        store.set_global(PARAM_EXCLUDED_PACKAGES, " Drafts, Old Stuff ,Tests ");
        let settings = derive(&store);
        assert_eq!(
            settings.excluded_packages,
            BTreeSet::from(["Drafts".to_owned(), "Old Stuff".to_owned(), "Tests".to_owned()])
        );
        assert!(settings.is_excluded_package("Old Stuff"));
        assert!(!settings.is_excluded_package("drafts"));
    }

    #[test]
    fn gml_version_comes_from_the_xml_schema_target() {
        let xsd = TargetKind::XmlSchema.implementation_name();
        let mut store = ParameterStore::new();
        store.set_scoped(xsd, PARAM_GML_VERSION, "3.3");
        assert_eq!(derive(&store).gml_version, GmlVersion::V3_3);

        store.set_scoped(xsd, PARAM_GML_VERSION, "9.9");
        let err = Settings::derive(&store, None).unwrap_err();
        assert_eq!(err.code(), "CFG_GML_VERSION");
    }

    #[test]
    fn gml_namespace_follows_the_gml_prefix() {
        let settings = Settings::default().with_gml_namespace(Some("http://www.opengis.net/gml"));
        assert_eq!(settings.gml_ns, "http://www.opengis.net/gml");
        let settings = Settings::default().with_gml_namespace(None);
        assert_eq!(settings.gml_ns, "http://www.opengis.net/gml/3.2");
    }
}
