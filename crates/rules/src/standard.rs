//! Built-in rule vocabulary and encoding rules.
//!
//! Every configuration load starts from [`RuleRegistry::with_standard_rules`],
//! so rules granted by configured rule sets can be checked against a known
//! vocabulary.

use modelforge_core::RuleSetName;

use crate::registry::RuleRegistry;

/// Rules granted on the root rule set `*`.
pub const CORE_RULES: &[&str] = &[
    "req-xsd-pkg-xsdDocument-unique",
    "req-xsd-cls-name-unique",
    "req-xsd-cls-ncname",
    "req-xsd-prop-data-type",
    "req-xsd-prop-value-type-exists",
    "req-xsd-prop-ncname",
    "rule-xsd-pkg-contained-packages",
    "rule-xsd-pkg-dependencies",
    "rule-xsd-cls-union-as-choice",
    "rule-xsd-cls-unknown-as-object",
    "rule-xsd-cls-sequence",
    "rule-xsd-cls-object-element",
    "rule-xsd-cls-type",
    "rule-xsd-cls-property-type",
    "rule-xsd-cls-local-properties",
    "rule-arcgis-prop-initialValueByAlias",
];

const GML_COMMON: &[&str] = &[
    "req-xsd-cls-generalization-consistent",
    "rule-xsd-all-naming-gml",
    "rule-xsd-cls-global-enumeration",
    "rule-xsd-cls-standard-gml-property-types",
    "rule-xsd-cls-noPropertyType",
    "rule-xsd-cls-byValuePropertyType",
    "rule-xsd-pkg-gmlProfileSchema",
    "rule-xsd-prop-targetElement",
    "rule-xsd-prop-reverseProperty",
    "rule-xsd-prop-defaultCodeSpace",
    "rule-xsd-prop-inlineOrByReference",
];

const ISO19136_2007: &[&str] = &["rule-xsd-cls-codelist-asDictionary"];

const GML33: &[&str] = &[
    "rule-xsd-cls-codelist-asDictionaryGml33",
    "rule-xsd-rel-association-classes",
];

const ISO19139_2007: &[&str] = &[
    "rule-xsd-cls-enum-object-element",
    "rule-xsd-cls-enum-property-type",
    "rule-xsd-cls-global-enumeration",
    "rule-xsd-cls-standard-19139-property-types",
    "rule-xsd-all-naming-19139",
];

const OGC_SWE_COMMON2: &[&str] = &[
    "req-xsd-cls-generalization-consistent",
    "rule-xsd-all-naming-swe",
    "rule-xsd-cls-global-enumeration",
    "rule-xsd-cls-codelist-asDictionary",
    "rule-xsd-cls-standard-swe-property-types",
    "rule-xsd-cls-noPropertyType",
    "rule-xsd-cls-byValuePropertyType",
    "rule-xsd-pkg-gmlProfileSchema",
    "rule-xsd-prop-targetElement",
    "rule-xsd-prop-reverseProperty",
    "rule-xsd-prop-defaultCodeSpace",
    "rule-xsd-prop-inlineOrByReference",
    "rule-xsd-prop-xsdAsAttribute",
    "rule-xsd-prop-soft-typed",
    "rule-xsd-cls-union-as-group-property-type",
    "rule-xsd-prop-initialValue",
];

const GML21: &[&str] = &["rule-xsd-all-gml21", "rule-xsd-cls-codelist-anonymous-xlink"];

const SQL: &[&str] = &["rule-sql-cls-feature-types"];

/// A built-in encoding rule: name, parent and the rule groups it grants.
pub struct StandardEncodingRule {
    /// Rule set name.
    pub name: &'static str,
    /// Parent rule set name.
    pub extends: &'static str,
    /// Granted rules, possibly split over several shared groups.
    pub grants: &'static [&'static [&'static str]],
}

/// Built-in encoding rules in declaration order.
pub const ENCODING_RULES: &[StandardEncodingRule] = &[
    StandardEncodingRule {
        name: "iso19136_2007",
        extends: "*",
        grants: &[GML_COMMON, ISO19136_2007],
    },
    StandardEncodingRule {
        name: "gml33",
        extends: "*",
        grants: &[GML_COMMON, GML33],
    },
    StandardEncodingRule {
        name: "iso19139_2007",
        extends: "*",
        grants: &[ISO19139_2007],
    },
    StandardEncodingRule {
        name: "ogcSweCommon2",
        extends: "*",
        grants: &[OGC_SWE_COMMON2],
    },
    StandardEncodingRule {
        name: "gml21",
        extends: "iso19136_2007",
        grants: &[GML21],
    },
    StandardEncodingRule {
        name: "geoservices",
        extends: "*",
        grants: &[],
    },
    StandardEncodingRule {
        name: "geoservices_extended",
        extends: "*",
        grants: &[],
    },
    StandardEncodingRule {
        name: "sql",
        extends: "*",
        grants: &[SQL],
    },
    StandardEncodingRule {
        name: "iso19150_2014",
        extends: "*",
        grants: &[],
    },
];

/// Known rules not granted by any built-in encoding rule.
pub const OPTIONAL_RULES: &[&str] = &[
    // requirements
    "req-all-all-documentation",
    "req-all-prop-sequenceNumber",
    "req-xsd-pkg-targetNamespace",
    "req-xsd-pkg-xmlns",
    "req-xsd-pkg-namespace-schema-only",
    "rec-xsd-pkg-version",
    "req-xsd-pkg-xsdDocument",
    "req-xsd-pkg-dependencies",
    "req-xsd-cls-codelist-asDictionary-true",
    "req-xsd-cls-codelist-extensibility-values",
    "req-xsd-cls-codelist-extensibility-vocabulary",
    "req-xsd-cls-codelist-no-supertypes",
    "req-xsd-cls-datatype-noPropertyType",
    "req-xsd-cls-enum-no-supertypes",
    "req-xsd-cls-mixin-supertypes",
    "req-xsd-cls-mixin-supertypes-overrule",
    "req-xsd-cls-objecttype-byValuePropertyType",
    "req-xsd-cls-objecttype-noPropertyType",
    "req-xsd-cls-suppress-no-properties",
    "req-xsd-cls-suppress-subtype",
    "req-xsd-cls-suppress-supertype",
    "req-xsd-prop-codelist-obligation",
    // xml schema conversion
    "rule-xsd-all-notEncoded",
    "rule-xsd-cls-adeelement",
    "rule-xsd-cls-basictype",
    "rule-xsd-cls-codelist-constraints",
    "rule-xsd-cls-enum-subtypes",
    "rule-xsd-cls-enum-supertypes",
    "rule-xsd-cls-mixin-classes-as-group",
    "rule-xsd-cls-mixin-classes",
    "rule-xsd-cls-mixin-classes-non-mixin-supertypes",
    "rule-xsd-cls-no-abstract-classes",
    "rule-xsd-cls-no-base-class",
    "rule-xsd-cls-no-gml-types",
    "rule-xsd-cls-okstra-fid",
    "rule-xsd-cls-okstra-lifecycle",
    "rule-xsd-cls-okstra-schluesseltabelle",
    "rule-xsd-cls-suppress",
    "rule-xsd-cls-union-asCharacterString",
    "rule-xsd-cls-union-asGroup",
    "rule-xsd-cls-union-direct",
    "rule-xsd-cls-union-direct-optionality",
    "rule-xsd-prop-att-map-entry",
    "rule-xsd-prop-exclude-derived",
    "rule-xsd-prop-length-size-pattern",
    "rule-xsd-prop-nillable",
    "rule-xsd-prop-nilReasonAllowed",
    "rule-xsd-prop-gmlArrayProperty",
    "rule-xsd-prop-gmlListProperty",
    "rule-xsd-prop-qualified-associations",
    "rule-xsd-all-no-documentation",
    "rule-xsd-cls-local-enumeration",
    "rule-xsd-cls-local-basictype",
    "rule-xsd-pkg-dgiwgsp",
    "rule-xsd-pkg-schematron",
    "rule-xsd-all-tagged-values",
    "rule-xsd-cls-adehook",
    "rule-all-cls-aixmDatatype",
    "rule-all-prop-uomAsAttribute",
    // rdf
    "rule-rdf-prop-parent",
    // sql
    "rule-sql-cls-object-types",
    "rule-sql-cls-references-to-external-types",
    "rule-sql-all-associativetables",
    "rule-sql-prop-exclude-derived",
    "rule-sql-cls-data-types",
    "rule-sql-prop-check-constraints-for-enumerations",
    // owl
    "rule-owl-pkg-singleOntologyPerSchema",
    "rule-owl-pkg-pathInOntologyName",
    "rule-owl-all-constraints",
    "rule-owl-cls-geosparql-features",
    "rule-owl-cls-19150-2-features",
    "rule-owl-cls-codelist-external",
    "rule-owl-prop-suppress-cardinality-restrictions",
    "rule-owl-prop-suppress-allValuesFrom-restrictions",
    "rule-owl-prop-voidable-as-minCardinality0",
    "rule-owl-all-suppress-dc-source",
    "rule-owl-prop-suppress-asociation-names",
    "rule-owl-pkg-app-schema-code",
    // replication schema
    "rule-rep-prop-optional",
    "rule-rep-prop-exclude-derived",
    "rule-rep-cls-generate-objectidentifier",
    "rule-rep-prop-maxLength-from-size",
    // application schema metadata
    "rule-asm-all-identify-profiles",
];

impl RuleRegistry {
    /// A registry preloaded with the built-in vocabulary and encoding rules.
    #[must_use]
    pub fn with_standard_rules() -> Self {
        let mut registry = Self::new();

        for rule in CORE_RULES {
            registry.declare_rule(*rule);
            registry.grant(*rule, RuleSetName::root());
        }

        for encoding_rule in ENCODING_RULES {
            let granted = encoding_rule.grants.iter().flat_map(|group| group.iter());
            for rule in granted.clone() {
                registry.declare_rule(*rule);
            }
            let diagnostics = registry.declare_rule_set(
                encoding_rule.name,
                Some(RuleSetName::new(encoding_rule.extends)),
                granted.copied(),
            );
            debug_assert!(diagnostics.is_empty());
        }

        for rule in OPTIONAL_RULES {
            registry.declare_rule(*rule);
        }

        tracing::debug!(
            rules = registry.rule_count(),
            rule_sets = ENCODING_RULES.len(),
            "loaded standard rule vocabulary"
        );
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::RuleSetChain;
    use modelforge_core::RuleName;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn standard_registry_validates_cleanly() {
        let registry = RuleRegistry::with_standard_rules();
        assert!(registry.validate().unwrap().is_empty());
    }

    #[test]
    fn gml21_chain() {
        let registry = RuleRegistry::with_standard_rules();
        let gml21 = RuleSetName::new("gml21");
        let chain: Vec<&str> = registry
            .ancestors_of(&gml21)
            .map(RuleSetName::as_str)
            .collect();
        assert_eq!(chain, vec!["gml21", "iso19136_2007", "*"]);
    }

    #[rstest]
    #[case("req-xsd-cls-ncname", "gml21", true)]
    #[case("rule-xsd-cls-codelist-asDictionary", "gml21", true)]
    #[case("rule-xsd-all-gml21", "gml21", true)]
    #[case("rule-xsd-all-gml21", "iso19136_2007", false)]
    #[case("rule-xsd-rel-association-classes", "gml33", true)]
    #[case("rule-xsd-rel-association-classes", "iso19136_2007", false)]
    #[case("rule-sql-cls-feature-types", "sql", true)]
    #[case("rule-sql-cls-object-types", "sql", false)]
    #[case("rule-arcgis-prop-initialValueByAlias", "geoservices", true)]
    fn standard_cascade(#[case] rule: &str, #[case] rule_set: &str, #[case] expected: bool) {
        let registry = RuleRegistry::with_standard_rules();
        assert_eq!(
            registry.rule_applies_under(&RuleName::new(rule), &RuleSetName::new(rule_set)),
            expected
        );
    }

    #[test]
    fn optional_rules_are_known_but_not_granted() {
        let registry = RuleRegistry::with_standard_rules();
        let rule = RuleName::new("rule-owl-pkg-singleOntologyPerSchema");
        assert!(registry.has_rule(&rule));
        assert!(!registry.rule_applies_under(&rule, &RuleSetName::new("iso19150_2014")));
    }
}
