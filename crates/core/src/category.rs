//! Model class categories.

use std::fmt;

use serde::Serialize;

/// Category of a model class, derived from its stereotype.
///
/// Several stereotypes share a category: `featuretype` and `adeelement` are
/// both [`ClassCategory::Feature`], and every stereotype without a category
/// of its own is [`ClassCategory::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassCategory {
    /// No known stereotype.
    Unknown,
    /// Feature type.
    Feature,
    /// Code list.
    CodeList,
    /// Enumeration.
    Enumeration,
    /// Interface.
    Mixin,
    /// Data type.
    DataType,
    /// Object type.
    Object,
    /// Basic type.
    BasicType,
    /// Union.
    Union,
    /// OKSTRA key table.
    OkstraKey,
    /// OKSTRA feature identifier.
    OkstraFid,
    /// Feature concept.
    FeatureConcept,
    /// Attribute concept.
    AttributeConcept,
    /// Value concept.
    ValueConcept,
}

impl ClassCategory {
    /// The category of classes carrying `stereotype`, ignoring case.
    #[must_use]
    pub fn from_stereotype(stereotype: &str) -> Self {
        match stereotype.trim().to_lowercase().as_str() {
            "enumeration" => Self::Enumeration,
            "codelist" => Self::CodeList,
            "schluesseltabelle" => Self::OkstraKey,
            "fachid" => Self::OkstraFid,
            "datatype" => Self::DataType,
            "union" => Self::Union,
            "featureconcept" => Self::FeatureConcept,
            "attributeconcept" => Self::AttributeConcept,
            "valueconcept" => Self::ValueConcept,
            "interface" => Self::Mixin,
            "basictype" => Self::BasicType,
            "adeelement" | "featuretype" => Self::Feature,
            "type" => Self::Object,
            _ => Self::Unknown,
        }
    }

    /// Lower-case name of the category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Feature => "feature",
            Self::CodeList => "code_list",
            Self::Enumeration => "enumeration",
            Self::Mixin => "mixin",
            Self::DataType => "data_type",
            Self::Object => "object",
            Self::BasicType => "basic_type",
            Self::Union => "union",
            Self::OkstraKey => "okstra_key",
            Self::OkstraFid => "okstra_fid",
            Self::FeatureConcept => "feature_concept",
            Self::AttributeConcept => "attribute_concept",
            Self::ValueConcept => "value_concept",
        }
    }
}

impl fmt::Display for ClassCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("FeatureType", ClassCategory::Feature)]
    #[case("ADEElement", ClassCategory::Feature)]
    #[case("Type", ClassCategory::Object)]
    #[case("interface", ClassCategory::Mixin)]
    #[case(" CodeList ", ClassCategory::CodeList)]
    #[case("Schluesseltabelle", ClassCategory::OkstraKey)]
    #[case("", ClassCategory::Unknown)]
    #[case("foo", ClassCategory::Unknown)]
    fn maps_stereotypes(#[case] stereotype: &str, #[case] expected: ClassCategory) {
        assert_eq!(ClassCategory::from_stereotype(stereotype), expected);
    }

    #[test]
    fn displays_snake_case() {
        assert_eq!(ClassCategory::DataType.to_string(), "data_type");
        assert_eq!(
            serde_json::to_string(&ClassCategory::AttributeConcept).unwrap(),
            "\"attribute_concept\""
        );
    }
}
