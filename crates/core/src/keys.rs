use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::ROOT_RULE_SET;

/// Defines a case-insensitive name: the input is trimmed and lower-cased once
/// on construction so equality and hashing are plain string operations.
macro_rules! define_name {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a normalized name.
            pub fn new(raw: impl AsRef<str>) -> Self {
                Self(raw.as_ref().trim().to_lowercase())
            }

            /// Return the normalized (lower-case) string slice.
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl From<&String> for $name {
            fn from(value: &String) -> Self {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(name: $name) -> Self {
                name.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0.eq_ignore_ascii_case(other.trim())
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0.eq_ignore_ascii_case(other.trim())
            }
        }
    };
}

define_name!(
    /// Name of a single rule (requirement, recommendation or conversion rule).
    ///
    /// Rule names are case-insensitive: `REQ-xsd-cls-ncname` and
    /// `req-xsd-cls-ncname` are the same rule.
    RuleName
);

define_name!(
    /// Name of a rule set (an encoding rule).
    ///
    /// Case-insensitive like [`RuleName`]. The name `*` is the implicit root
    /// every rule set extends when it names no parent.
    RuleSetName
);

/// The vocabulary a rule name belongs to, derived from its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// `req-…`: a requirement checked against the model.
    Requirement,
    /// `rec-…`: a recommendation checked against the model.
    Recommendation,
    /// `rule-…`: a conversion rule changing how elements are encoded.
    Conversion,
    /// Any other prefix.
    Unclassified,
}

impl RuleName {
    /// Classify the rule by its prefix.
    #[must_use]
    pub fn kind(&self) -> RuleKind {
        match self.0.split('-').next() {
            Some("req") => RuleKind::Requirement,
            Some("rec") => RuleKind::Recommendation,
            Some("rule") => RuleKind::Conversion,
            _ => RuleKind::Unclassified,
        }
    }

    /// The target family segment of a rule name (`xsd` in `rule-xsd-cls-type`).
    ///
    /// Only names of the form `<kind>-<family>-<scope>-<name>` have a family.
    #[must_use]
    pub fn family(&self) -> Option<&str> {
        let mut parts = self.0.splitn(4, '-');
        let _kind = parts.next()?;
        let family = parts.next()?;
        let _scope = parts.next()?;
        let _name = parts.next()?;
        Some(family)
    }
}

impl RuleSetName {
    /// The implicit base rule set.
    #[must_use]
    pub fn root() -> Self {
        Self(ROOT_RULE_SET.to_owned())
    }

    /// Whether this is the implicit base rule set.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_RULE_SET
    }
}
