//! GML versions of XML-schema encodings.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigError;

/// A supported GML version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub enum GmlVersion {
    /// GML 2.1.
    V2_1,
    /// GML 3.1.
    V3_1,
    /// GML 3.2, the default.
    #[default]
    V3_2,
    /// GML 3.3.
    V3_3,
}

impl GmlVersion {
    /// The configuration spelling, e.g. `3.2`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V2_1 => "2.1",
            Self::V3_1 => "3.1",
            Self::V3_2 => "3.2",
            Self::V3_3 => "3.3",
        }
    }
}

impl fmt::Display for GmlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the exact configuration spelling; anything else is
/// [`ConfigError::InvalidGmlVersion`].
impl FromStr for GmlVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2.1" => Ok(Self::V2_1),
            "3.1" => Ok(Self::V3_1),
            "3.2" => Ok(Self::V3_2),
            "3.3" => Ok(Self::V3_3),
            _ => Err(ConfigError::InvalidGmlVersion(s.to_owned())),
        }
    }
}

impl From<GmlVersion> for String {
    fn from(version: GmlVersion) -> Self {
        version.as_str().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("3.3", GmlVersion::V3_3)]
    #[case("3.2", GmlVersion::V3_2)]
    #[case("3.1", GmlVersion::V3_1)]
    #[case("2.1", GmlVersion::V2_1)]
    fn parses_supported_versions(#[case] raw: &str, #[case] expected: GmlVersion) {
        assert_eq!(raw.parse::<GmlVersion>().unwrap(), expected);
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    #[case("9.9")]
    #[case("3.2 ")]
    #[case("")]
    fn rejects_other_values(#[case] raw: &str) {
        let err = raw.parse::<GmlVersion>().unwrap_err();
        assert_eq!(err.code(), "CFG_GML_VERSION");
        assert!(err.is_fatal());
    }
}
