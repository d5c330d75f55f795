//! Processing mode of a transformer or target.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How a stage takes part in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProcessMode {
    /// The stage runs and its results are kept.
    #[default]
    Enabled,
    /// The stage stays in the pipeline but never runs.
    Disabled,
    /// The stage runs for its diagnostics only; its output is not persisted.
    DiagnosticsOnly,
}

impl ProcessMode {
    /// Returns `true` if a stage in this mode is executed.
    #[must_use]
    pub fn is_executed(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Returns `true` for [`ProcessMode::Disabled`].
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    /// The canonical configuration spelling.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::DiagnosticsOnly => "diagnostics-only",
        }
    }
}

impl fmt::Display for ProcessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enabled" => Ok(Self::Enabled),
            "disabled" => Ok(Self::Disabled),
            "diagnostics-only" | "diagnosticsonly" => Ok(Self::DiagnosticsOnly),
            _ => Err(ConfigError::InvalidProcessingMode(s.to_owned())),
        }
    }
}

impl TryFrom<String> for ProcessMode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProcessMode> for String {
    fn from(mode: ProcessMode) -> Self {
        mode.as_str().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("enabled", ProcessMode::Enabled)]
    #[case("Disabled", ProcessMode::Disabled)]
    #[case("diagnostics-only", ProcessMode::DiagnosticsOnly)]
    #[case("DIAGNOSTICSONLY", ProcessMode::DiagnosticsOnly)]
    #[case(" enabled ", ProcessMode::Enabled)]
    fn parses_known_modes(#[case] raw: &str, #[case] expected: ProcessMode) {
        assert_eq!(raw.parse::<ProcessMode>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = "sometimes".parse::<ProcessMode>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProcessingMode(ref m) if m == "sometimes"));
        assert!(err.is_fatal());
    }

    #[test]
    fn default_is_enabled() {
        assert_eq!(ProcessMode::default(), ProcessMode::Enabled);
    }

    #[test]
    fn execution_flags() {
        assert!(ProcessMode::Enabled.is_executed());
        assert!(ProcessMode::DiagnosticsOnly.is_executed());
        assert!(!ProcessMode::Disabled.is_executed());
    }

    #[test]
    fn serde_uses_configuration_spelling() {
        let json = serde_json::to_string(&ProcessMode::DiagnosticsOnly).unwrap();
        assert_eq!(json, "\"diagnostics-only\"");
        let mode: ProcessMode = serde_json::from_str("\"diagnosticsonly\"").unwrap();
        assert_eq!(mode, ProcessMode::DiagnosticsOnly);
        assert!(serde_json::from_str::<ProcessMode>("\"bogus\"").is_err());
    }
}
