//! Logger configuration and presets.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output format of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Multi-line, human oriented.
    Pretty,
    /// Single line per event.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

impl FromStr for Format {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to [`Format::Compact`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "json" => Self::Json,
            _ => Self::Compact,
        })
    }
}

/// How the global subscriber is set up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `modelforge_config=debug`.
    pub level: String,
    /// Line format.
    pub format: Format,
    /// Colored output.
    pub ansi: bool,
    /// Include the event target (module path).
    pub target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: Format::Compact,
            ansi: true,
            target: true,
        }
    }
}

impl LogConfig {
    /// Read `MODELFORGE_LOG` (or `RUST_LOG`) and `MODELFORGE_LOG_FORMAT`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(level) = var("MODELFORGE_LOG").or_else(|| var("RUST_LOG")) {
            config.level = level;
        }
        if let Some(format) = var("MODELFORGE_LOG_FORMAT")
            && let Ok(format) = format.parse()
        {
            config.format = format;
        }
        config
    }

    /// Pretty, colored, debug level.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_owned(),
            format: Format::Pretty,
            ..Self::default()
        }
    }

    /// JSON, info level, no colors.
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_owned(),
            format: Format::Json,
            ansi: false,
            ..Self::default()
        }
    }

    /// Compact trace output for test runs.
    #[must_use]
    pub fn test() -> Self {
        Self {
            level: "trace".to_owned(),
            format: Format::Compact,
            ansi: false,
            target: true,
        }
    }

    /// Replace the filter directive.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("pretty", Format::Pretty)]
    #[case(" JSON ", Format::Json)]
    #[case("logfmt", Format::Compact)]
    fn parses_formats(#[case] raw: &str, #[case] expected: Format) {
        assert_eq!(raw.parse::<Format>().unwrap(), expected);
    }

    #[test]
    fn env_prefers_own_variable() {
        let config = LogConfig::from_vars(|name| match name {
            "MODELFORGE_LOG" => Some("modelforge_rules=trace".to_owned()),
            "RUST_LOG" => Some("warn".to_owned()),
            "MODELFORGE_LOG_FORMAT" => Some("json".to_owned()),
            _ => None,
        });
        assert_eq!(config.level, "modelforge_rules=trace");
        assert_eq!(config.format, Format::Json);
    }

    #[test]
    fn env_falls_back_to_rust_log() {
        let config = LogConfig::from_vars(|name| (name == "RUST_LOG").then(|| "warn".to_owned()));
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, Format::Compact);
    }

    #[test]
    fn deserializes_partial_config() {
        let config: LogConfig = serde_json::from_str(r#"{"format":"pretty"}"#).unwrap();
        assert_eq!(config, LogConfig { format: Format::Pretty, ..LogConfig::default() });
    }

    #[test]
    fn presets() {
        assert_eq!(LogConfig::production().format, Format::Json);
        assert!(!LogConfig::production().ansi);
        assert_eq!(LogConfig::development().level, "debug");
    }
}
