//! Subscriber construction.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Format, LogConfig};
use crate::error::{LogError, LogResult};

/// Install the global subscriber from the environment (see [`LogConfig::from_env`]).
pub fn init() -> LogResult<()> {
    init_with(LogConfig::from_env())
}

/// Install the global subscriber described by `config`.
///
/// Fails if the filter directive is invalid or a subscriber is already set.
pub fn init_with(config: LogConfig) -> LogResult<()> {
    let filter = EnvFilter::try_new(&config.level).map_err(|e| LogError::Filter {
        directive: config.level.clone(),
        reason: e.to_string(),
    })?;

    let registry = Registry::default().with(filter);
    let result = match config.format {
        Format::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_ansi(config.ansi)
                    .with_target(config.target),
            )
            .try_init(),
        Format::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_ansi(config.ansi)
                    .with_target(config.target),
            )
            .try_init(),
        Format::Json => registry
            .with(fmt::layer().json().with_target(config.target))
            .try_init(),
    };
    result.map_err(|_| LogError::AlreadyInitialized)?;

    tracing::debug!(level = %config.level, format = ?config.format, "logging initialised");
    Ok(())
}

/// Install a test-writer subscriber once per process; later calls are no-ops.
///
/// Output goes through the test harness capture, so it only shows for
/// failing tests.
pub fn init_test() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let config = LogConfig::test();
        let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("trace"));
        // Another harness may have installed a subscriber first; keep it.
        let _ = Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_ansi(config.ansi)
                    .with_test_writer(),
            )
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_filter_before_installing() {
        let err = init_with(LogConfig::default().with_level("modelforge=bogus")).unwrap_err();
        assert!(matches!(err, LogError::Filter { .. }));
    }

    #[test]
    fn init_test_is_idempotent() {
        init_test();
        init_test();
        tracing::info!("still fine");
    }
}
