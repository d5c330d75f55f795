#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Modelforge Log
//!
//! Subscriber setup for binaries and tests built on the modelforge crates.
//! The library crates only emit `tracing` events; this crate decides where
//! they go.
//!
//! ```no_run
//! modelforge_log::init_with(modelforge_log::LogConfig::from_env())?;
//! # Ok::<(), modelforge_log::LogError>(())
//! ```

mod builder;
mod config;
mod error;

pub use builder::{init, init_test, init_with};
pub use config::{Format, LogConfig};
pub use error::{LogError, LogResult};
