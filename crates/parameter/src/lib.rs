#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Modelforge Parameter
//!
//! Configuration values at two precedence levels.
//!
//! - [`ParameterStore`] holds global values and values scoped to a stage
//!   identity. Lookups are exact: a scoped miss does not fall back to the
//!   global value
//! - [`ReplacementTable`] substitutes whole values once, when they are set
//! - [`ParameterOverlay`] layers a stage's own parameters over a frozen store
//!   without mutating it
//! - [`ParameterSource`] is the read interface both of them implement

pub mod key;
pub mod overlay;
pub mod pattern;
pub mod replace;
pub mod store;

pub use key::ParameterKey;
pub use overlay::ParameterOverlay;
pub use pattern::full_match;
pub use replace::ReplacementTable;
pub use store::{ParameterSource, ParameterStore};

/// Result type for parameter operations.
pub type Result<T> = std::result::Result<T, modelforge_core::ConfigError>;

/// Common imports.
pub mod prelude {
    pub use crate::{
        ParameterKey, ParameterOverlay, ParameterSource, ParameterStore, ReplacementTable,
    };
}
