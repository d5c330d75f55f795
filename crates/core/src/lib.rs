//! # Modelforge Core
//!
//! Core types shared by every modelforge crate.
//!
//! ## Key Components
//!
//! - **Identifiers**: [`StageId`] for pipeline stages, and the case-insensitive
//!   [`RuleName`] / [`RuleSetName`] keys used by the encoding-rule cascade
//! - **Process modes**: [`ProcessMode`] (enabled, disabled, diagnostics-only)
//! - **Implementation kinds**: the closed set of [`TargetKind`]s and
//!   [`TransformerKind`]s a configuration may name
//! - **Model vocabulary**: [`ClassCategory`] of a stereotype and the
//!   supported [`GmlVersion`]s
//! - **Errors**: the [`ConfigError`] taxonomy and the [`Diagnostics`]
//!   collector for non-fatal findings
//!
//! ## Usage
//!
//! ```rust
//! use modelforge_core::{ProcessMode, RuleName, RuleSetName, StageId};
//!
//! let input = StageId::input();
//! let rule = RuleName::new("REQ-xsd-cls-ncname");
//! let enc = RuleSetName::new("iso19136_2007");
//! let mode: ProcessMode = "diagnostics-only".parse().unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod category;
pub mod constants;
pub mod error;
pub mod gml;
pub mod id;
pub mod kind;
pub mod mode;

mod keys;

pub use category::ClassCategory;
pub use error::{ConfigError, Diagnostics};
pub use gml::GmlVersion;
pub use id::StageId;
pub use keys::{RuleKind, RuleName, RuleSetName};
pub use kind::{ImplementationKind, TargetKind, TransformerKind};
pub use mode::ProcessMode;

/// Result type used throughout modelforge.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Common prelude for modelforge crates.
pub mod prelude {
    pub use super::{
        ClassCategory, ConfigError, Diagnostics, GmlVersion, ImplementationKind, ProcessMode,
        Result, RuleKind, RuleName, RuleSetName, StageId, TargetKind, TransformerKind,
    };
}
