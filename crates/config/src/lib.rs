#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Modelforge Config
//!
//! Turns parsed configuration descriptors into a frozen
//! [`ResolutionContext`]: the rule registry, the mapping tables, the
//! parameter store and the validated pipeline, behind one read-only façade.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use modelforge_config::prelude::*;
//!
//! let descriptor: ConfigurationDescriptor = serde_json::from_str(json)?;
//! let Loaded { context, diagnostics } =
//!     ResolutionContext::load(&descriptor, &ReplacementTable::new())?;
//!
//! for stage in context.execution_contexts() {
//!     let rule = stage.default_encoding_rule();
//!     // run the stage
//! }
//! ```

pub mod defaults;
pub mod descriptor;
pub mod implementation;
pub mod settings;
pub mod vocabulary;

mod context;
mod loader;
mod stage;

pub use context::ResolutionContext;
pub use descriptor::{
    ConfigurationDescriptor, DescriptorSourceDescriptor, InputDescriptor, PackageInfoDescriptor,
    ProcessMapEntryDescriptor, RuleSetDescriptor, TargetDescriptor, TransformerDescriptor,
    XmlNamespaceDescriptor, XsdMapEntryDescriptor,
};
pub use implementation::ImplementationRegistry;
pub use loader::{Loaded, load, load_with};
pub use settings::Settings;
pub use stage::StageContext;
pub use vocabulary::{Namespace, PackageInfo, Vocabulary};

/// Result type for loading and resolution.
pub type Result<T> = std::result::Result<T, modelforge_core::ConfigError>;

/// Common imports for stage implementations.
pub mod prelude {
    pub use crate::{
        ConfigurationDescriptor, ImplementationRegistry, Loaded, ResolutionContext, Settings,
        StageContext,
    };
    pub use modelforge_core::prelude::*;
    pub use modelforge_parameter::{ParameterSource, ReplacementTable};
    pub use modelforge_rules::{MappingKind, MappingRecord};
}
