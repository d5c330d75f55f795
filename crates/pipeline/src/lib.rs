#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Modelforge Pipeline
//!
//! Stage descriptors and the validated processing pipeline they form.
//!
//! - [`InputStage`], [`TransformerStage`], [`TargetStage`] describe the stages
//! - [`validate_stages`] reports every structural problem at once
//! - [`assemble`] and [`PipelineBuilder`] produce a [`Pipeline`]: a DAG
//!   rooted at the input with a deterministic execution order
//! - [`StageGraph`] is the `petgraph` graph underneath

pub mod builder;
pub mod graph;
pub mod pipeline;
pub mod stage;
pub mod validate;

pub use builder::PipelineBuilder;
pub use graph::StageGraph;
pub use pipeline::{Pipeline, assemble};
pub use stage::{InputStage, Stage, TargetStage, TransformerStage};
pub use validate::validate_stages;

/// Result type for pipeline assembly.
pub type Result<T> = std::result::Result<T, modelforge_core::ConfigError>;
