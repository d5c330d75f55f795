//! Stage descriptors: the input, transformers and targets.

use std::fmt;

use modelforge_core::{ProcessMode, StageId, TargetKind, TransformerKind};
use serde::{Deserialize, Serialize};

/// The single root of a pipeline: where the model enters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputStage {
    /// Identifier other stages use to consume the loaded model.
    pub id: StageId,
}

impl InputStage {
    /// An input with the given identifier.
    pub fn new(id: impl Into<StageId>) -> Self {
        Self { id: id.into() }
    }
}

impl Default for InputStage {
    fn default() -> Self {
        Self {
            id: StageId::input(),
        }
    }
}

/// A stage that rewrites the model and forwards it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformerStage {
    /// Unique identifier.
    pub id: StageId,
    /// Implementation.
    pub kind: TransformerKind,
    /// Processing mode.
    #[serde(default)]
    pub mode: ProcessMode,
    /// Stage consumed; `None` means the pipeline input.
    #[serde(default)]
    pub predecessor: Option<StageId>,
}

impl TransformerStage {
    /// An enabled transformer fed by the pipeline input.
    pub fn new(id: impl Into<StageId>, kind: TransformerKind) -> Self {
        Self {
            id: id.into(),
            kind,
            mode: ProcessMode::Enabled,
            predecessor: None,
        }
    }

    /// Set the consumed stage.
    #[must_use]
    pub fn with_predecessor(mut self, predecessor: impl Into<StageId>) -> Self {
        self.predecessor = Some(predecessor.into());
        self
    }

    /// Set the processing mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ProcessMode) -> Self {
        self.mode = mode;
        self
    }
}

/// A stage that renders the model into an output representation.
///
/// Targets have no identifier of their own: nothing consumes their output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetStage {
    /// Implementation.
    pub kind: TargetKind,
    /// Processing mode.
    #[serde(default)]
    pub mode: ProcessMode,
    /// Stages consumed; empty means the pipeline input.
    #[serde(default)]
    pub predecessors: Vec<StageId>,
}

impl TargetStage {
    /// An enabled target fed by the pipeline input.
    pub fn new(kind: TargetKind) -> Self {
        Self {
            kind,
            mode: ProcessMode::Enabled,
            predecessors: Vec::new(),
        }
    }

    /// Add a consumed stage. Repeated ids are kept once.
    #[must_use]
    pub fn with_predecessor(mut self, predecessor: impl Into<StageId>) -> Self {
        let predecessor = predecessor.into();
        if !self.predecessors.contains(&predecessor) {
            self.predecessors.push(predecessor);
        }
        self
    }

    /// Set the processing mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ProcessMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Any stage of an assembled pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Stage {
    /// The input.
    Input(InputStage),
    /// A transformer.
    Transformer(TransformerStage),
    /// A target, with its position among the declared targets.
    Target {
        /// Zero-based declaration position.
        ordinal: usize,
        /// The target.
        #[serde(flatten)]
        target: TargetStage,
    },
}

impl Stage {
    /// The identifier, for the input and transformers.
    #[must_use]
    pub fn id(&self) -> Option<&StageId> {
        match self {
            Self::Input(input) => Some(&input.id),
            Self::Transformer(transformer) => Some(&transformer.id),
            Self::Target { .. } => None,
        }
    }

    /// Processing mode; the input is always enabled.
    #[must_use]
    pub fn mode(&self) -> ProcessMode {
        match self {
            Self::Input(_) => ProcessMode::Enabled,
            Self::Transformer(transformer) => transformer.mode,
            Self::Target { target, .. } => target.mode,
        }
    }

    /// Whether the stage runs.
    #[must_use]
    pub fn is_executed(&self) -> bool {
        self.mode().is_executed()
    }

    /// Whether this is the input.
    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }

    /// The transformer, if this is one.
    #[must_use]
    pub fn as_transformer(&self) -> Option<&TransformerStage> {
        match self {
            Self::Transformer(transformer) => Some(transformer),
            _ => None,
        }
    }

    /// The target, if this is one.
    #[must_use]
    pub fn as_target(&self) -> Option<&TargetStage> {
        match self {
            Self::Target { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Stable identity used to scope parameters and mappings: the
    /// implementation name for transformers and targets, the id for the input.
    #[must_use]
    pub fn scope(&self) -> &str {
        match self {
            Self::Input(input) => input.id.as_str(),
            Self::Transformer(transformer) => transformer.kind.implementation_name(),
            Self::Target { target, .. } => target.kind.implementation_name(),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(input) => write!(f, "input `{}`", input.id),
            Self::Transformer(transformer) => write!(f, "transformer `{}`", transformer.id),
            Self::Target { ordinal, target } => {
                write!(f, "target #{ordinal} ({})", target.kind.implementation_name())
            }
        }
    }
}
