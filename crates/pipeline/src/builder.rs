//! Fluent builder for assembling pipelines.

use crate::pipeline::{Pipeline, assemble};
use crate::stage::{InputStage, TargetStage, TransformerStage};

/// Accumulates stage descriptors, then validates and assembles them.
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    input: InputStage,
    transformers: Vec<TransformerStage>,
    targets: Vec<TargetStage>,
}

impl PipelineBuilder {
    /// Start with the default input and no other stages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the input stage.
    #[must_use]
    pub fn input(mut self, input: InputStage) -> Self {
        self.input = input;
        self
    }

    /// Add a transformer.
    #[must_use]
    pub fn transformer(mut self, transformer: TransformerStage) -> Self {
        self.transformers.push(transformer);
        self
    }

    /// Add a target.
    #[must_use]
    pub fn target(mut self, target: TargetStage) -> Self {
        self.targets.push(target);
        self
    }

    /// Validate and assemble. See [`assemble`].
    pub fn build(self) -> crate::Result<Pipeline> {
        assemble(self.input, self.transformers, self.targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelforge_core::{ConfigError, StageId, TargetKind, TransformerKind};

    #[test]
    fn builder_requires_a_target() {
        let err = PipelineBuilder::new().build().unwrap_err();
        assert_eq!(err, ConfigError::NoTargets);
    }

    #[test]
    fn builder_rejects_duplicate_ids() {
        let err = PipelineBuilder::new()
            .transformer(TransformerStage::new("T", TransformerKind::Flattener))
            .transformer(TransformerStage::new("T", TransformerKind::Profiler))
            .target(TargetStage::new(TargetKind::Rdf))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateStageId(StageId::new("T")));
    }
}
