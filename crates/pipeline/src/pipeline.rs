//! The assembled, validated pipeline.

use std::collections::HashMap;

use modelforge_core::{ConfigError, StageId};

use crate::graph::StageGraph;
use crate::stage::{InputStage, Stage, TargetStage, TransformerStage};
use crate::validate::validate_stages;

/// A validated DAG of stages rooted at the input.
///
/// Stages are stored in declaration order: the input first, then the
/// transformers, then the targets. Disabled stages stay in the graph but are
/// left out of [`execution_order`](Self::execution_order).
#[derive(Debug, Clone)]
pub struct Pipeline {
    input: InputStage,
    stages: Vec<Stage>,
    positions: HashMap<StageId, usize>,
    graph: StageGraph,
    order: Vec<usize>,
}

/// Validate the descriptors and build a [`Pipeline`].
///
/// Fails with the first error [`validate_stages`] reports.
pub fn assemble(
    input: InputStage,
    transformers: Vec<TransformerStage>,
    targets: Vec<TargetStage>,
) -> crate::Result<Pipeline> {
    if let Some(first) = validate_stages(&input, &transformers, &targets)
        .into_iter()
        .next()
    {
        tracing::debug!(code = first.code(), "pipeline rejected: {first}");
        return Err(first);
    }

    let mut stages = Vec::with_capacity(1 + transformers.len() + targets.len());
    let mut positions = HashMap::new();

    positions.insert(input.id.clone(), 0);
    stages.push(Stage::Input(input.clone()));
    for transformer in transformers {
        positions.insert(transformer.id.clone(), stages.len());
        stages.push(Stage::Transformer(transformer));
    }
    for (ordinal, target) in targets.into_iter().enumerate() {
        stages.push(Stage::Target { ordinal, target });
    }

    let mut graph = StageGraph::with_stages(stages.len());
    for (position, stage) in stages.iter().enumerate() {
        let upstream: Vec<&StageId> = match stage {
            Stage::Input(_) => Vec::new(),
            Stage::Transformer(transformer) => {
                vec![transformer.predecessor.as_ref().unwrap_or(&input.id)]
            }
            Stage::Target { target, .. } if target.predecessors.is_empty() => vec![&input.id],
            Stage::Target { target, .. } => target.predecessors.iter().collect(),
        };
        for id in upstream {
            if let Some(&from) = positions.get(id) {
                graph.connect(from, position);
            }
        }
    }

    let order = graph.ordered().ok_or_else(|| ConfigError::CyclicPipeline {
        stages: stages.iter().filter_map(Stage::id).cloned().collect(),
    })?;

    tracing::debug!(
        stages = stages.len(),
        links = graph.edge_count(),
        "assembled pipeline"
    );
    Ok(Pipeline {
        input,
        stages,
        positions,
        graph,
        order,
    })
}

impl Pipeline {
    /// The input stage.
    #[must_use]
    pub fn input(&self) -> &InputStage {
        &self.input
    }

    /// All stages in declaration order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The input or transformer with the given id.
    #[must_use]
    pub fn stage(&self, id: &str) -> Option<&Stage> {
        self.positions.get(id).map(|&position| &self.stages[position])
    }

    /// Transformers in declaration order.
    pub fn transformers(&self) -> impl Iterator<Item = &TransformerStage> {
        self.stages.iter().filter_map(Stage::as_transformer)
    }

    /// Targets in declaration order.
    pub fn targets(&self) -> impl Iterator<Item = &TargetStage> {
        self.stages.iter().filter_map(Stage::as_target)
    }

    /// Every stage in dependency order, ties broken by declaration order.
    #[must_use]
    pub fn topological_order(&self) -> Vec<&Stage> {
        self.order.iter().map(|&position| &self.stages[position]).collect()
    }

    /// Stages to run, in dependency order: [`topological_order`](Self::topological_order)
    /// without the disabled stages.
    #[must_use]
    pub fn execution_order(&self) -> Vec<&Stage> {
        self.order
            .iter()
            .map(|&position| &self.stages[position])
            .filter(|stage| stage.is_executed())
            .collect()
    }

    /// Stages to run grouped into levels; a level only depends on earlier
    /// levels, so the stages of one level may run in parallel.
    #[must_use]
    pub fn levels(&self) -> Vec<Vec<&Stage>> {
        self.graph
            .levels()
            .unwrap_or_default()
            .into_iter()
            .map(|level| {
                level
                    .into_iter()
                    .map(|position| &self.stages[position])
                    .filter(|stage| stage.is_executed())
                    .collect::<Vec<_>>()
            })
            .filter(|level| !level.is_empty())
            .collect()
    }

    /// Direct predecessors of the input or transformer `id`.
    #[must_use]
    pub fn predecessors(&self, id: &str) -> Vec<&Stage> {
        self.neighbours(id, StageGraph::predecessors)
    }

    /// Direct consumers of the input or transformer `id`.
    #[must_use]
    pub fn successors(&self, id: &str) -> Vec<&Stage> {
        self.neighbours(id, StageGraph::successors)
    }

    fn neighbours(&self, id: &str, select: fn(&StageGraph, usize) -> Vec<usize>) -> Vec<&Stage> {
        self.positions
            .get(id)
            .map(|&position| {
                select(&self.graph, position)
                    .into_iter()
                    .map(|p| &self.stages[p])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the pipeline has no stages.
    ///
    /// Pipelines only come from [`assemble`], which rejects a configuration
    /// without targets, so an assembled pipeline holds at least the input and
    /// one target and this returns `false`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
