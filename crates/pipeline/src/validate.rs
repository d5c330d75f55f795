//! Pipeline validation that collects every structural error.

use std::collections::{BTreeSet, HashMap, HashSet};

use modelforge_core::{ConfigError, StageId};

use crate::stage::{InputStage, Stage, TargetStage, TransformerStage};

/// Validate stage descriptors, returning every problem found.
///
/// Errors are grouped by check, in this order: duplicate identifiers,
/// dangling predecessors, self-references, cycles among transformers,
/// disabled predecessors of executed stages, missing targets. Within a group
/// they follow declaration order. [`assemble`](crate::assemble) reports the
/// first one.
#[must_use]
pub fn validate_stages(
    input: &InputStage,
    transformers: &[TransformerStage],
    targets: &[TargetStage],
) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    // 1. Unique identifiers across input and transformers
    let mut declared: HashSet<&StageId> = HashSet::new();
    declared.insert(&input.id);
    for transformer in transformers {
        if !declared.insert(&transformer.id) {
            errors.push(ConfigError::DuplicateStageId(transformer.id.clone()));
        }
    }

    // 2. Every predecessor resolves
    for transformer in transformers {
        let predecessor = predecessor_of(transformer, input);
        if !declared.contains(predecessor) {
            errors.push(ConfigError::DanglingPredecessor {
                stage: transformer_label(transformer),
                predecessor: predecessor.clone(),
            });
        }
    }
    for (ordinal, target) in targets.iter().enumerate() {
        for predecessor in &target.predecessors {
            if !declared.contains(predecessor) {
                errors.push(ConfigError::DanglingPredecessor {
                    stage: target_label(ordinal, target),
                    predecessor: predecessor.clone(),
                });
            }
        }
    }

    // 3. No transformer consumes itself
    for transformer in transformers {
        if predecessor_of(transformer, input) == &transformer.id {
            errors.push(ConfigError::SelfReferentialStage(transformer.id.clone()));
        }
    }

    // 4. Every transformer chain reaches the input
    let by_id: HashMap<&StageId, &TransformerStage> =
        transformers.iter().map(|t| (&t.id, t)).collect();
    let mut reported: HashSet<BTreeSet<&StageId>> = HashSet::new();
    for transformer in transformers {
        if let Some(cycle) = find_cycle(transformer, input, &by_id)
            && reported.insert(cycle.iter().copied().collect())
        {
            errors.push(ConfigError::CyclicPipeline {
                stages: cycle.into_iter().cloned().collect(),
            });
        }
    }

    // 5. Executed stages do not depend on disabled transformers
    for transformer in transformers {
        if transformer.mode.is_disabled() {
            continue;
        }
        let predecessor = predecessor_of(transformer, input);
        if by_id
            .get(predecessor)
            .is_some_and(|upstream| upstream.mode.is_disabled())
        {
            errors.push(ConfigError::DisabledPredecessorOfEnabledStage {
                stage: transformer_label(transformer),
                predecessor: predecessor.clone(),
            });
        }
    }
    for (ordinal, target) in targets.iter().enumerate() {
        if target.mode.is_disabled() {
            continue;
        }
        for predecessor in &target.predecessors {
            if by_id
                .get(predecessor)
                .is_some_and(|upstream| upstream.mode.is_disabled())
            {
                errors.push(ConfigError::DisabledPredecessorOfEnabledStage {
                    stage: target_label(ordinal, target),
                    predecessor: predecessor.clone(),
                });
            }
        }
    }

    // 6. At least one target
    if targets.is_empty() {
        errors.push(ConfigError::NoTargets);
    }

    errors
}

/// The stage a transformer consumes, defaulting to the input.
pub(crate) fn predecessor_of<'a>(
    transformer: &'a TransformerStage,
    input: &'a InputStage,
) -> &'a StageId {
    transformer.predecessor.as_ref().unwrap_or(&input.id)
}

/// Follow predecessors from `start`. Returns the members of the first loop
/// met, in predecessor order, unless the loop is a single self-reference.
fn find_cycle<'a>(
    start: &'a TransformerStage,
    input: &'a InputStage,
    by_id: &HashMap<&'a StageId, &'a TransformerStage>,
) -> Option<Vec<&'a StageId>> {
    let mut path: Vec<&StageId> = vec![&start.id];
    let mut current = start;
    loop {
        let predecessor = predecessor_of(current, input);
        if predecessor == &input.id {
            return None;
        }
        if let Some(pos) = path.iter().position(|id| *id == predecessor) {
            let cycle = path.split_off(pos);
            return (cycle.len() > 1).then_some(cycle);
        }
        let next: &'a TransformerStage = by_id.get(predecessor).copied()?;
        path.push(&next.id);
        current = next;
    }
}

fn transformer_label(transformer: &TransformerStage) -> String {
    Stage::Transformer(transformer.clone()).to_string()
}

fn target_label(ordinal: usize, target: &TargetStage) -> String {
    Stage::Target {
        ordinal,
        target: target.clone(),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelforge_core::{ProcessMode, TargetKind, TransformerKind};
    use pretty_assertions::assert_eq;

    fn trf(id: &str, predecessor: &str) -> TransformerStage {
        TransformerStage::new(id, TransformerKind::Identity).with_predecessor(predecessor)
    }

    fn target(predecessor: &str) -> TargetStage {
        TargetStage::new(TargetKind::XmlSchema).with_predecessor(predecessor)
    }

    fn codes(errors: &[ConfigError]) -> Vec<&'static str> {
        errors.iter().map(ConfigError::code).collect()
    }

    #[test]
    fn valid_pipeline_returns_empty() {
        let errors = validate_stages(
            &InputStage::default(),
            &[trf("T1", "INPUT"), trf("T2", "T1")],
            &[target("T2"), target("INPUT")],
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn collects_errors_in_check_order() {
        let errors = validate_stages(
            &InputStage::default(),
            &[
                trf("T1", "T1"),
                trf("T1", "INPUT"),
                trf("T2", "missing"),
                trf("A", "B"),
                trf("B", "A"),
            ],
            &[],
        );
        assert_eq!(
            codes(&errors),
            vec![
                "CFG_STAGE_DUPLICATE",
                "CFG_STAGE_DANGLING",
                "CFG_STAGE_SELF",
                "CFG_PIPELINE_CYCLE",
                "CFG_NO_TARGETS",
            ]
        );
    }

    #[test]
    fn cycle_is_reported_once_in_predecessor_order() {
        let errors = validate_stages(
            &InputStage::default(),
            &[trf("A", "C"), trf("B", "A"), trf("C", "B"), trf("D", "C")],
            &[target("D")],
        );
        assert_eq!(
            errors,
            vec![ConfigError::CyclicPipeline {
                stages: vec![StageId::new("A"), StageId::new("C"), StageId::new("B")],
            }]
        );
    }

    #[test]
    fn input_id_counts_as_declared() {
        let errors = validate_stages(
            &InputStage::new("model"),
            &[trf("model", "model")],
            &[target("model")],
        );
        assert_eq!(codes(&errors), vec!["CFG_STAGE_DUPLICATE", "CFG_STAGE_SELF"]);
    }

    #[test]
    fn disabled_transformer_feeding_enabled_target() {
        let errors = validate_stages(
            &InputStage::default(),
            &[trf("T1", "INPUT").with_mode(ProcessMode::Disabled)],
            &[
                target("T1"),
                target("T1").with_mode(ProcessMode::Disabled),
            ],
        );
        assert_eq!(
            errors,
            vec![ConfigError::DisabledPredecessorOfEnabledStage {
                stage: "target #0 (de.interactive_instruments.ShapeChange.Target.XmlSchema.XmlSchema)"
                    .to_owned(),
                predecessor: StageId::new("T1"),
            }]
        );
    }

    #[test]
    fn diagnostics_only_stages_may_feed_others() {
        let errors = validate_stages(
            &InputStage::default(),
            &[trf("T1", "INPUT").with_mode(ProcessMode::DiagnosticsOnly)],
            &[target("T1")],
        );
        assert!(errors.is_empty());
    }
}
