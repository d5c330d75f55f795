//! Assembly scenarios exercising the public API only.

use modelforge_core::{ConfigError, ProcessMode, StageId, TargetKind, TransformerKind};
use modelforge_pipeline::{
    InputStage, Pipeline, PipelineBuilder, Stage, TargetStage, TransformerStage,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn sample() -> PipelineBuilder {
    PipelineBuilder::new()
        .transformer(TransformerStage::new("flat", TransformerKind::Flattener))
        .transformer(
            TransformerStage::new("profile", TransformerKind::Profiler).with_predecessor("flat"),
        )
        .transformer(
            TransformerStage::new("names", TransformerKind::NamingModifier)
                .with_predecessor("INPUT")
                .with_mode(ProcessMode::DiagnosticsOnly),
        )
        .target(TargetStage::new(TargetKind::XmlSchema).with_predecessor("profile"))
        .target(
            TargetStage::new(TargetKind::FeatureCatalogue)
                .with_predecessor("names")
                .with_predecessor("INPUT"),
        )
        .target(TargetStage::new(TargetKind::SqlDdl).with_predecessor("flat"))
}

fn describe(pipeline: &Pipeline) -> Vec<String> {
    pipeline
        .execution_order()
        .into_iter()
        .map(Stage::to_string)
        .collect()
}

#[test]
fn assembling_twice_gives_the_same_order() {
    let first = sample().build().unwrap();
    let second = sample().build().unwrap();
    assert_eq!(describe(&first), describe(&second));
}

#[test]
fn order_respects_dependencies_and_declaration() {
    let pipeline = sample().build().unwrap();
    let order = describe(&pipeline);
    assert_eq!(
        order,
        vec![
            "input `INPUT`",
            "transformer `flat`",
            "transformer `profile`",
            "transformer `names`",
            "target #0 (de.interactive_instruments.ShapeChange.Target.XmlSchema.XmlSchema)",
            "target #1 (de.interactive_instruments.ShapeChange.Target.FeatureCatalogue.FeatureCatalogue)",
            "target #2 (de.interactive_instruments.ShapeChange.Target.SQL.SqlDdl)",
        ]
    );
}

#[test]
fn every_stage_follows_its_predecessors() {
    let pipeline = sample().build().unwrap();
    let order = pipeline.topological_order();
    for (position, stage) in order.iter().enumerate() {
        let Some(id) = stage.id() else { continue };
        for successor in pipeline.successors(id.as_str()) {
            let later = order.iter().position(|s| *s == successor).unwrap();
            assert!(later > position, "{successor} runs before {stage}");
        }
    }
}

#[rstest]
#[case::dangling(
    vec![TransformerStage::new("T1", TransformerKind::Identity).with_predecessor("nope")],
    ConfigError::DanglingPredecessor {
        stage: "transformer `T1`".to_owned(),
        predecessor: StageId::new("nope"),
    }
)]
#[case::self_reference(
    vec![TransformerStage::new("T1", TransformerKind::Identity).with_predecessor("T1")],
    ConfigError::SelfReferentialStage(StageId::new("T1"))
)]
#[case::cycle(
    vec![
        TransformerStage::new("A", TransformerKind::Identity).with_predecessor("B"),
        TransformerStage::new("B", TransformerKind::Identity).with_predecessor("A"),
    ],
    ConfigError::CyclicPipeline { stages: vec![StageId::new("A"), StageId::new("B")] }
)]
fn rejects_malformed_transformers(
    #[case] transformers: Vec<TransformerStage>,
    #[case] expected: ConfigError,
) {
    let err = modelforge_pipeline::assemble(
        InputStage::default(),
        transformers,
        vec![TargetStage::new(TargetKind::JsonSchema)],
    )
    .unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err, expected);
}
