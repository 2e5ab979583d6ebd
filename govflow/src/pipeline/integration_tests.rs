//! End-to-end tests for planning and running pipelines.

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::core::StageStatus;
    use crate::errors::GovflowError;
    use crate::metrics::MetricSnapshot;
    use crate::pipeline::{GovernanceEngine, StageManager};
    use crate::stages::StageSpec;
    use crate::testing::{
        assert_plan_respects_dependencies, assert_stage_failed, assert_stage_skipped,
        assert_stage_succeeded, diamond, linear_chain, FailingStage, PanickingStage,
        RecordingStage,
    };
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_linear_chain_plan() {
        let stages = linear_chain(20);
        let manager = StageManager::from_stages(stages.clone()).unwrap();

        let plan = manager.execution_plan().unwrap();
        assert_plan_respects_dependencies(&plan, &stages);
        assert_eq!(plan.first().map(String::as_str), Some("stage_0"));
        assert_eq!(plan.last().map(String::as_str), Some("stage_19"));
    }

    #[test]
    fn test_wide_fan_out_plan() {
        let mut stages = vec![StageSpec::from_fn("source", |_ctx| Ok(json!(null)))];
        for i in 0..10 {
            stages.push(
                StageSpec::from_fn(format!("worker_{i}"), |_ctx| Ok(json!(null)))
                    .with_dependency("source"),
            );
        }
        stages.push(
            StageSpec::from_fn("sink", |_ctx| Ok(json!(null)))
                .with_dependencies((0..10).map(|i| format!("worker_{i}"))),
        );

        let manager = StageManager::from_stages(stages.clone()).unwrap();
        let plan = manager.execution_plan().unwrap();

        assert_plan_respects_dependencies(&plan, &stages);
        let workers: Vec<String> = (0..10).map(|i| format!("worker_{i}")).collect();
        assert_eq!(&plan[1..11], workers.as_slice());
    }

    #[tokio::test]
    async fn test_diamond_run_threads_results() {
        let join = Arc::new(RecordingStage::returning(json!("joined")));
        let mut stages = diamond();
        stages.pop();
        stages.push(
            StageSpec::new("join", join.clone()).with_dependencies(["left", "right"]),
        );

        let engine = GovernanceEngine::with_stages(EngineConfig::default(), stages).unwrap();
        let run = engine
            .run(json!({"doc": 1}), Some(json!({"trace": true})))
            .await
            .unwrap();

        assert!(run.success);
        assert_stage_succeeded(&run, "join");
        assert_eq!(join.call_count(), 1);

        let ctx = &join.recorded_contexts()[0];
        assert_eq!(ctx.input(), &json!({"doc": 1}));
        assert_eq!(ctx.metadata(), Some(&json!({"trace": true})));
        let mut seen: Vec<&String> = ctx.results().keys().collect();
        seen.sort();
        assert_eq!(seen, vec!["left", "right", "root"]);
    }

    #[tokio::test]
    async fn test_partial_failure_in_diamond() {
        let join = Arc::new(RecordingStage::new());
        let engine = GovernanceEngine::with_stages(
            EngineConfig::default(),
            [
                StageSpec::from_fn("root", |_ctx| Ok(json!(1))),
                StageSpec::new("left", Arc::new(FailingStage::new("left broke")))
                    .with_dependency("root"),
                StageSpec::from_fn("right", |_ctx| Ok(json!(2))).with_dependency("root"),
                StageSpec::new("join", join.clone()).with_dependencies(["left", "right"]),
            ],
        )
        .unwrap();

        let run = engine.run_input(json!(null)).await.unwrap();

        assert!(!run.success);
        assert_stage_succeeded(&run, "root");
        assert_stage_failed(&run, "left");
        assert_stage_succeeded(&run, "right");
        assert_stage_skipped(&run, "join");
        assert_eq!(run.stage("join").unwrap().blocked_by, vec!["left".to_string()]);
        assert_eq!(join.call_count(), 0);

        let order: Vec<&str> = run.stages.iter().map(|s| s.stage_id.as_str()).collect();
        assert_eq!(order, vec!["root", "left", "right", "join"]);
    }

    #[tokio::test]
    async fn test_panic_then_skip() {
        let engine = GovernanceEngine::with_stages(
            EngineConfig::default(),
            [
                StageSpec::new("explode", Arc::new(PanickingStage::new("bad state"))),
                StageSpec::from_fn("after", |_ctx| Ok(json!(null))).with_dependency("explode"),
            ],
        )
        .unwrap();

        let run = engine.run_input(json!(null)).await.unwrap();

        assert_stage_failed(&run, "explode");
        assert_eq!(
            run.stage("explode").unwrap().errors,
            vec!["stage panicked: bad state".to_string()]
        );
        assert_stage_skipped(&run, "after");
    }

    #[tokio::test]
    async fn test_registry_changes_between_runs() {
        let engine = GovernanceEngine::default();
        engine
            .register_stage(StageSpec::from_fn("a", |_ctx| Ok(json!("a"))))
            .unwrap();

        let first = engine.run_input(json!(null)).await.unwrap();
        assert_eq!(first.stages.len(), 1);

        engine
            .register_stage(StageSpec::from_fn("b", |_ctx| Ok(json!("b"))).with_dependency("a"))
            .unwrap();
        let second = engine.run_input(json!(null)).await.unwrap();
        assert_eq!(second.stages.len(), 2);

        engine.remove_stage("a");
        assert!(matches!(
            engine.run_input(json!(null)).await,
            Err(GovflowError::UnknownDependency(_))
        ));
        assert_eq!(engine.history().len(), 2);
    }

    #[tokio::test]
    async fn test_metrics_accumulate_across_runs() {
        let engine = GovernanceEngine::with_stages(
            EngineConfig::default(),
            [
                StageSpec::from_fn("ok", |_ctx| Ok(json!(null))),
                StageSpec::new("bad", Arc::new(FailingStage::new("x"))),
                StageSpec::from_fn("blocked", |_ctx| Ok(json!(null))).with_dependency("bad"),
            ],
        )
        .unwrap();

        for _ in 0..3 {
            engine.run_input(json!(null)).await.unwrap();
        }

        let snapshot = engine.metrics().snapshot();
        assert_eq!(snapshot["stages.success"], MetricSnapshot::Counter { value: 3 });
        assert_eq!(snapshot["stages.failed"], MetricSnapshot::Counter { value: 3 });
        assert_eq!(snapshot["stages.skipped"], MetricSnapshot::Counter { value: 3 });
        assert_eq!(snapshot["runs.total"], MetricSnapshot::Counter { value: 3 });
        match &snapshot["stage.bad.duration"] {
            MetricSnapshot::Timing { count, values, .. } => {
                assert_eq!(*count, 3);
                assert_eq!(values.len(), 3);
            }
            other => panic!("unexpected metric shape: {other:?}"),
        }
        assert!(!snapshot.contains_key("stage.blocked.duration"));
    }

    #[tokio::test]
    async fn test_run_result_serializes_to_wire_shape() {
        let engine = GovernanceEngine::with_stages(
            EngineConfig::default(),
            [
                StageSpec::new("bad", Arc::new(FailingStage::new("broken"))),
                StageSpec::from_fn("next", |_ctx| Ok(json!(1))).with_dependency("bad"),
            ],
        )
        .unwrap();
        let run = engine.run_input(json!(null)).await.unwrap();

        let value = serde_json::to_value(&run).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["stages"][0]["status"], "failed");
        assert_eq!(value["stages"][0]["errors"], json!(["broken"]));
        assert_eq!(value["stages"][1]["status"], "skipped");
        assert_eq!(
            value["stages"][1]["skippedReason"],
            "dependency failed or skipped"
        );

        let back: crate::core::RunResult = serde_json::from_value(value).unwrap();
        assert_eq!(back.stages[1].status, StageStatus::Skipped);
    }
}
