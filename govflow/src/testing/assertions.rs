//! Test assertions for runs and plans.

use crate::core::{RunResult, StageStatus};
use crate::stages::StageSpec;

/// Asserts that `stage_id` ended with `expected`.
pub fn assert_stage_status(run: &RunResult, stage_id: &str, expected: StageStatus) {
    let Some(result) = run.stage(stage_id) else {
        panic!(
            "Stage '{}' missing from run; stages: {:?}",
            stage_id,
            run.stages.iter().map(|s| &s.stage_id).collect::<Vec<_>>()
        );
    };
    assert_eq!(
        result.status, expected,
        "Expected stage '{}' to be {}, got {} (errors: {:?})",
        stage_id, expected, result.status, result.errors
    );
}

/// Asserts that the stage succeeded.
pub fn assert_stage_succeeded(run: &RunResult, stage_id: &str) {
    assert_stage_status(run, stage_id, StageStatus::Success);
}

/// Asserts that the stage failed with at least one error message.
pub fn assert_stage_failed(run: &RunResult, stage_id: &str) {
    assert_stage_status(run, stage_id, StageStatus::Failed);
    assert!(
        run.stage(stage_id).is_some_and(|r| !r.errors.is_empty()),
        "Expected failed stage '{stage_id}' to carry error messages"
    );
}

/// Asserts that the stage was skipped.
pub fn assert_stage_skipped(run: &RunResult, stage_id: &str) {
    assert_stage_status(run, stage_id, StageStatus::Skipped);
}

/// Asserts that `plan` lists every stage once, after all its dependencies.
pub fn assert_plan_respects_dependencies(plan: &[String], stages: &[StageSpec]) {
    assert_eq!(
        plan.len(),
        stages.len(),
        "Plan {plan:?} does not cover all {} stages",
        stages.len()
    );
    for spec in stages {
        let pos = plan
            .iter()
            .position(|id| *id == spec.id)
            .unwrap_or_else(|| panic!("Stage '{}' missing from plan {plan:?}", spec.id));
        for dep in &spec.dependencies {
            let dep_pos = plan
                .iter()
                .position(|id| id == dep)
                .unwrap_or_else(|| panic!("Dependency '{dep}' missing from plan {plan:?}"));
            assert!(
                dep_pos < pos,
                "Dependency '{dep}' of '{}' is not scheduled earlier in {plan:?}",
                spec.id
            );
        }
    }
}
