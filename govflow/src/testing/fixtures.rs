//! Ready-made stage graphs for tests and benchmarks.

use crate::stages::{NoOpStage, StageSpec};
use std::sync::Arc;

/// `count` no-op stages where stage `i` depends on stage `i - 1`.
///
/// Stages are returned in reverse dependency order so that planning has to
/// reorder them.
#[must_use]
pub fn linear_chain(count: usize) -> Vec<StageSpec> {
    (0..count)
        .rev()
        .map(|i| {
            let spec = StageSpec::new(format!("stage_{i}"), Arc::new(NoOpStage));
            if i == 0 {
                spec
            } else {
                spec.with_dependency(format!("stage_{}", i - 1))
            }
        })
        .collect()
}

/// Four no-op stages: `root`, then `left` and `right`, then `join`.
#[must_use]
pub fn diamond() -> Vec<StageSpec> {
    vec![
        StageSpec::new("root", Arc::new(NoOpStage)),
        StageSpec::new("left", Arc::new(NoOpStage)).with_dependency("root"),
        StageSpec::new("right", Arc::new(NoOpStage)).with_dependency("root"),
        StageSpec::new("join", Arc::new(NoOpStage)).with_dependencies(["left", "right"]),
    ]
}
