//! Testing utilities for govflow pipelines.
//!
//! This module provides:
//! - Mock stages with call tracking
//! - Assertions over run results and plans
//! - Ready-made stage graphs

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{
    assert_plan_respects_dependencies, assert_stage_failed, assert_stage_skipped,
    assert_stage_status, assert_stage_succeeded,
};
pub use fixtures::{diamond, linear_chain};
pub use mocks::{FailingStage, PanickingStage, RecordingStage, SlowStage};
