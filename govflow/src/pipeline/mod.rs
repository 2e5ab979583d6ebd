//! Stage registration, planning and execution.
//!
//! This module provides:
//! - The stage registry with deterministic topological planning
//! - The sequential pipeline engine with run history and metrics

mod engine;
#[cfg(test)]
mod integration_tests;
mod manager;

pub use engine::{GovernanceEngine, RUNS_TOTAL_KEY, RUN_DURATION_KEY};
pub use manager::StageManager;
