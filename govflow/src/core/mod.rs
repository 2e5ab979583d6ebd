//! Core domain model types for govflow.
//!
//! This module contains the records produced by a pipeline run:
//! - Stage status enum
//! - Per-stage and per-run results

mod result;
mod status;

pub use result::{RunResult, StageResult, SKIP_REASON_DEPENDENCY};
pub use status::StageStatus;
