//! # Govflow
//!
//! A dependency-ordered stage runner with run history and metrics.
//!
//! Govflow provides:
//!
//! - **Stage registry and planning**: register stages with declared dependencies
//!   and get a deterministic execution order, with cycle and unknown-dependency
//!   detection
//! - **Governed runs**: stages execute in plan order, failures are recorded as
//!   data and dependents are skipped
//! - **Metrics**: counters and timings recorded for every run
//! - **Run events**: lifecycle events delivered to a pluggable sink
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use govflow::prelude::*;
//! use serde_json::json;
//!
//! let engine = GovernanceEngine::with_stages(
//!     EngineConfig::default(),
//!     [
//!         StageSpec::from_fn("fetch", |ctx| Ok(ctx.input().clone())),
//!         StageSpec::from_fn("count", |ctx| {
//!             Ok(json!(ctx.output("fetch").map_or(0, |v| v.to_string().len())))
//!         })
//!         .with_dependency("fetch"),
//!     ],
//! )?;
//!
//! let run = engine.run_input(json!({"doc": "hello"})).await?;
//! assert!(run.success);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod events;
pub mod metrics;
pub mod observability;
pub mod pipeline;
pub mod stages;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{EngineConfig, LogConfig, LogFormat};
    pub use crate::context::StageContext;
    pub use crate::core::{RunResult, StageResult, StageStatus};
    pub use crate::errors::{
        CycleDetectedError, DuplicateStageError, GovflowError, UnknownDependencyError,
    };
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink, RunEvent, RunEventKind};
    pub use crate::metrics::{MetricSnapshot, MetricsCollector, MetricsSnapshot};
    pub use crate::observability::init_logging;
    pub use crate::pipeline::{GovernanceEngine, StageManager};
    pub use crate::stages::{Stage, StageSpec};
    pub use crate::utils::Timestamp;
}
