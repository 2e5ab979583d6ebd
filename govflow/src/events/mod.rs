//! Run events for observability.
//!
//! The engine reports the lifecycle of every run and stage to an
//! [`EventSink`]. Sinks never influence execution.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use crate::utils::{now_utc, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle points reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunEventKind {
    /// A run obtained its plan and is about to execute stages.
    #[serde(rename = "run.started")]
    RunStarted,
    /// A stage's unit of work is about to be invoked.
    #[serde(rename = "stage.started")]
    StageStarted,
    /// A stage's unit of work completed normally.
    #[serde(rename = "stage.completed")]
    StageCompleted,
    /// A stage's unit of work failed.
    #[serde(rename = "stage.failed")]
    StageFailed,
    /// A stage was not invoked because a dependency did not succeed.
    #[serde(rename = "stage.skipped")]
    StageSkipped,
    /// A run finished processing every stage.
    #[serde(rename = "run.completed")]
    RunCompleted,
}

impl RunEventKind {
    /// Dotted event name, e.g. `stage.failed`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RunStarted => "run.started",
            Self::StageStarted => "stage.started",
            Self::StageCompleted => "stage.completed",
            Self::StageFailed => "stage.failed",
            Self::StageSkipped => "stage.skipped",
            Self::RunCompleted => "run.completed",
        }
    }
}

impl fmt::Display for RunEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    /// What happened.
    pub kind: RunEventKind,
    /// The run the event belongs to.
    pub run_id: Uuid,
    /// The stage concerned, for stage events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_id: Option<String>,
    /// When the event was created.
    pub at: Timestamp,
    /// Event-specific payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl RunEvent {
    /// Creates a run-level event.
    #[must_use]
    pub fn run(kind: RunEventKind, run_id: Uuid, data: serde_json::Value) -> Self {
        Self {
            kind,
            run_id,
            stage_id: None,
            at: now_utc(),
            data,
        }
    }

    /// Creates a stage-level event.
    #[must_use]
    pub fn stage(
        kind: RunEventKind,
        run_id: Uuid,
        stage_id: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            kind,
            run_id,
            stage_id: Some(stage_id.into()),
            at: now_utc(),
            data,
        }
    }
}
