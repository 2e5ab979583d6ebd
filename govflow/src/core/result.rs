//! Per-stage and per-run result records.

use super::StageStatus;
use crate::utils::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reason recorded on every skipped stage.
pub const SKIP_REASON_DEPENDENCY: &str = "dependency failed or skipped";

/// Outcome of one stage within one run.
///
/// Produced exactly once per stage per run and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageResult {
    /// Stage id.
    pub stage_id: String,
    /// Terminal status.
    pub status: StageStatus,
    /// When the stage started (or was checked, for skips).
    pub started_at: Timestamp,
    /// When the stage finished.
    pub finished_at: Timestamp,
    /// Measured duration in milliseconds (zero for skips).
    pub duration_ms: f64,
    /// Output value of a successful stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    /// Error messages of a failed stage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// Why the stage was skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped_reason: Option<String>,
    /// Dependencies whose status blocked a skipped stage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked_by: Vec<String>,
}

impl StageResult {
    /// Creates a successful stage result.
    #[must_use]
    pub fn success(
        stage_id: impl Into<String>,
        started_at: Timestamp,
        finished_at: Timestamp,
        duration_ms: f64,
        output: serde_json::Value,
    ) -> Self {
        Self {
            stage_id: stage_id.into(),
            status: StageStatus::Success,
            started_at,
            finished_at,
            duration_ms,
            output: Some(output),
            errors: Vec::new(),
            skipped_reason: None,
            blocked_by: Vec::new(),
        }
    }

    /// Creates a failed stage result.
    #[must_use]
    pub fn failed(
        stage_id: impl Into<String>,
        started_at: Timestamp,
        finished_at: Timestamp,
        duration_ms: f64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            stage_id: stage_id.into(),
            status: StageStatus::Failed,
            started_at,
            finished_at,
            duration_ms,
            output: None,
            errors: vec![error.into()],
            skipped_reason: None,
            blocked_by: Vec::new(),
        }
    }

    /// Creates a skipped stage result at the moment of the dependency check.
    #[must_use]
    pub fn skipped(stage_id: impl Into<String>, at: Timestamp, blocked_by: Vec<String>) -> Self {
        Self {
            stage_id: stage_id.into(),
            status: StageStatus::Skipped,
            started_at: at,
            finished_at: at,
            duration_ms: 0.0,
            output: None,
            errors: Vec::new(),
            skipped_reason: Some(SKIP_REASON_DEPENDENCY.to_string()),
            blocked_by,
        }
    }

    /// Returns true if the stage succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Aggregate outcome of one full pass over the registered stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    /// Unique id of this run.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: Timestamp,
    /// When the run finished.
    pub finished_at: Timestamp,
    /// Wall-clock duration of the whole run in milliseconds.
    ///
    /// Measured independently of the per-stage durations.
    pub duration_ms: f64,
    /// Stage results in execution order.
    pub stages: Vec<StageResult>,
    /// True iff every stage succeeded (vacuously true with no stages).
    pub success: bool,
}

impl RunResult {
    /// Assembles a run result, deriving `success` from the stage statuses.
    #[must_use]
    pub fn new(
        run_id: Uuid,
        started_at: Timestamp,
        finished_at: Timestamp,
        duration_ms: f64,
        stages: Vec<StageResult>,
    ) -> Self {
        let success = stages.iter().all(StageResult::is_success);
        Self {
            run_id,
            started_at,
            finished_at,
            duration_ms,
            stages,
            success,
        }
    }

    /// Looks up the result of a stage by id.
    #[must_use]
    pub fn stage(&self, stage_id: &str) -> Option<&StageResult> {
        self.stages.iter().find(|r| r.stage_id == stage_id)
    }

    /// Returns the ids of stages that ended with the given status.
    #[must_use]
    pub fn stage_ids_with_status(&self, status: StageStatus) -> Vec<&str> {
        self.stages
            .iter()
            .filter(|r| r.status == status)
            .map(|r| r.stage_id.as_str())
            .collect()
    }

    /// Ids of succeeded stages.
    #[must_use]
    pub fn succeeded(&self) -> Vec<&str> {
        self.stage_ids_with_status(StageStatus::Success)
    }

    /// Ids of failed stages.
    #[must_use]
    pub fn failed(&self) -> Vec<&str> {
        self.stage_ids_with_status(StageStatus::Failed)
    }

    /// Ids of skipped stages.
    #[must_use]
    pub fn skipped(&self) -> Vec<&str> {
        self.stage_ids_with_status(StageStatus::Skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::now_utc;
    use serde_json::json;

    #[test]
    fn test_stage_result_success() {
        let now = now_utc();
        let result = StageResult::success("one", now, now, 1.5, json!({"answer": 42}));

        assert!(result.is_success());
        assert_eq!(result.output, Some(json!({"answer": 42})));
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_stage_result_failed() {
        let now = now_utc();
        let result = StageResult::failed("one", now, now, 2.0, "Connection timeout");

        assert_eq!(result.status, StageStatus::Failed);
        assert_eq!(result.errors, vec!["Connection timeout".to_string()]);
        assert!(result.output.is_none());
    }

    #[test]
    fn test_stage_result_skipped() {
        let now = now_utc();
        let result = StageResult::skipped("two", now, vec!["one".to_string()]);

        assert_eq!(result.status, StageStatus::Skipped);
        assert_eq!(result.duration_ms, 0.0);
        assert_eq!(result.started_at, result.finished_at);
        assert_eq!(result.skipped_reason.as_deref(), Some(SKIP_REASON_DEPENDENCY));
        assert_eq!(result.blocked_by, vec!["one".to_string()]);
    }

    #[test]
    fn test_stage_result_wire_shape() {
        let now = now_utc();
        let value =
            serde_json::to_value(StageResult::skipped("two", now, vec!["one".to_string()]))
                .unwrap();

        assert_eq!(value["stageId"], "two");
        assert_eq!(value["status"], "skipped");
        assert_eq!(value["skippedReason"], SKIP_REASON_DEPENDENCY);
        assert_eq!(value["blockedBy"], json!(["one"]));
        assert!(value.get("output").is_none());
        assert!(value.get("errors").is_none());
    }

    #[test]
    fn test_run_result_success_flag() {
        let now = now_utc();
        let ok = StageResult::success("a", now, now, 0.1, json!(null));
        let failed = StageResult::failed("b", now, now, 0.1, "boom");

        assert!(RunResult::new(Uuid::new_v4(), now, now, 0.2, vec![ok.clone()]).success);
        assert!(!RunResult::new(Uuid::new_v4(), now, now, 0.2, vec![ok, failed]).success);
        assert!(RunResult::new(Uuid::new_v4(), now, now, 0.0, Vec::new()).success);
    }

    #[test]
    fn test_run_result_lookup_and_filters() {
        let now = now_utc();
        let run = RunResult::new(
            Uuid::new_v4(),
            now,
            now,
            1.0,
            vec![
                StageResult::success("a", now, now, 0.1, json!(1)),
                StageResult::failed("b", now, now, 0.1, "boom"),
                StageResult::skipped("c", now, vec!["b".to_string()]),
            ],
        );

        assert_eq!(run.stage("b").unwrap().status, StageStatus::Failed);
        assert!(run.stage("missing").is_none());
        assert_eq!(run.succeeded(), vec!["a"]);
        assert_eq!(run.failed(), vec!["b"]);
        assert_eq!(run.skipped(), vec!["c"]);

        let value = serde_json::to_value(&run).unwrap();
        for key in ["runId", "startedAt", "finishedAt", "durationMs", "stages", "success"] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
    }
}
