//! Sequential pipeline runner.
//!
//! Executes the planned stages one at a time, in plan order, threading each
//! stage's result into the context of the stages after it.

use super::StageManager;
use crate::config::EngineConfig;
use crate::context::StageContext;
use crate::core::{RunResult, StageResult, StageStatus};
use crate::errors::{DuplicateStageError, GovflowError};
use crate::events::{EventSink, LoggingEventSink, NoOpEventSink, RunEvent, RunEventKind};
use crate::metrics::{stage_duration_key, MetricsCollector};
use crate::observability::SpanTimer;
use crate::stages::StageSpec;
use crate::utils::{format_iso8601, now_utc};
use futures::FutureExt;
use parking_lot::RwLock;
use serde_json::json;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Counter incremented once per completed run.
pub const RUNS_TOTAL_KEY: &str = "runs.total";
/// Timing recorded once per completed run.
pub const RUN_DURATION_KEY: &str = "run.duration";

/// Runs registered stages in dependency order and records the outcome.
///
/// An engine may be shared (e.g. behind an `Arc`) and run concurrently.
/// Each run takes a snapshot of the plan before executing anything, so
/// registrations made during a run only affect later runs.
pub struct GovernanceEngine {
    config: EngineConfig,
    manager: RwLock<StageManager>,
    metrics: Arc<MetricsCollector>,
    history: RwLock<Vec<RunResult>>,
    events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for GovernanceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GovernanceEngine")
            .field("config", &self.config)
            .field("stages", &self.manager.read().stage_ids())
            .field("history_len", &self.history.read().len())
            .finish_non_exhaustive()
    }
}

impl Default for GovernanceEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl GovernanceEngine {
    /// Creates an engine with no stages.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let events: Arc<dyn EventSink> = if config.log_events {
            Arc::new(LoggingEventSink::default())
        } else {
            Arc::new(NoOpEventSink)
        };

        Self {
            config,
            manager: RwLock::new(StageManager::new()),
            metrics: Arc::new(MetricsCollector::new()),
            history: RwLock::new(Vec::new()),
            events,
        }
    }

    /// Creates an engine from an initial list of stages.
    pub fn with_stages(
        config: EngineConfig,
        stages: impl IntoIterator<Item = StageSpec>,
    ) -> Result<Self, GovflowError> {
        let engine = Self::new(config);
        *engine.manager.write() = StageManager::from_stages(stages)?;
        Ok(engine)
    }

    /// Replaces the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    /// Shares an existing metrics collector instead of a private one.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registers a stage.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateStageError` if the id is already registered.
    pub fn register_stage(&self, spec: StageSpec) -> Result<(), DuplicateStageError> {
        self.manager.write().add_stage(spec)
    }

    /// Unregisters a stage.
    pub fn remove_stage(&self, id: &str) -> Option<StageSpec> {
        self.manager.write().remove_stage(id)
    }

    /// Returns a registered stage.
    #[must_use]
    pub fn get_stage(&self, id: &str) -> Option<StageSpec> {
        self.manager.read().get_stage(id).cloned()
    }

    /// Returns the number of registered stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.manager.read().len()
    }

    /// Computes the current execution plan.
    pub fn execution_plan(&self) -> Result<Vec<String>, GovflowError> {
        self.manager.read().execution_plan()
    }

    /// The metrics collector this engine records into.
    #[must_use]
    pub const fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }

    /// Returns a copy of the retained runs, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<RunResult> {
        self.history.read().clone()
    }

    /// Returns the most recently retained run.
    #[must_use]
    pub fn last_run(&self) -> Option<RunResult> {
        self.history.read().last().cloned()
    }

    /// Drops every retained run.
    pub fn clear_history(&self) {
        self.history.write().clear();
    }

    /// Runs the pipeline without metadata.
    pub async fn run_input(&self, input: serde_json::Value) -> Result<RunResult, GovflowError> {
        self.run(input, None).await
    }

    /// Runs every registered stage once against `input`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownDependency` or `CycleDetected` if no plan can be
    /// computed; in that case no stage executes and nothing is recorded.
    /// Stage failures are never returned as errors: they appear in the
    /// returned [`RunResult`].
    pub async fn run(
        &self,
        input: serde_json::Value,
        metadata: Option<serde_json::Value>,
    ) -> Result<RunResult, GovflowError> {
        let run_id = Uuid::new_v4();
        let started_at = now_utc();
        let run_timer = SpanTimer::start(format!("run:{run_id}"));

        let plan = self.manager.read().execution_plan_specs().map_err(|e| {
            error!(engine = %self.config.name, %run_id, error = %e, "Run aborted: no execution plan");
            e
        })?;

        info!(
            engine = %self.config.name,
            %run_id,
            stages = plan.len(),
            "Run started"
        );
        self.events
            .emit(RunEvent::run(
                RunEventKind::RunStarted,
                run_id,
                json!({
                    "engine": self.config.name,
                    "started_at": format_iso8601(&started_at),
                    "plan": plan.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
                }),
            ))
            .await;

        let input = Arc::new(input);
        let metadata = metadata.map(Arc::new);
        let mut results: HashMap<String, StageResult> = HashMap::with_capacity(plan.len());
        let mut ordered = Vec::with_capacity(plan.len());

        for spec in &plan {
            let result = self
                .run_stage(run_id, spec, &input, metadata.as_ref(), &results)
                .await;
            results.insert(spec.id.clone(), result.clone());
            ordered.push(result);
        }

        let finished_at = now_utc();
        let duration_ms = run_timer.finish();
        let run = RunResult::new(run_id, started_at, finished_at, duration_ms, ordered);

        self.metrics.increment(RUNS_TOTAL_KEY);
        self.metrics.record_timing(RUN_DURATION_KEY, duration_ms);

        if self.config.retain_history {
            self.history.write().push(run.clone());
        }

        info!(
            engine = %self.config.name,
            %run_id,
            success = run.success,
            duration_ms,
            failed = ?run.failed(),
            skipped = ?run.skipped(),
            "Run completed"
        );
        self.events
            .emit(RunEvent::run(
                RunEventKind::RunCompleted,
                run_id,
                json!({
                    "success": run.success,
                    "duration_ms": duration_ms,
                    "finished_at": format_iso8601(&finished_at),
                }),
            ))
            .await;

        Ok(run)
    }

    /// Processes one planned stage: skip it, or invoke and time it.
    async fn run_stage(
        &self,
        run_id: Uuid,
        spec: &StageSpec,
        input: &Arc<serde_json::Value>,
        metadata: Option<&Arc<serde_json::Value>>,
        results: &HashMap<String, StageResult>,
    ) -> StageResult {
        let blocked_by: Vec<String> = spec
            .dependencies
            .iter()
            .filter(|dep| !results.get(*dep).is_some_and(StageResult::is_success))
            .cloned()
            .collect();

        if !blocked_by.is_empty() {
            let result = StageResult::skipped(&spec.id, now_utc(), blocked_by);
            warn!(%run_id, stage = %spec.id, blocked_by = ?result.blocked_by, "Stage skipped");
            self.metrics.increment(StageStatus::Skipped.counter_key());
            self.events
                .emit(RunEvent::stage(
                    RunEventKind::StageSkipped,
                    run_id,
                    &spec.id,
                    json!({
                        "reason": result.skipped_reason,
                        "blocked_by": result.blocked_by,
                    }),
                ))
                .await;
            return result;
        }

        let ctx = StageContext::new(
            run_id,
            &spec.id,
            Arc::clone(input),
            results.clone(),
            metadata.cloned(),
        );

        debug!(%run_id, stage = %spec.id, "Stage started");
        self.events
            .emit(RunEvent::stage(
                RunEventKind::StageStarted,
                run_id,
                &spec.id,
                json!(null),
            ))
            .await;

        let started_at = now_utc();
        let timer = SpanTimer::start(&spec.id);
        let outcome = AssertUnwindSafe(spec.runner.execute(&ctx))
            .catch_unwind()
            .await;
        let duration_ms = timer.finish();
        let finished_at = now_utc();

        self.metrics
            .record_timing(&stage_duration_key(&spec.id), duration_ms);

        let result = match outcome {
            Ok(Ok(output)) => {
                StageResult::success(&spec.id, started_at, finished_at, duration_ms, output)
            }
            Ok(Err(err)) => {
                StageResult::failed(&spec.id, started_at, finished_at, duration_ms, format!("{err:#}"))
            }
            Err(payload) => StageResult::failed(
                &spec.id,
                started_at,
                finished_at,
                duration_ms,
                format!("stage panicked: {}", panic_message(payload.as_ref())),
            ),
        };
        self.metrics.increment(result.status.counter_key());

        if result.is_success() {
            debug!(%run_id, stage = %spec.id, duration_ms, "Stage completed");
            self.events
                .emit(RunEvent::stage(
                    RunEventKind::StageCompleted,
                    run_id,
                    &spec.id,
                    json!({ "duration_ms": duration_ms }),
                ))
                .await;
        } else {
            warn!(
                %run_id,
                stage = %spec.id,
                duration_ms,
                errors = ?result.errors,
                "Stage failed"
            );
            self.events
                .emit(RunEvent::stage(
                    RunEventKind::StageFailed,
                    run_id,
                    &spec.id,
                    json!({ "duration_ms": duration_ms, "errors": result.errors }),
                ))
                .await;
        }

        result
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}
