//! Context handed to a stage's unit of work.

use crate::core::StageResult;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// What a stage sees when it executes.
///
/// Carries the run's original input, every result recorded so far in the
/// run (keyed by stage id), and the caller's optional metadata. Cloning is
/// cheap for the input and metadata, which are shared.
#[derive(Debug, Clone)]
pub struct StageContext {
    run_id: Uuid,
    stage_id: String,
    input: Arc<serde_json::Value>,
    results: HashMap<String, StageResult>,
    metadata: Option<Arc<serde_json::Value>>,
}

impl StageContext {
    /// Creates a new stage context.
    #[must_use]
    pub fn new(
        run_id: Uuid,
        stage_id: impl Into<String>,
        input: Arc<serde_json::Value>,
        results: HashMap<String, StageResult>,
        metadata: Option<Arc<serde_json::Value>>,
    ) -> Self {
        Self {
            run_id,
            stage_id: stage_id.into(),
            input,
            results,
            metadata,
        }
    }

    /// Creates a context for exercising a stage outside of an engine.
    #[must_use]
    pub fn detached(stage_id: impl Into<String>, input: serde_json::Value) -> Self {
        Self::new(
            Uuid::new_v4(),
            stage_id,
            Arc::new(input),
            HashMap::new(),
            None,
        )
    }

    /// Id of the run this stage belongs to.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Id of the executing stage.
    #[must_use]
    pub fn stage_id(&self) -> &str {
        &self.stage_id
    }

    /// The run's original input.
    #[must_use]
    pub fn input(&self) -> &serde_json::Value {
        &self.input
    }

    /// Results of all stages processed earlier in this run.
    #[must_use]
    pub const fn results(&self) -> &HashMap<String, StageResult> {
        &self.results
    }

    /// Result of a prior stage.
    #[must_use]
    pub fn result(&self, stage_id: &str) -> Option<&StageResult> {
        self.results.get(stage_id)
    }

    /// Output value of a prior successful stage.
    #[must_use]
    pub fn output(&self, stage_id: &str) -> Option<&serde_json::Value> {
        self.results.get(stage_id).and_then(|r| r.output.as_ref())
    }

    /// Caller-supplied metadata for the run.
    #[must_use]
    pub fn metadata(&self) -> Option<&serde_json::Value> {
        self.metadata.as_deref()
    }

    /// Attaches results; used when building contexts by hand.
    #[must_use]
    pub fn with_results(mut self, results: HashMap<String, StageResult>) -> Self {
        self.results = results;
        self
    }

    /// Attaches metadata; used when building contexts by hand.
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(Arc::new(metadata));
        self
    }
}
