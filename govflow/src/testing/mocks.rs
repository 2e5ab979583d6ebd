//! Mock stages for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

use crate::context::StageContext;
use crate::stages::Stage;

/// A stage that records each invocation and returns a fixed value.
#[derive(Debug)]
pub struct RecordingStage {
    output: serde_json::Value,
    calls: Mutex<Vec<StageContext>>,
}

impl RecordingStage {
    /// Creates a recording stage that outputs `null`.
    #[must_use]
    pub fn new() -> Self {
        Self::returning(serde_json::Value::Null)
    }

    /// Creates a recording stage that outputs `output`.
    #[must_use]
    pub fn returning(output: serde_json::Value) -> Self {
        Self {
            output,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns the number of times the stage was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns the context of every call, oldest first.
    #[must_use]
    pub fn recorded_contexts(&self) -> Vec<StageContext> {
        self.calls.lock().clone()
    }

    /// Resets call tracking.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }
}

impl Default for RecordingStage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Stage for RecordingStage {
    async fn execute(&self, ctx: &StageContext) -> anyhow::Result<serde_json::Value> {
        self.calls.lock().push(ctx.clone());
        Ok(self.output.clone())
    }
}

/// A stage that always returns an error.
#[derive(Debug)]
pub struct FailingStage {
    error: String,
}

impl FailingStage {
    /// Creates a new failing stage.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[async_trait]
impl Stage for FailingStage {
    async fn execute(&self, _ctx: &StageContext) -> anyhow::Result<serde_json::Value> {
        Err(anyhow::anyhow!("{}", self.error))
    }
}

/// A stage that panics when executed.
#[derive(Debug)]
pub struct PanickingStage {
    message: String,
}

impl PanickingStage {
    /// Creates a new panicking stage.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Stage for PanickingStage {
    #[allow(clippy::panic)]
    async fn execute(&self, _ctx: &StageContext) -> anyhow::Result<serde_json::Value> {
        panic!("{}", self.message)
    }
}

/// A stage that sleeps before succeeding.
#[derive(Debug)]
pub struct SlowStage {
    delay: Duration,
}

impl SlowStage {
    /// Creates a new slow stage.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Creates a slow stage with delay in milliseconds.
    #[must_use]
    pub const fn with_delay_ms(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

#[async_trait]
impl Stage for SlowStage {
    async fn execute(&self, _ctx: &StageContext) -> anyhow::Result<serde_json::Value> {
        tokio::time::sleep(self.delay).await;
        Ok(serde_json::json!({ "slept_ms": self.delay.as_millis() as u64 }))
    }
}
