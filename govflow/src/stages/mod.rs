//! Stage trait and implementations.
//!
//! A stage's unit of work receives a [`StageContext`] and returns an output
//! value or an error. Registration metadata (id, dependencies) lives on
//! [`StageSpec`].

mod spec;

pub use spec::StageSpec;

use crate::context::StageContext;
use async_trait::async_trait;
use std::fmt::Debug;
use std::future::Future;
use std::marker::PhantomData;

/// Trait for a stage's unit of work.
///
/// Returning `Err` marks the stage `failed` for the current run; the engine
/// keeps scheduling the remaining stages.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// Executes the unit of work.
    async fn execute(&self, ctx: &StageContext) -> anyhow::Result<serde_json::Value>;
}

/// A stage backed by a synchronous closure.
pub struct FnStage<F>
where
    F: Fn(&StageContext) -> anyhow::Result<serde_json::Value> + Send + Sync,
{
    func: F,
}

impl<F> FnStage<F>
where
    F: Fn(&StageContext) -> anyhow::Result<serde_json::Value> + Send + Sync,
{
    /// Creates a new function-based stage.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Debug for FnStage<F>
where
    F: Fn(&StageContext) -> anyhow::Result<serde_json::Value> + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> Stage for FnStage<F>
where
    F: Fn(&StageContext) -> anyhow::Result<serde_json::Value> + Send + Sync,
{
    async fn execute(&self, ctx: &StageContext) -> anyhow::Result<serde_json::Value> {
        (self.func)(ctx)
    }
}

/// A stage backed by a closure returning a future.
pub struct AsyncFnStage<F, Fut>
where
    F: Fn(StageContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<serde_json::Value>> + Send + 'static,
{
    func: F,
    _phantom: PhantomData<fn() -> Fut>,
}

impl<F, Fut> AsyncFnStage<F, Fut>
where
    F: Fn(StageContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<serde_json::Value>> + Send + 'static,
{
    /// Creates a new async function-based stage.
    pub const fn new(func: F) -> Self {
        Self {
            func,
            _phantom: PhantomData,
        }
    }
}

impl<F, Fut> Debug for AsyncFnStage<F, Fut>
where
    F: Fn(StageContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<serde_json::Value>> + Send + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncFnStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> Stage for AsyncFnStage<F, Fut>
where
    F: Fn(StageContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<serde_json::Value>> + Send + 'static,
{
    async fn execute(&self, ctx: &StageContext) -> anyhow::Result<serde_json::Value> {
        (self.func)(ctx.clone()).await
    }
}

/// A stage that does nothing and outputs `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStage;

#[async_trait]
impl Stage for NoOpStage {
    async fn execute(&self, _ctx: &StageContext) -> anyhow::Result<serde_json::Value> {
        Ok(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fn_stage() {
        let stage = FnStage::new(|ctx: &StageContext| Ok(json!({"echo": ctx.input().clone()})));

        let ctx = StageContext::detached("test", json!("hello"));
        let output = stage.execute(&ctx).await.unwrap();
        assert_eq!(output, json!({"echo": "hello"}));
    }

    #[tokio::test]
    async fn test_fn_stage_error() {
        let stage = FnStage::new(|_ctx: &StageContext| Err(anyhow::anyhow!("bad input")));

        let ctx = StageContext::detached("test", json!(null));
        let err = stage.execute(&ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "bad input");
    }

    #[tokio::test]
    async fn test_async_fn_stage() {
        let stage = AsyncFnStage::new(|ctx: StageContext| async move {
            tokio::task::yield_now().await;
            Ok(json!(ctx.stage_id().len()))
        });

        let ctx = StageContext::detached("four", json!(null));
        assert_eq!(stage.execute(&ctx).await.unwrap(), json!(4));
    }

    #[tokio::test]
    async fn test_noop_stage() {
        let ctx = StageContext::detached("noop", json!(null));
        assert_eq!(NoOpStage.execute(&ctx).await.unwrap(), json!(null));
    }
}
