//! Stage registration record.

use super::{AsyncFnStage, FnStage, Stage};
use crate::context::StageContext;
use std::future::Future;
use std::sync::Arc;

/// A registered stage: identity, declared dependencies and unit of work.
#[derive(Debug, Clone)]
pub struct StageSpec {
    /// The unique id of the stage.
    pub id: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Ids of stages this stage depends on, in declaration order, without duplicates.
    pub dependencies: Vec<String>,
    /// The unit of work.
    pub runner: Arc<dyn Stage>,
}

impl StageSpec {
    /// Creates a new stage specification with no dependencies.
    #[must_use]
    pub fn new(id: impl Into<String>, runner: Arc<dyn Stage>) -> Self {
        Self {
            id: id.into(),
            description: None,
            dependencies: Vec::new(),
            runner,
        }
    }

    /// Creates a stage from a synchronous closure.
    #[must_use]
    pub fn from_fn<F>(id: impl Into<String>, func: F) -> Self
    where
        F: Fn(&StageContext) -> anyhow::Result<serde_json::Value> + Send + Sync + 'static,
    {
        Self::new(id, Arc::new(FnStage::new(func)))
    }

    /// Creates a stage from a closure returning a future.
    #[must_use]
    pub fn from_async_fn<F, Fut>(id: impl Into<String>, func: F) -> Self
    where
        F: Fn(StageContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<serde_json::Value>> + Send + 'static,
    {
        Self::new(id, Arc::new(AsyncFnStage::new(func)))
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a dependency. Repeated ids are ignored.
    #[must_use]
    pub fn with_dependency(mut self, dep: impl Into<String>) -> Self {
        let dep = dep.into();
        if !self.dependencies.contains(&dep) {
            self.dependencies.push(dep);
        }
        self
    }

    /// Adds several dependencies.
    #[must_use]
    pub fn with_dependencies(self, deps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        deps.into_iter().fold(self, |spec, dep| spec.with_dependency(dep))
    }

    /// Returns true if the stage declares any dependency.
    #[must_use]
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::NoOpStage;

    #[test]
    fn test_stage_spec_creation() {
        let spec = StageSpec::new("test", Arc::new(NoOpStage))
            .with_description("does nothing")
            .with_dependencies(["dep1", "dep2"]);

        assert_eq!(spec.id, "test");
        assert_eq!(spec.description.as_deref(), Some("does nothing"));
        assert_eq!(spec.dependencies, vec!["dep1", "dep2"]);
        assert!(spec.has_dependencies());
    }

    #[test]
    fn test_dependencies_are_deduplicated() {
        let spec = StageSpec::new("test", Arc::new(NoOpStage))
            .with_dependencies(["b", "a", "b"])
            .with_dependency("a");

        assert_eq!(spec.dependencies, vec!["b", "a"]);
    }

    #[test]
    fn test_from_fn() {
        let spec = StageSpec::from_fn("one", |_ctx| Ok(serde_json::json!(1)));

        assert_eq!(spec.id, "one");
        assert!(!spec.has_dependencies());
    }
}
