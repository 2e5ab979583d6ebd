//! Error types for the govflow engine.
//!
//! Configuration problems (duplicate ids, unknown dependencies, cycles) are
//! fatal and surface as [`GovflowError`]. Failures inside a stage's unit of
//! work never appear here: the engine records them as data on the stage's
//! [`StageResult`](crate::core::StageResult).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for govflow operations.
#[derive(Debug, Error)]
pub enum GovflowError {
    /// A stage id was registered twice.
    #[error("{0}")]
    DuplicateStage(#[from] DuplicateStageError),

    /// A stage declares a dependency that is not registered.
    #[error("{0}")]
    UnknownDependency(#[from] UnknownDependencyError),

    /// The registered stages contain a dependency cycle.
    #[error("{0}")]
    CycleDetected(#[from] CycleDetectedError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GovflowError {
    /// Returns the structured diagnostic for configuration errors.
    #[must_use]
    pub fn error_info(&self) -> Option<ErrorInfo> {
        match self {
            Self::DuplicateStage(e) => Some(e.error_info()),
            Self::UnknownDependency(e) => Some(e.error_info()),
            Self::CycleDetected(e) => Some(e.error_info()),
            Self::Serialization(_) | Self::Io(_) => None,
        }
    }

    /// Returns true for errors raised while validating stage registrations.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::DuplicateStage(_) | Self::UnknownDependency(_) | Self::CycleDetected(_)
        )
    }
}

/// Structured diagnostic attached to configuration errors.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Error code (e.g., "PLAN-003-CYCLE").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl ErrorInfo {
    /// Creates a new error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: HashMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("code".to_string(), serde_json::json!(self.code));
        map.insert("summary".to_string(), serde_json::json!(self.summary));

        if let Some(ref hint) = self.fix_hint {
            map.insert("fix_hint".to_string(), serde_json::json!(hint));
        }
        if !self.context.is_empty() {
            map.insert("context".to_string(), serde_json::json!(self.context));
        }

        map
    }
}

/// Error raised when a stage id is already registered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Stage '{stage}' is already registered")]
pub struct DuplicateStageError {
    /// The duplicated stage id.
    pub stage: String,
}

impl DuplicateStageError {
    /// Creates a new duplicate stage error.
    #[must_use]
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
        }
    }

    /// Returns the structured diagnostic.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        ErrorInfo::new(
            codes::DUPLICATE,
            format!("Stage id '{}' is registered more than once", self.stage),
        )
        .with_fix_hint("Give every stage a unique id.")
        .with_context_entry("stage", &self.stage)
    }
}

/// Error raised when a stage depends on an id that was never registered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Stage '{stage}' depends on unknown stage '{dependency}'")]
pub struct UnknownDependencyError {
    /// The stage declaring the dependency.
    pub stage: String,
    /// The missing dependency id.
    pub dependency: String,
}

impl UnknownDependencyError {
    /// Creates a new unknown dependency error.
    #[must_use]
    pub fn new(stage: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            dependency: dependency.into(),
        }
    }

    /// Returns the structured diagnostic.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        ErrorInfo::new(
            codes::MISSING_DEP,
            format!("Dependency '{}' not found", self.dependency),
        )
        .with_fix_hint("Register the dependency before computing the execution plan.")
        .with_context_entry("stage", &self.stage)
        .with_context_entry("dependency", &self.dependency)
    }
}

/// Error raised when the registered stages cannot be topologically ordered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Dependency cycle detected: {}", cycle_path.join(" -> "))]
pub struct CycleDetectedError {
    /// Every stage left unscheduled, in registration order.
    pub stages: Vec<String>,
    /// One concrete cycle among the unscheduled stages, closed on its first id.
    pub cycle_path: Vec<String>,
}

impl CycleDetectedError {
    /// Creates a new cycle detected error.
    #[must_use]
    pub fn new(stages: Vec<String>, cycle_path: Vec<String>) -> Self {
        Self { stages, cycle_path }
    }

    /// Returns the structured diagnostic.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        ErrorInfo::new(
            codes::CYCLE,
            format!(
                "Stages contain a dependency cycle: {}",
                self.cycle_path.join(" -> ")
            ),
        )
        .with_fix_hint("Remove one of the dependencies in the cycle to break it.")
        .with_context_entry("unscheduled", self.stages.join(","))
    }
}

/// Error codes carried by [`ErrorInfo`].
pub mod codes {
    /// Duplicate stage id.
    pub const DUPLICATE: &str = "PLAN-001-DUPLICATE";
    /// Unknown dependency id.
    pub const MISSING_DEP: &str = "PLAN-002-MISSING_DEP";
    /// Dependency cycle.
    pub const CYCLE: &str = "PLAN-003-CYCLE";
}

/// Provides default suggestions for configuration error codes.
pub struct ErrorSuggestions;

impl ErrorSuggestions {
    /// Gets a suggestion for a given error code.
    #[must_use]
    pub fn get(code: &str) -> Option<&'static str> {
        match code {
            codes::DUPLICATE => Some(
                "Stage ids share one namespace per manager. \
                 Rename the second stage or remove the first before re-registering.",
            ),
            codes::MISSING_DEP => Some(
                "Ensure all dependencies reference registered stages. \
                 Check for typos in stage ids.",
            ),
            codes::CYCLE => Some(
                "Check your stage dependencies for circular references. \
                 Use a linear chain or fan-out pattern instead.",
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_info_creation() {
        let info = ErrorInfo::new("TEST-001", "Test error")
            .with_fix_hint("Fix this by doing that")
            .with_context_entry("stage", "my_stage");

        assert_eq!(info.code, "TEST-001");
        assert_eq!(info.summary, "Test error");
        assert_eq!(info.fix_hint, Some("Fix this by doing that".to_string()));
        assert_eq!(info.context.get("stage"), Some(&"my_stage".to_string()));
    }

    #[test]
    fn test_error_info_to_dict() {
        let dict = UnknownDependencyError::new("b", "a").error_info().to_dict();

        assert_eq!(dict.get("code").unwrap(), codes::MISSING_DEP);
        assert_eq!(dict["context"]["stage"], "b");
        assert_eq!(dict["context"]["dependency"], "a");
    }

    #[test]
    fn test_unknown_dependency_names_both_stages() {
        let err = UnknownDependencyError::new("report", "fetch");
        let message = err.to_string();

        assert!(message.contains("report"));
        assert!(message.contains("fetch"));
    }

    #[test]
    fn test_cycle_detected_error() {
        let err = CycleDetectedError::new(
            vec!["a".to_string(), "b".to_string()],
            vec!["a".to_string(), "b".to_string(), "a".to_string()],
        );

        assert!(err.to_string().contains("a -> b -> a"));
        assert_eq!(err.error_info().code, codes::CYCLE);
    }

    #[test]
    fn test_govflow_error_classification() {
        let err: GovflowError = DuplicateStageError::new("x").into();
        assert!(err.is_configuration());
        assert_eq!(err.error_info().unwrap().code, codes::DUPLICATE);

        let io: GovflowError = std::io::Error::other("boom").into();
        assert!(!io.is_configuration());
        assert!(io.error_info().is_none());
    }

    #[test]
    fn test_error_suggestions() {
        assert!(ErrorSuggestions::get(codes::CYCLE).is_some());
        assert!(ErrorSuggestions::get(codes::DUPLICATE).is_some());
        assert!(ErrorSuggestions::get("UNKNOWN").is_none());
    }
}
