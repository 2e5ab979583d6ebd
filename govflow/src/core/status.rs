//! Stage status enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The terminal status of a stage within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    /// The unit of work completed normally.
    Success,
    /// The unit of work returned an error or panicked.
    Failed,
    /// The unit of work was not invoked because a dependency did not succeed.
    Skipped,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

impl StageStatus {
    /// Returns true if the status indicates success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Name of the counter incremented when a stage ends with this status.
    #[must_use]
    pub const fn counter_key(&self) -> &'static str {
        match self {
            Self::Success => "stages.success",
            Self::Failed => "stages.failed",
            Self::Skipped => "stages.skipped",
        }
    }
}
