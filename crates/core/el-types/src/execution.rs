//! Query execution records returned by the engine seam.

use serde::{Deserialize, Serialize};

/// State of a query execution as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// Accepted but not yet running
    Queued,

    /// Currently executing
    Running,

    /// Completed and result files are available
    Succeeded,

    /// Terminated with an engine-side failure
    Failed,

    /// Cancelled before completion
    Cancelled,
}

impl ExecutionStatus {
    /// Returns true once the execution can no longer make progress.
    ///
    /// Queued counts as non-terminal: the engine reports it before Running,
    /// and a queued execution has produced no result files yet.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Succeeded | ExecutionStatus::Failed | ExecutionStatus::Cancelled
        )
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "QUEUED"),
            Self::Running => write!(f, "RUNNING"),
            Self::Succeeded => write!(f, "SUCCEEDED"),
            Self::Failed => write!(f, "FAILED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A snapshot of a query execution.
///
/// Returned by each poll of the engine; consumed immediately by the caller
/// once the status is terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Engine-assigned execution id
    pub execution_id: String,

    /// Current execution state
    pub status: ExecutionStatus,

    /// Engine-supplied failure/cancellation reason, when present
    pub state_change_reason: Option<String>,

    /// Full output location of the result files (e.g. `s3://bucket/path/`)
    pub output_location: Option<String>,

    /// Engine execution time in milliseconds
    pub execution_time_ms: Option<i64>,

    /// Bytes scanned by the engine
    pub data_scanned_bytes: Option<i64>,
}

impl ExecutionRecord {
    /// True if the execution finished successfully.
    pub fn succeeded(&self) -> bool {
        self.status == ExecutionStatus::Succeeded
    }

    /// Failure reason, falling back to the status name when the engine
    /// gave none.
    pub fn failure_reason(&self) -> String {
        self.state_change_reason
            .clone()
            .unwrap_or_else(|| self.status.to_string())
    }
}
