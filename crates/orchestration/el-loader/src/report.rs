//! Per-run statistics for the load pipeline.

use chrono::{DateTime, Utc};
use el_types::ExecutionRecord;
use serde::{Deserialize, Serialize};

use crate::pipeline::PipelineStep;

/// Engine statistics for one completed pipeline step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepStats {
    /// Which step produced the execution
    pub step: PipelineStep,

    /// Engine execution time in milliseconds
    pub execution_time_ms: Option<i64>,

    /// Bytes scanned by the engine
    pub data_scanned_bytes: Option<i64>,
}

/// Statistics for a full pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished (set on completion, success or failure)
    pub completed_at: Option<DateTime<Utc>>,

    /// Per-step engine statistics, in execution order
    pub steps: Vec<StepStats>,
}

impl LoadReport {
    /// Start a new report.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            completed_at: None,
            steps: Vec::new(),
        }
    }

    /// Record the statistics of a step's terminal execution.
    pub fn record(&mut self, step: PipelineStep, record: &ExecutionRecord) {
        self.steps.push(StepStats {
            step,
            execution_time_ms: record.execution_time_ms,
            data_scanned_bytes: record.data_scanned_bytes,
        });
    }

    /// Mark the run as finished.
    pub fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Wall-clock duration of the run, if finished.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.completed_at.map(|end| end - self.started_at)
    }

    /// Total bytes scanned across all recorded steps.
    pub fn total_scanned_bytes(&self) -> i64 {
        self.steps
            .iter()
            .filter_map(|s| s.data_scanned_bytes)
            .sum()
    }
}

impl Default for LoadReport {
    fn default() -> Self {
        Self::new()
    }
}
