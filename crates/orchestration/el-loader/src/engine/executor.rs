//! Clean-submit-wait query execution.
//!
//! The executor owns the one-at-a-time execution discipline: clear the
//! output prefix, submit, then block on a poll loop until the engine
//! reports a terminal state. A result prefix is owned exclusively by the
//! single in-flight query targeting it between the clean and the write.

use el_error::{ElError, EngineError, Result};
use el_types::ExecutionRecord;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use super::QueryEngine;
use crate::store::{clear_prefix, ObjectStore};

/// Polling behavior for the blocking wait.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between status polls.
    pub interval: Duration,

    /// Optional bound on the total wait. `None` blocks until the
    /// execution is terminal, matching the original contract; `Some`
    /// yields [`EngineError::PollTimeout`] on expiry.
    pub timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: None,
        }
    }
}

impl PollConfig {
    /// Create a new poll configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the poll interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Bound the total wait.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Executes queries against the engine, cleaning output prefixes first
/// and blocking until each execution is terminal.
pub struct QueryExecutor<E, S> {
    engine: E,
    store: S,
    database: String,
    output_bucket: String,
    poll: PollConfig,
}

impl<E: QueryEngine, S: ObjectStore> QueryExecutor<E, S> {
    /// Create an executor writing results into `output_bucket`.
    pub fn new(
        engine: E,
        store: S,
        database: impl Into<String>,
        output_bucket: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            store,
            database: database.into(),
            output_bucket: output_bucket.into(),
            poll: PollConfig::default(),
        }
    }

    /// Override the polling behavior.
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// The output bucket results are written into.
    pub fn output_bucket(&self) -> &str {
        &self.output_bucket
    }

    /// The store bound to the output bucket.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The engine executions are submitted to.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Execute `query`, writing results under `output_path` in the
    /// output bucket.
    ///
    /// A non-empty `output_path` is cleared first so the new result files
    /// fully replace any previous run's; a cleaning failure aborts the
    /// step. An empty `output_path` skips cleaning (used by callers that
    /// manage their own location). Blocks until the execution reaches a
    /// terminal state and returns the terminal record — including for
    /// failed executions, which are reported through the record's status,
    /// not as an `Err`.
    pub async fn execute(&self, query: &str, output_path: &str) -> Result<ExecutionRecord> {
        if !output_path.is_empty() {
            clear_prefix(&self.store, output_path).await?;
        }

        let output_location = format!("s3://{}/{}", self.output_bucket, output_path);
        let execution_id = self
            .engine
            .submit(query, &self.database, &output_location)
            .await?;

        info!(execution_id = %execution_id, output_path = %output_path, "Query submitted");
        self.wait_terminal(&execution_id).await
    }

    /// Poll until the execution leaves the Queued/Running states.
    async fn wait_terminal(&self, execution_id: &str) -> Result<ExecutionRecord> {
        let mut waited = Duration::ZERO;

        loop {
            let record = self.engine.poll(execution_id).await?;
            if record.status.is_terminal() {
                debug!(
                    execution_id = %execution_id,
                    status = %record.status,
                    "Execution terminal"
                );
                return Ok(record);
            }

            if let Some(timeout) = self.poll.timeout {
                if waited >= timeout {
                    return Err(ElError::Engine(EngineError::PollTimeout {
                        execution_id: execution_id.to_string(),
                        waited_secs: waited.as_secs(),
                    }));
                }
            }

            sleep(self.poll.interval).await;
            waited += self.poll.interval;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_config_defaults() {
        let poll = PollConfig::default();
        assert_eq!(poll.interval, Duration::from_secs(2));
        assert!(poll.timeout.is_none());
    }

    #[test]
    fn test_poll_config_builder() {
        let poll = PollConfig::new()
            .with_interval(Duration::from_millis(500))
            .with_timeout(Duration::from_secs(60));

        assert_eq!(poll.interval, Duration::from_millis(500));
        assert_eq!(poll.timeout, Some(Duration::from_secs(60)));
    }
}
