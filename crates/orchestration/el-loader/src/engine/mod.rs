//! Query engine seam and Athena implementation.
//!
//! This module provides the loader's query execution path:
//! - [`QueryEngine`] - the async submit/poll seam
//! - [`AthenaEngine`] - AWS Athena implementation
//! - [`QueryExecutor`] - clean-submit-wait orchestration around the seam

mod athena;
mod executor;

pub use athena::{create_athena_client, AthenaConfig, AthenaEngine};
pub use executor::{PollConfig, QueryExecutor};

use async_trait::async_trait;
use el_error::Result;
use el_types::ExecutionRecord;

/// Submit/poll interface to the managed SQL query service.
///
/// The engine owns all query planning and execution; this seam only
/// starts executions and observes their state.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Submit a query for execution.
    ///
    /// `output_location` is the full URI the engine writes result files to
    /// (e.g. `s3://bucket/events/brand=x/`). Returns the engine-assigned
    /// execution id.
    async fn submit(&self, query: &str, database: &str, output_location: &str) -> Result<String>;

    /// Fetch the current state of an execution.
    async fn poll(&self, execution_id: &str) -> Result<ExecutionRecord>;
}
