//! Error types and classification for eventlake.
//!
//! This crate provides:
//! - [`ElError`] - Top-level error enum for all loader errors
//! - Domain-specific errors ([`EngineError`], [`StoreError`], [`ResultError`])
//! - [`ErrorCategory`] for retry decision making on store operations

use thiserror::Error;

/// Top-level error type for eventlake.
#[derive(Error, Debug)]
pub enum ElError {
    /// Query engine errors (submit, poll, terminal failures)
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Object store errors (list, delete, get)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Result reading/parsing errors
    #[error("Result error: {0}")]
    Result(#[from] ResultError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Query engine errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to submit a query execution
    #[error("Submit failed: {0}")]
    Submit(String),

    /// Failed to poll an execution's status
    #[error("Poll failed: {0}")]
    Poll(String),

    /// The engine returned a response missing a required field
    #[error("Missing field in engine response: {0}")]
    MissingField(String),

    /// A bounded wait expired before the execution reached a terminal state
    #[error("Execution {execution_id} still not terminal after {waited_secs}s")]
    PollTimeout {
        execution_id: String,
        waited_secs: u64,
    },
}

/// Object store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Object not found
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Access denied
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Listing a prefix failed
    #[error("List failed: {0}")]
    List(String),

    /// Batch deletion failed
    #[error("Delete failed: {0}")]
    Delete(String),

    /// Fetching an object failed
    #[error("Get failed: {0}")]
    Get(String),
}

/// Result reading errors.
#[derive(Error, Debug)]
pub enum ResultError {
    /// No result path has been recorded (pipeline has not completed)
    #[error("No result available: {0}")]
    NoResult(String),

    /// The result object is not valid delimited text
    #[error("Malformed result: {0}")]
    Malformed(String),
}

/// Error classification for store-level retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transient error - retry with exponential backoff
    ///
    /// Examples: throttling, 5xx, network timeouts
    Transient,

    /// Permanent error - never retry
    ///
    /// Examples: missing key, access denied, invalid request
    Permanent,
}

/// Classify a store error message for retry purposes.
///
/// Retryable: throttling (SlowDown/TooManyRequests), 5xx responses,
/// timeouts, connection resets. Non-retryable: missing keys/buckets,
/// access denied, 4xx client errors. Unknown errors default to
/// transient so a flaky network does not abort a run prematurely.
pub fn classify_error(error: &str) -> ErrorCategory {
    let error_lower = error.to_lowercase();

    if error_lower.contains("slowdown")
        || error_lower.contains("toomanyrequests")
        || error_lower.contains("throttl")
        || error_lower.contains("service unavailable")
        || error_lower.contains("500")
        || error_lower.contains("502")
        || error_lower.contains("503")
        || error_lower.contains("504")
        || error_lower.contains("timeout")
        || error_lower.contains("connection reset")
        || error_lower.contains("connection refused")
    {
        return ErrorCategory::Transient;
    }

    if error_lower.contains("nosuchkey")
        || error_lower.contains("nosuchbucket")
        || error_lower.contains("accessdenied")
        || error_lower.contains("invalidrequest")
        || error_lower.contains("403")
        || error_lower.contains("404")
        || error_lower.contains("400")
    {
        return ErrorCategory::Permanent;
    }

    ErrorCategory::Transient
}

/// Result type alias using ElError.
pub type Result<T> = std::result::Result<T, ElError>;
