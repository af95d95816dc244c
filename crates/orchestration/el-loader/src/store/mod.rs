//! Object store seam and S3 implementation.
//!
//! This module provides the loader's object store operations:
//! - [`ObjectStore`] - the async seam the executor and result reader use
//! - [`S3Store`] - AWS S3 implementation with retry and LocalStack support
//! - [`clear_prefix`] - output path cleaning before a query writes results

mod cleaner;
mod retry;
mod s3;

pub use cleaner::clear_prefix;
pub use retry::{with_retry, RetryConfig};
pub use s3::{create_s3_client, S3Config, S3Store};

use async_trait::async_trait;
use el_error::Result;

/// Object store operations scoped to a single bucket.
///
/// Implementations are bound to one bucket at construction; every key and
/// prefix is relative to it. The production implementation is [`S3Store`];
/// tests substitute scripted mocks.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List all object keys under `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Delete the given keys in batch.
    ///
    /// An empty slice is a no-op and must return `Ok(())`.
    async fn delete(&self, keys: &[String]) -> Result<()>;

    /// Fetch an object's full contents.
    async fn get(&self, key: &str) -> Result<Vec<u8>>;
}
