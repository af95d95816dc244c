//! Loader configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a load run.
///
/// Buckets are plain bucket names; the `*_root` accessors expose them as
/// `s3://bucket/` URIs for DDL locations and partition declarations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Bucket holding the raw JSON event logs
    pub source_bucket: String,

    /// Bucket query results are written into
    pub output_bucket: String,

    /// Engine database the tables live in
    pub database: String,
}

impl LoaderConfig {
    /// Create a configuration for the given source and output buckets,
    /// using the engine's default database.
    pub fn new(source_bucket: impl Into<String>, output_bucket: impl Into<String>) -> Self {
        Self {
            source_bucket: source_bucket.into(),
            output_bucket: output_bucket.into(),
            database: "default".to_string(),
        }
    }

    /// Set the engine database.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Source bucket as an `s3://` root URI (trailing slash included).
    pub fn source_root(&self) -> String {
        format!("s3://{}/", self.source_bucket)
    }

    /// Output bucket as an `s3://` root URI (trailing slash included).
    pub fn output_root(&self) -> String {
        format!("s3://{}/", self.output_bucket)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.source_bucket.is_empty() {
            return Err("source_bucket must not be empty".to_string());
        }
        if self.output_bucket.is_empty() {
            return Err("output_bucket must not be empty".to_string());
        }
        if self.database.is_empty() {
            return Err("database must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roots() {
        let config = LoaderConfig::new("raw-logs", "analytics-results");
        assert_eq!(config.source_root(), "s3://raw-logs/");
        assert_eq!(config.output_root(), "s3://analytics-results/");
        assert_eq!(config.database, "default");
    }

    #[test]
    fn test_validate() {
        assert!(LoaderConfig::new("a", "b").validate().is_ok());
        assert!(LoaderConfig::new("", "b").validate().is_err());
        assert!(LoaderConfig::new("a", "").validate().is_err());
        assert!(LoaderConfig::new("a", "b")
            .with_database("")
            .validate()
            .is_err());
    }
}
