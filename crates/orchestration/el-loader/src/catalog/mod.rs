//! Table and partition catalog management.
//!
//! This module declares the external tables and partitions the extraction
//! queries read from:
//! - [`initialize_tables`] - idempotent declaration of the three tables
//! - [`add_partition`] - registers one partition by dimensional values
//! - [`refresh_partitions`] - partition auto-discovery on the derived table

mod partitions;
mod tables;

pub use partitions::{add_partition, refresh_partitions};
pub use tables::{initialize_tables, table_ddl};

/// Output prefix for catalog declaration queries.
///
/// DDL executions write their (empty) result files here, never to a data
/// prefix, so declaring tables and partitions cannot clean real results.
pub const METADATA_PREFIX: &str = "tables/";
