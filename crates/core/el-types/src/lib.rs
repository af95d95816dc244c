//! Core types for eventlake.
//!
//! This crate provides the foundational types used throughout the system:
//! - [`Dimensions`] - Ordered dimensional keys driving predicates and paths
//! - [`ExecutionRecord`] / [`ExecutionStatus`] - Query engine execution state
//! - [`TableDef`] - External table declarations and partition schema

pub mod dimensions;
pub mod execution;
pub mod table;

pub use dimensions::*;
pub use execution::*;
pub use table::*;
