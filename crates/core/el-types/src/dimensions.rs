//! Ordered dimensional keys for partitioning and query filtering.
//!
//! A [`Dimensions`] value is an explicit ordered list of `(column, value)`
//! pairs. Order is significant: the same ordering drives partition
//! locations, result sub-paths, and SQL predicates, and it must match the
//! partition-column order declared on the target table. Using a list
//! instead of a map makes that ordering part of the type's contract.

use serde::{Deserialize, Serialize};

/// The caller-supplied dimensional filter driving both query predicates
/// and partition paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pairs: Vec<(String, String)>,
}

impl Dimensions {
    /// Create an empty set of dimensions.
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Build from an ordered list of `(column, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Append a dimension, preserving declaration order.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((column.into(), value.into()));
        self
    }

    /// Ordered column names.
    pub fn columns(&self) -> Vec<&str> {
        self.pairs.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Ordered values.
    pub fn values(&self) -> Vec<&str> {
        self.pairs.iter().map(|(_, v)| v.as_str()).collect()
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True if no dimensions are present.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Order-sensitive check that the columns equal `expected`.
    ///
    /// Callers registering a partition use this to fail fast instead of
    /// silently building a syntactically valid but semantically wrong
    /// location.
    pub fn matches_columns(&self, expected: &[&str]) -> bool {
        self.pairs.len() == expected.len()
            && self
                .pairs
                .iter()
                .zip(expected)
                .all(|((col, _), exp)| col == exp)
    }

    /// Partition location suffix: `value1/value2/.../valueN`.
    pub fn path(&self) -> String {
        self.values().join("/")
    }

    /// Hive-style sub-path: `col1=value1/col2=value2/...`.
    pub fn hive_path(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// SQL filter predicate: `col1='value1' and col2='value2' and ...`.
    pub fn predicate(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{k}='{v}'"))
            .collect::<Vec<_>>()
            .join(" and ")
    }

    /// Partition spec clause: `col1='value1',col2='value2',...`.
    pub fn partition_spec(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{k}='{v}'"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new()
    }
}
