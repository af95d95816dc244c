//! Catalog table identities and the shared partition schema.

use serde::{Deserialize, Serialize};

/// Partition columns shared by every catalog table, in declaration order.
pub const PARTITION_COLUMNS: [&str; 6] = ["brand", "tracker", "channel", "year", "month", "day"];

/// The three external tables declared by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogTable {
    /// Raw JSON event records (nested session/date/country fields)
    Events,

    /// Flattened CSV event records derived from `events`
    EventsFormatted,

    /// Raw JSON detail records (adds location/user/extra fields)
    EventDetails,
}

impl CatalogTable {
    /// SQL name of the table.
    pub fn name(&self) -> &'static str {
        match self {
            CatalogTable::Events => "events",
            CatalogTable::EventsFormatted => "events_formatted",
            CatalogTable::EventDetails => "event_details",
        }
    }

    /// Partition columns declared on the table, in order.
    ///
    /// All three tables share [`PARTITION_COLUMNS`]; keeping the accessor
    /// per-table means a future table with a different scheme changes one
    /// match arm, not every call site.
    pub fn partition_columns(&self) -> &'static [&'static str] {
        &PARTITION_COLUMNS
    }
}

impl std::fmt::Display for CatalogTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
