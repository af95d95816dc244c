//! Partition registration and discovery.

use el_error::{ElError, Result};
use el_types::{CatalogTable, Dimensions, ExecutionRecord};
use tracing::{info, warn};

use super::METADATA_PREFIX;
use crate::engine::{QueryEngine, QueryExecutor};
use crate::store::ObjectStore;

/// Register the partition addressed by `dims` on `table`, pointing at the
/// matching sub-path under `source_root`.
///
/// The dimension columns must equal the table's declared partition
/// columns in the same order; a mismatch would produce a syntactically
/// valid but semantically wrong location, so it is rejected up front.
/// Re-declaring an existing partition is a no-op (`ADD IF NOT EXISTS`),
/// and partitions are never deleted by this system.
pub async fn add_partition<E: QueryEngine, S: ObjectStore>(
    executor: &QueryExecutor<E, S>,
    table: CatalogTable,
    source_root: &str,
    dims: &Dimensions,
) -> Result<ExecutionRecord> {
    if !dims.matches_columns(table.partition_columns()) {
        return Err(ElError::Config(format!(
            "dimension columns {:?} do not match partition columns {:?} of table {}",
            dims.columns(),
            table.partition_columns(),
            table
        )));
    }

    let query = format!(
        "alter table {table} add if not exists partition ({spec}) location '{source_root}{path}'",
        spec = dims.partition_spec(),
        path = dims.path(),
    );

    let record = executor.execute(&query, METADATA_PREFIX).await?;
    if record.succeeded() {
        info!(table = %table, location = %dims.path(), "Partition added");
    } else {
        warn!(
            table = %table,
            reason = %record.failure_reason(),
            "Partition declaration did not succeed"
        );
    }
    Ok(record)
}

/// Run partition auto-discovery on `events_formatted`.
///
/// The events extraction writes hive-style `key=value` directories under
/// the table's location, which the engine can discover on its own; the
/// repair makes those partitions queryable before the DAU extraction
/// reads them.
pub async fn refresh_partitions<E: QueryEngine, S: ObjectStore>(
    executor: &QueryExecutor<E, S>,
) -> Result<ExecutionRecord> {
    let query = format!("MSCK REPAIR TABLE {}", CatalogTable::EventsFormatted);
    let record = executor.execute(&query, METADATA_PREFIX).await?;
    if record.succeeded() {
        info!("events_formatted partitions refreshed");
    } else {
        warn!(
            reason = %record.failure_reason(),
            "Partition refresh did not succeed"
        );
    }
    Ok(record)
}
