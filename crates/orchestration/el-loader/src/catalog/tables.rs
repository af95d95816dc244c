//! External table declarations.
//!
//! Three tables share one partition scheme (brand/tracker/channel/
//! year/month/day). The raw tables read JSON logs in place at the source
//! root; `events_formatted` reads the CSV files the events extraction
//! writes under the output root, which is what lets the DAU query run
//! over flat columns.

use el_error::Result;
use el_types::CatalogTable;
use tracing::{info, warn};

use super::METADATA_PREFIX;
use crate::config::LoaderConfig;
use crate::engine::{QueryEngine, QueryExecutor};
use crate::store::ObjectStore;

const JSON_SERDE: &str = "org.openx.data.jsonserde.JsonSerDe";
const CSV_SERDE: &str = "org.apache.hadoop.hive.serde2.OpenCSVSerde";

/// Render the `CREATE EXTERNAL TABLE IF NOT EXISTS` statement for a table.
///
/// `source_root` and `output_root` are `s3://bucket/` URIs with trailing
/// slashes.
pub fn table_ddl(table: CatalogTable, source_root: &str, output_root: &str) -> String {
    let partition_clause = table
        .partition_columns()
        .iter()
        .map(|c| format!("{c} string"))
        .collect::<Vec<_>>()
        .join(", ");

    match table {
        CatalogTable::Events => format!(
            "CREATE EXTERNAL TABLE IF NOT EXISTS events (\
             meta struct<session_long: string, date: string>, \
             params struct<cc: string>) \
             PARTITIONED BY ({partition_clause}) \
             ROW FORMAT SERDE '{JSON_SERDE}' \
             LOCATION '{source_root}'"
        ),
        CatalogTable::EventsFormatted => format!(
            "CREATE EXTERNAL TABLE IF NOT EXISTS events_formatted (\
             device_id string, event_time string, country string) \
             PARTITIONED BY ({partition_clause}) \
             ROW FORMAT SERDE '{CSV_SERDE}' \
             LOCATION '{output_root}events/'"
        ),
        CatalogTable::EventDetails => format!(
            "CREATE EXTERNAL TABLE IF NOT EXISTS event_details (\
             meta struct<session_long: string, date: timestamp>, \
             params struct<user_id: string, cc: string, long: string, lat: string, \
             extra: struct<user_type: string, language: string>>) \
             PARTITIONED BY ({partition_clause}) \
             ROW FORMAT SERDE '{JSON_SERDE}' \
             LOCATION '{source_root}'"
        ),
    }
}

/// Declare all three tables, idempotently.
///
/// Declarations are `IF NOT EXISTS`, so re-running against an existing
/// catalog is a no-op. The declare queries write to [`METADATA_PREFIX`].
pub async fn initialize_tables<E: QueryEngine, S: ObjectStore>(
    executor: &QueryExecutor<E, S>,
    config: &LoaderConfig,
) -> Result<()> {
    let source_root = config.source_root();
    let output_root = config.output_root();

    for table in [
        CatalogTable::Events,
        CatalogTable::EventsFormatted,
        CatalogTable::EventDetails,
    ] {
        let ddl = table_ddl(table, &source_root, &output_root);
        let record = executor.execute(&ddl, METADATA_PREFIX).await?;
        if !record.succeeded() {
            warn!(
                table = %table,
                reason = %record.failure_reason(),
                "Table declaration did not succeed"
            );
        }
    }

    info!("Tables initialized");
    Ok(())
}
