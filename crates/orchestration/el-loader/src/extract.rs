//! Extraction query builders.
//!
//! Three parameterized read operations over the catalog tables. Each
//! builds a `WHERE` predicate from the supplied dimensions and a
//! deterministic hive-style output sub-path under its namespace, so a
//! re-run with the same dimensions overwrites the same result prefix.

use el_types::Dimensions;

/// A rendered extraction query plus its result sub-path in the output
/// bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionQuery {
    /// SQL to submit
    pub sql: String,

    /// Result prefix relative to the output bucket (trailing slash)
    pub output_path: String,
}

impl ExtractionQuery {
    /// Session/date/country columns of the partition's raw events.
    pub fn events(dims: &Dimensions) -> Self {
        Self {
            sql: format!(
                "select meta.session_long as device_id, \
                 meta.date as event_time, \
                 params.cc as country \
                 from events \
                 where {}",
                dims.predicate()
            ),
            output_path: format!("events/{}/", dims.hive_path()),
        }
    }

    /// Events plus location and user columns from the detail records.
    pub fn event_details(dims: &Dimensions) -> Self {
        Self {
            sql: format!(
                "select meta.session_long as device_id, \
                 meta.date as event_time, \
                 params.cc as country, \
                 params.long as longitude, \
                 params.lat as latitude, \
                 params.user_id as user_id \
                 from event_details \
                 where {}",
                dims.predicate()
            ),
            output_path: format!("event_details/{}/", dims.hive_path()),
        }
    }

    /// Distinct active devices per country for the partition.
    ///
    /// The formatted files carry their CSV header as a data row (the
    /// OpenCSV serde does not skip it), so the literal `device_id` value
    /// is excluded, as are rows with no country.
    pub fn dau(dims: &Dimensions) -> Self {
        Self {
            sql: format!(
                "select * from \
                 (select country, count(distinct device_id) as customer_count \
                 from events_formatted \
                 where device_id != 'device_id' and {} \
                 group by country) \
                 where country is not null",
                dims.predicate()
            ),
            output_path: format!("dau/{}/", dims.hive_path()),
        }
    }
}
