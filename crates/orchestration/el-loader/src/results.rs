//! Reading the details extraction result into memory.

use el_error::{ElError, Result, ResultError};
use tracing::{debug, info};

use crate::store::ObjectStore;

/// One geolocated event from the details result.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetailRecord {
    pub device_id: String,
    pub event_time: String,
    pub country: String,
    /// Parsed coordinate, absent when the source field was empty or not
    /// a number
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub user_id: String,
}

impl EventDetailRecord {
    /// True if both coordinates are present.
    pub fn has_location(&self) -> bool {
        self.longitude.is_some() && self.latitude.is_some()
    }
}

/// The parsed details result, bounded to a row limit at read time.
///
/// Held in memory for the lifetime of the process; never persisted.
#[derive(Debug, Clone)]
pub struct EventDetailsTable {
    headers: Vec<String>,
    records: Vec<EventDetailRecord>,
}

impl EventDetailsTable {
    /// Assemble a table from already-parsed records.
    pub fn from_records(headers: Vec<String>, records: Vec<EventDetailRecord>) -> Self {
        Self { headers, records }
    }

    /// Column headers as read from the result object.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All parsed records.
    pub fn records(&self) -> &[EventDetailRecord] {
        &self.records
    }

    /// Number of parsed records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no records were parsed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records for one country (exact match on the country code).
    pub fn for_country(&self, country: &str) -> Vec<&EventDetailRecord> {
        self.records
            .iter()
            .filter(|r| r.country == country)
            .collect()
    }
}

/// Fetch the details result object at `details_path` and parse it as CSV
/// into at most `max_rows` records.
///
/// `details_path` is the path recorded by a completed pipeline run,
/// relative to the output bucket. A blank path means no run has
/// completed, which is reported as a distinct "no result available"
/// error rather than a confusing store failure.
pub async fn read_event_details<S: ObjectStore + ?Sized>(
    store: &S,
    details_path: &str,
    max_rows: usize,
) -> Result<EventDetailsTable> {
    if details_path.is_empty() {
        return Err(ElError::Result(ResultError::NoResult(
            "no details result path recorded; run the pipeline to completion first".to_string(),
        )));
    }

    debug!(path = %details_path, max_rows = max_rows, "Reading event details");
    let bytes = store.get(details_path).await?;
    let content = String::from_utf8(bytes).map_err(|e| {
        ResultError::Malformed(format!("result is not valid UTF-8: {e}"))
    })?;

    let table = parse_details_csv(&content, max_rows)?;
    info!(path = %details_path, rows = table.len(), "Event details loaded");
    Ok(table)
}

/// Parse delimited details text into a bounded table.
fn parse_details_csv(content: &str, max_rows: usize) -> Result<EventDetailsTable> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ResultError::Malformed(format!("failed to parse headers: {e}")))?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let column = |name: &str| -> Result<usize> {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            ResultError::Malformed(format!("missing column '{name}' in headers {headers:?}")).into()
        })
    };

    let device_id_idx = column("device_id")?;
    let event_time_idx = column("event_time")?;
    let country_idx = column("country")?;
    let longitude_idx = column("longitude")?;
    let latitude_idx = column("latitude")?;
    let user_id_idx = column("user_id")?;

    let mut records = Vec::new();
    for row in reader.records() {
        if records.len() >= max_rows {
            break;
        }
        let row = row.map_err(|e| ResultError::Malformed(format!("bad row: {e}")))?;

        let field = |idx: usize| row.get(idx).unwrap_or("").to_string();
        records.push(EventDetailRecord {
            device_id: field(device_id_idx),
            event_time: field(event_time_idx),
            country: field(country_idx),
            longitude: row.get(longitude_idx).and_then(|v| v.parse().ok()),
            latitude: row.get(latitude_idx).and_then(|v| v.parse().ok()),
            user_id: field(user_id_idx),
        });
    }

    Ok(EventDetailsTable { headers, records })
}
