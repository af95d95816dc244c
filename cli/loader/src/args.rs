//! CLI argument definitions for the eventlake loader.

use clap::{Parser, ValueEnum};
use el_loader::viz::{GeoBounds, Landmark};

/// Event analytics load pipeline.
///
/// Declares the catalog tables, registers the partition addressed by the
/// supplied dimensions, and extracts events, daily-active-user counts,
/// and geolocated event details into the output bucket. With --country,
/// the details result is read back and emitted as a scatter payload on
/// stdout (one JSON object).
///
/// ## Examples
///
/// Basic usage:
///   eventlake -s raw-logs -o analytics-results \
///       --brand acme --tracker app --channel android \
///       --year 2020 --month 01 --day 01
///
/// With a scatter payload for one country:
///   eventlake -s raw-logs -o analytics-results \
///       --brand acme --tracker app --channel android \
///       --year 2020 --month 01 --day 01 \
///       --country TR --bounds 26.0:36.0:45.0:42.0 \
///       --landmark Istanbul:28.97:41.01 --landmark Ankara:32.85:39.93
#[derive(Parser, Debug)]
#[command(name = "eventlake")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === Buckets and database ===
    /// Bucket holding the raw JSON event logs
    #[arg(short = 's', long, env = "EVENTLAKE_SOURCE_BUCKET")]
    pub source_bucket: String,

    /// Bucket query results are written into
    #[arg(short = 'o', long, env = "EVENTLAKE_OUTPUT_BUCKET")]
    pub output_bucket: String,

    /// Engine database the tables live in
    #[arg(long, default_value = "default")]
    pub database: String,

    // === AWS Configuration ===
    /// AWS region
    #[arg(long, env = "AWS_REGION", default_value = "us-west-2")]
    pub region: String,

    /// Custom S3 endpoint URL (for LocalStack)
    #[arg(long, env = "EVENTLAKE_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// Custom Athena endpoint URL (for emulators)
    #[arg(long, env = "EVENTLAKE_ATHENA_ENDPOINT")]
    pub athena_endpoint: Option<String>,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY")]
    pub secret_key: Option<String>,

    /// AWS profile name
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    // === Run dimensions ===
    /// Brand dimension value
    #[arg(long)]
    pub brand: String,

    /// Tracker dimension value
    #[arg(long)]
    pub tracker: String,

    /// Channel dimension value
    #[arg(long)]
    pub channel: String,

    /// Year dimension value (e.g. 2020)
    #[arg(long)]
    pub year: String,

    /// Month dimension value (zero-padded, e.g. 01)
    #[arg(long)]
    pub month: String,

    /// Day dimension value (zero-padded, e.g. 01)
    #[arg(long)]
    pub day: String,

    // === Polling Options ===
    /// Seconds between execution status polls (must be >= 1)
    #[arg(long, default_value = "2", value_parser = parse_positive_u64)]
    pub poll_interval_secs: u64,

    /// Bound the wait for each execution; omit to wait until terminal
    #[arg(long)]
    pub poll_timeout_secs: Option<u64>,

    // === Result Options ===
    /// Maximum detail rows to read back (must be >= 1)
    #[arg(long, default_value = "1000", value_parser = parse_positive_usize)]
    pub max_rows: usize,

    /// Country code to emit a scatter payload for
    #[arg(long)]
    pub country: Option<String>,

    /// Scatter bounding box as swlon:swlat:nelon:nelat
    #[arg(long, default_value = "-180:-90:180:90", value_parser = parse_bounds)]
    pub bounds: GeoBounds,

    /// Labeled reference point as label:longitude:latitude
    /// (can be specified multiple times)
    #[arg(long = "landmark", value_parser = parse_landmark)]
    pub landmarks: Vec<Landmark>,

    // === Logging Options ===
    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Log level argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Trace level (most verbose)
    Trace,
    /// Debug level
    Debug,
    /// Info level (default)
    Info,
    /// Warning level
    Warn,
    /// Error level (least verbose)
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Parse a positive u64 (>= 1).
fn parse_positive_u64(s: &str) -> Result<u64, String> {
    let value: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if value < 1 {
        return Err(format!("{} is not in 1..", value));
    }
    Ok(value)
}

/// Parse a positive usize (>= 1).
fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if value < 1 {
        return Err(format!("{} is not in 1..", value));
    }
    Ok(value)
}

/// Parse a bounding box spec `swlon:swlat:nelon:nelat`.
fn parse_bounds(s: &str) -> Result<GeoBounds, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "'{}' is not a valid bounding box, expected swlon:swlat:nelon:nelat",
            s
        ));
    }
    let coord = |raw: &str| -> Result<f64, String> {
        raw.parse()
            .map_err(|_| format!("'{}' is not a valid coordinate", raw))
    };
    Ok(GeoBounds {
        south_west: (coord(parts[0])?, coord(parts[1])?),
        north_east: (coord(parts[2])?, coord(parts[3])?),
    })
}

/// Parse a landmark spec `label:longitude:latitude`.
fn parse_landmark(s: &str) -> Result<Landmark, String> {
    Landmark::parse(s).map_err(|e| e.to_string())
}
