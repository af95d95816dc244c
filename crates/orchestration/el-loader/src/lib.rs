//! el-loader - Athena/S3 event analytics pipeline orchestration.
//!
//! This crate sequences a managed SQL query service and an object store
//! to materialize event analytics from JSON logs into columnar results:
//!
//! - Idempotent external table and partition declarations
//! - Output prefix cleaning before each result-writing query
//! - Blocking poll-until-terminal query execution (optionally bounded)
//! - Events, daily-active-user, and geolocated details extractions
//! - Bounded CSV result reading and a scatter-plot payload boundary
//!
//! # Example
//!
//! ```ignore
//! use el_loader::config::LoaderConfig;
//! use el_loader::engine::{create_athena_client, AthenaConfig, AthenaEngine, QueryExecutor};
//! use el_loader::pipeline::{LoadOutcome, LoadPipeline};
//! use el_loader::store::{create_s3_client, S3Config, S3Store};
//! use el_types::Dimensions;
//!
//! let config = LoaderConfig::new("raw-logs", "analytics-results");
//! let athena = AthenaEngine::new(create_athena_client(&AthenaConfig::new()).await?);
//! let s3 = create_s3_client(&S3Config::new(&config.output_bucket)).await?;
//! let store = S3Store::new(s3, &config.output_bucket);
//!
//! let executor = QueryExecutor::new(athena, store, &config.database, &config.output_bucket);
//! let pipeline = LoadPipeline::new(executor, config)?;
//!
//! let dims = Dimensions::new()
//!     .with("brand", "acme")
//!     .with("tracker", "app")
//!     .with("channel", "android")
//!     .with("year", "2020")
//!     .with("month", "01")
//!     .with("day", "01");
//!
//! match pipeline.run(&dims).await? {
//!     LoadOutcome::Completed { details_path, .. } => {
//!         eprintln!("details at {details_path}");
//!     }
//!     LoadOutcome::Failed { step, reason, .. } => {
//!         eprintln!("{step} failed: {reason}");
//!     }
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod extract;
pub mod pipeline;
pub mod report;
pub mod results;
pub mod store;
pub mod viz;

pub use config::LoaderConfig;
pub use engine::{AthenaConfig, AthenaEngine, PollConfig, QueryEngine, QueryExecutor};
pub use extract::ExtractionQuery;
pub use pipeline::{LoadOutcome, LoadPipeline, PipelineStep};
pub use report::{LoadReport, StepStats};
pub use results::{read_event_details, EventDetailRecord, EventDetailsTable};
pub use store::{clear_prefix, ObjectStore, S3Config, S3Store};
pub use viz::{CountryScatter, GeoBounds, Landmark, ScatterPoint};
