//! The load pipeline controller.
//!
//! Drives the strictly sequential step sequence: declare tables, register
//! the events partition, extract events, refresh formatted partitions,
//! extract DAU counts, register the details partition, extract details.
//! Any extraction whose terminal status is not Succeeded short-circuits
//! the run; infrastructure faults surface as errors instead.

use el_error::{EngineError, Result};
use el_types::{CatalogTable, Dimensions, ExecutionRecord};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::catalog::{add_partition, initialize_tables, refresh_partitions};
use crate::config::LoaderConfig;
use crate::engine::{QueryEngine, QueryExecutor};
use crate::extract::ExtractionQuery;
use crate::report::LoadReport;
use crate::store::ObjectStore;

/// Steps of the load pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    Initializing,
    PartitioningEvents,
    ExtractingEvents,
    RefreshingPartitions,
    ExtractingDau,
    PartitioningDetails,
    ExtractingDetails,
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initializing => write!(f, "initializing"),
            Self::PartitioningEvents => write!(f, "partitioning-events"),
            Self::ExtractingEvents => write!(f, "extracting-events"),
            Self::RefreshingPartitions => write!(f, "refreshing-partitions"),
            Self::ExtractingDau => write!(f, "extracting-dau"),
            Self::PartitioningDetails => write!(f, "partitioning-details"),
            Self::ExtractingDetails => write!(f, "extracting-details"),
        }
    }
}

/// Terminal outcome of a pipeline run.
///
/// An engine-side extraction failure is an outcome, not an `Err`: the
/// engine's reason is carried back for reporting and the run simply
/// stops. Already-declared partitions and already-cleaned prefixes are
/// not rolled back.
#[derive(Debug)]
pub enum LoadOutcome {
    /// All steps succeeded.
    Completed {
        /// Details result object, relative to the output bucket
        details_path: String,
        /// Per-step statistics
        report: LoadReport,
    },

    /// An extraction step terminated unsuccessfully.
    Failed {
        /// The step that failed
        step: PipelineStep,
        /// The engine's failure reason
        reason: String,
        /// Statistics for the steps that did run
        report: LoadReport,
    },
}

impl LoadOutcome {
    /// True if the run completed all steps.
    pub fn is_completed(&self) -> bool {
        matches!(self, LoadOutcome::Completed { .. })
    }
}

/// Sequences the load steps over an executor and configuration.
pub struct LoadPipeline<E, S> {
    executor: QueryExecutor<E, S>,
    config: LoaderConfig,
}

impl<E: QueryEngine, S: ObjectStore> LoadPipeline<E, S> {
    /// Create a pipeline; fails fast on an invalid configuration.
    pub fn new(executor: QueryExecutor<E, S>, config: LoaderConfig) -> Result<Self> {
        config.validate().map_err(el_error::ElError::Config)?;
        Ok(Self { executor, config })
    }

    /// The executor this pipeline drives.
    pub fn executor(&self) -> &QueryExecutor<E, S> {
        &self.executor
    }

    /// Run the full load for the partition addressed by `dims`.
    pub async fn run(&self, dims: &Dimensions) -> Result<LoadOutcome> {
        let mut report = LoadReport::new();
        let source_root = self.config.source_root();

        info!(step = %PipelineStep::Initializing, "Declaring tables");
        initialize_tables(&self.executor, &self.config).await?;

        info!(step = %PipelineStep::PartitioningEvents, "Registering events partition");
        add_partition(&self.executor, CatalogTable::Events, &source_root, dims).await?;

        info!(step = %PipelineStep::ExtractingEvents, "Extracting events");
        let query = ExtractionQuery::events(dims);
        let record = self.executor.execute(&query.sql, &query.output_path).await?;
        report.record(PipelineStep::ExtractingEvents, &record);
        if let Some(outcome) = self.check(PipelineStep::ExtractingEvents, &record, &mut report) {
            return Ok(outcome);
        }

        info!(step = %PipelineStep::RefreshingPartitions, "Refreshing formatted partitions");
        refresh_partitions(&self.executor).await?;

        info!(step = %PipelineStep::ExtractingDau, "Extracting daily active users");
        let query = ExtractionQuery::dau(dims);
        let record = self.executor.execute(&query.sql, &query.output_path).await?;
        report.record(PipelineStep::ExtractingDau, &record);
        if let Some(outcome) = self.check(PipelineStep::ExtractingDau, &record, &mut report) {
            return Ok(outcome);
        }

        info!(step = %PipelineStep::PartitioningDetails, "Registering details partition");
        add_partition(&self.executor, CatalogTable::EventDetails, &source_root, dims).await?;

        info!(step = %PipelineStep::ExtractingDetails, "Extracting event details");
        let query = ExtractionQuery::event_details(dims);
        let record = self.executor.execute(&query.sql, &query.output_path).await?;
        report.record(PipelineStep::ExtractingDetails, &record);
        if let Some(outcome) = self.check(PipelineStep::ExtractingDetails, &record, &mut report) {
            return Ok(outcome);
        }

        // Record where the details result landed, relative to the bucket,
        // for the result reader.
        let output_location = record
            .output_location
            .ok_or_else(|| EngineError::MissingField("ResultConfiguration.OutputLocation".to_string()))?;
        let details_path = output_location
            .strip_prefix(&self.config.output_root())
            .unwrap_or(&output_location)
            .to_string();

        report.finish();
        info!(details_path = %details_path, "Load completed");
        Ok(LoadOutcome::Completed {
            details_path,
            report,
        })
    }

    /// Short-circuit into `Failed` when an extraction did not succeed.
    fn check(
        &self,
        step: PipelineStep,
        record: &ExecutionRecord,
        report: &mut LoadReport,
    ) -> Option<LoadOutcome> {
        if record.succeeded() {
            let secs = record.execution_time_ms.unwrap_or(0) as f64 / 1000.0;
            let scanned_mb =
                record.data_scanned_bytes.unwrap_or(0) as f64 / 1024.0 / 1024.0;
            info!(
                step = %step,
                execution_secs = secs,
                scanned_mb = %format!("{scanned_mb:.3}"),
                "Extraction succeeded"
            );
            return None;
        }

        let reason = record.failure_reason();
        error!(step = %step, reason = %reason, "Extraction failed, stopping pipeline");
        let mut report = std::mem::take(report);
        report.finish();
        Some(LoadOutcome::Failed {
            step,
            reason,
            report,
        })
    }
}
