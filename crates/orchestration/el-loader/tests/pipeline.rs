//! Pipeline and executor tests with scripted mock collaborators.

use async_trait::async_trait;
use el_error::{ElError, EngineError, Result};
use el_loader::config::LoaderConfig;
use el_loader::engine::{PollConfig, QueryEngine, QueryExecutor};
use el_loader::pipeline::{LoadOutcome, LoadPipeline, PipelineStep};
use el_loader::store::ObjectStore;
use el_types::{Dimensions, ExecutionRecord, ExecutionStatus};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A recorded submission.
#[derive(Debug, Clone)]
struct Submission {
    execution_id: String,
    query: String,
    database: String,
    output_location: String,
}

/// Engine that succeeds every execution on first poll, except those whose
/// query contains `fail_on`.
#[derive(Default)]
struct MockEngine {
    submissions: Arc<Mutex<Vec<Submission>>>,
    fail_on: Option<&'static str>,
}

impl MockEngine {
    fn new() -> Self {
        Self::default()
    }

    fn failing_on(fail_on: &'static str) -> Self {
        Self {
            fail_on: Some(fail_on),
            ..Self::default()
        }
    }
}

#[async_trait]
impl QueryEngine for MockEngine {
    async fn submit(&self, query: &str, database: &str, output_location: &str) -> Result<String> {
        let mut submissions = self.submissions.lock().unwrap();
        let execution_id = format!("exec-{}", submissions.len() + 1);
        submissions.push(Submission {
            execution_id: execution_id.clone(),
            query: query.to_string(),
            database: database.to_string(),
            output_location: output_location.to_string(),
        });
        Ok(execution_id)
    }

    async fn poll(&self, execution_id: &str) -> Result<ExecutionRecord> {
        let submissions = self.submissions.lock().unwrap();
        let submission = submissions
            .iter()
            .find(|s| s.execution_id == execution_id)
            .expect("poll for unknown execution");

        let failed = self
            .fail_on
            .is_some_and(|marker| submission.query.contains(marker));

        Ok(ExecutionRecord {
            execution_id: execution_id.to_string(),
            status: if failed {
                ExecutionStatus::Failed
            } else {
                ExecutionStatus::Succeeded
            },
            state_change_reason: failed.then(|| "HIVE_BAD_DATA: injected".to_string()),
            output_location: Some(format!("{}{}.csv", submission.output_location, execution_id)),
            execution_time_ms: Some(1200),
            data_scanned_bytes: Some(4 * 1024 * 1024),
        })
    }
}

/// Engine that replays a scripted status sequence, counting polls.
struct SequenceEngine {
    statuses: Mutex<VecDeque<ExecutionStatus>>,
    polls: Mutex<usize>,
}

impl SequenceEngine {
    fn new(statuses: &[ExecutionStatus]) -> Self {
        Self {
            statuses: Mutex::new(statuses.iter().copied().collect()),
            polls: Mutex::new(0),
        }
    }

    fn poll_count(&self) -> usize {
        *self.polls.lock().unwrap()
    }
}

#[async_trait]
impl QueryEngine for SequenceEngine {
    async fn submit(&self, _query: &str, _database: &str, _output: &str) -> Result<String> {
        Ok("exec-1".to_string())
    }

    async fn poll(&self, execution_id: &str) -> Result<ExecutionRecord> {
        *self.polls.lock().unwrap() += 1;
        let status = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .expect("polled past the scripted sequence");
        Ok(ExecutionRecord {
            execution_id: execution_id.to_string(),
            status,
            state_change_reason: None,
            output_location: Some("s3://out/path/exec-1.csv".to_string()),
            execution_time_ms: None,
            data_scanned_bytes: None,
        })
    }
}

/// Store that tracks list/delete calls and always lists empty.
#[derive(Default)]
struct CountingStore {
    list_calls: Mutex<usize>,
    delete_calls: Mutex<usize>,
}

impl CountingStore {
    fn new() -> Self {
        Self::default()
    }

    fn list_count(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    fn delete_count(&self) -> usize {
        *self.delete_calls.lock().unwrap()
    }
}

#[async_trait]
impl ObjectStore for CountingStore {
    async fn list(&self, _prefix: &str) -> Result<Vec<String>> {
        *self.list_calls.lock().unwrap() += 1;
        Ok(vec![])
    }

    async fn delete(&self, _keys: &[String]) -> Result<()> {
        *self.delete_calls.lock().unwrap() += 1;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        Err(el_error::StoreError::NotFound(key.to_string()).into())
    }
}

fn fast_poll() -> PollConfig {
    PollConfig::new().with_interval(Duration::from_millis(1))
}

fn sample_dims() -> Dimensions {
    Dimensions::new()
        .with("brand", "x")
        .with("tracker", "y")
        .with("channel", "z")
        .with("year", "2020")
        .with("month", "01")
        .with("day", "01")
}

#[tokio::test]
async fn executor_cleans_once_for_nonempty_path() {
    let engine = MockEngine::new();
    let store = CountingStore::new();
    let executor =
        QueryExecutor::new(engine, store, "default", "out-bucket").with_poll(fast_poll());

    executor.execute("select 1", "events/").await.unwrap();
    assert_eq!(executor.store().list_count(), 1);
    // The empty listing still issues a no-op delete
    assert_eq!(executor.store().delete_count(), 1);
}

#[tokio::test]
async fn executor_skips_cleaning_for_empty_path() {
    let engine = MockEngine::new();
    let store = CountingStore::new();
    let executor =
        QueryExecutor::new(engine, store, "default", "out-bucket").with_poll(fast_poll());

    executor.execute("select 1", "").await.unwrap();
    assert_eq!(executor.store().list_count(), 0);
}

#[tokio::test]
async fn wait_returns_only_on_terminal_status() {
    let engine = SequenceEngine::new(&[
        ExecutionStatus::Running,
        ExecutionStatus::Running,
        ExecutionStatus::Succeeded,
    ]);
    let store = CountingStore::new();
    let executor =
        QueryExecutor::new(engine, store, "default", "out-bucket").with_poll(fast_poll());

    let record = executor.execute("select 1", "").await.unwrap();
    assert_eq!(record.status, ExecutionStatus::Succeeded);
    // Two delay cycles: three polls for running/running/succeeded
    assert_eq!(executor.engine().poll_count(), 3);
}

#[tokio::test]
async fn queued_counts_as_nonterminal() {
    let engine = SequenceEngine::new(&[
        ExecutionStatus::Queued,
        ExecutionStatus::Running,
        ExecutionStatus::Cancelled,
    ]);
    let store = CountingStore::new();
    let executor =
        QueryExecutor::new(engine, store, "default", "out-bucket").with_poll(fast_poll());

    let record = executor.execute("select 1", "").await.unwrap();
    assert_eq!(record.status, ExecutionStatus::Cancelled);
    assert_eq!(executor.engine().poll_count(), 3);
}

#[tokio::test]
async fn bounded_wait_times_out() {
    // Forever-running execution
    let engine = SequenceEngine::new(&[ExecutionStatus::Running; 64]);
    let store = CountingStore::new();
    let executor = QueryExecutor::new(engine, store, "default", "out-bucket").with_poll(
        PollConfig::new()
            .with_interval(Duration::from_millis(1))
            .with_timeout(Duration::from_millis(5)),
    );

    let result = executor.execute("select 1", "").await;
    assert!(matches!(
        result,
        Err(ElError::Engine(EngineError::PollTimeout { .. }))
    ));
}

#[tokio::test]
async fn successful_run_executes_steps_in_order() {
    let engine = MockEngine::new();
    let submissions = engine.submissions.clone();
    let store = CountingStore::new();
    let executor =
        QueryExecutor::new(engine, store, "default", "out-bucket").with_poll(fast_poll());
    let pipeline = LoadPipeline::new(executor, LoaderConfig::new("src-bucket", "out-bucket"))
        .unwrap();

    let outcome = pipeline.run(&sample_dims()).await.unwrap();

    let submissions = submissions.lock().unwrap().clone();
    let queries: Vec<&str> = submissions.iter().map(|s| s.query.as_str()).collect();
    assert_eq!(queries.len(), 9);
    assert!(queries[0].starts_with("CREATE EXTERNAL TABLE IF NOT EXISTS events "));
    assert!(queries[1].starts_with("CREATE EXTERNAL TABLE IF NOT EXISTS events_formatted "));
    assert!(queries[2].starts_with("CREATE EXTERNAL TABLE IF NOT EXISTS event_details "));
    assert!(queries[3].starts_with("alter table events add if not exists partition "));
    assert!(queries[4].contains("from events "));
    assert_eq!(queries[5], "MSCK REPAIR TABLE events_formatted");
    assert!(queries[6].contains("count(distinct device_id)"));
    assert!(queries[7].starts_with("alter table event_details add if not exists partition "));
    assert!(queries[8].contains("from event_details "));

    // Every execution ran against the configured database
    assert!(submissions.iter().all(|s| s.database == "default"));

    // Extractions write to their hive-style prefixes under the output bucket
    assert_eq!(
        submissions[4].output_location,
        "s3://out-bucket/events/brand=x/tracker=y/channel=z/year=2020/month=01/day=01/"
    );
    assert_eq!(
        submissions[6].output_location,
        "s3://out-bucket/dau/brand=x/tracker=y/channel=z/year=2020/month=01/day=01/"
    );

    // The recorded details path is the output location minus the bucket root
    match outcome {
        LoadOutcome::Completed {
            details_path,
            report,
        } => {
            assert_eq!(
                details_path,
                "event_details/brand=x/tracker=y/channel=z/year=2020/month=01/day=01/exec-9.csv"
            );
            assert_eq!(report.steps.len(), 3);
            assert!(report.completed_at.is_some());
        }
        LoadOutcome::Failed { step, reason, .. } => {
            panic!("pipeline failed at {step}: {reason}")
        }
    }
}

#[tokio::test]
async fn failed_events_extraction_stops_pipeline() {
    let engine = MockEngine::failing_on("from events ");
    let submissions = engine.submissions.clone();
    let store = CountingStore::new();
    let executor =
        QueryExecutor::new(engine, store, "default", "out-bucket").with_poll(fast_poll());
    let pipeline = LoadPipeline::new(executor, LoaderConfig::new("src-bucket", "out-bucket"))
        .unwrap();

    let outcome = pipeline.run(&sample_dims()).await.unwrap();

    match outcome {
        LoadOutcome::Failed { step, reason, .. } => {
            assert_eq!(step, PipelineStep::ExtractingEvents);
            assert!(reason.contains("HIVE_BAD_DATA"));
        }
        LoadOutcome::Completed { .. } => panic!("pipeline should have failed"),
    }

    // Stopped before the refresh: three declares, one partition add, one
    // failed extraction
    let queries: Vec<String> = submissions
        .lock()
        .unwrap()
        .iter()
        .map(|s| s.query.clone())
        .collect();
    assert_eq!(queries.len(), 5);
    assert!(!queries.iter().any(|q| q.contains("MSCK REPAIR")));
    assert!(!queries.iter().any(|q| q.contains("count(distinct device_id)")));
}

#[tokio::test]
async fn mismatched_dimensions_fail_fast() {
    let engine = MockEngine::new();
    let submissions = engine.submissions.clone();
    let store = CountingStore::new();
    let executor =
        QueryExecutor::new(engine, store, "default", "out-bucket").with_poll(fast_poll());
    let pipeline = LoadPipeline::new(executor, LoaderConfig::new("src-bucket", "out-bucket"))
        .unwrap();

    let wrong_order = Dimensions::new()
        .with("year", "2020")
        .with("month", "01")
        .with("day", "01")
        .with("brand", "x")
        .with("tracker", "y")
        .with("channel", "z");

    let result = pipeline.run(&wrong_order).await;
    assert!(matches!(result, Err(ElError::Config(_))));

    // Table declarations ran; no partition was registered and nothing was
    // extracted
    let queries: Vec<String> = submissions
        .lock()
        .unwrap()
        .iter()
        .map(|s| s.query.clone())
        .collect();
    assert_eq!(queries.len(), 3);
    assert!(queries.iter().all(|q| q.starts_with("CREATE EXTERNAL TABLE")));
}
