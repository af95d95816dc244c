//! Athena client configuration and the [`QueryEngine`] implementation.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_athena::types::{QueryExecutionContext, QueryExecutionState, ResultConfiguration};
use aws_sdk_athena::Client;
use el_error::{EngineError, Result};
use el_types::{ExecutionRecord, ExecutionStatus};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::QueryEngine;

/// Configuration for Athena access.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AthenaConfig {
    /// AWS region
    pub region: Option<String>,

    /// Custom endpoint URL (for testing against emulators)
    pub endpoint: Option<String>,

    /// Explicit AWS access key (optional)
    pub access_key: Option<String>,

    /// Explicit AWS secret key (optional)
    pub secret_key: Option<String>,

    /// AWS profile name (optional)
    pub profile: Option<String>,
}

impl AthenaConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set a custom endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set explicit credentials.
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Set the AWS profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

/// Create an Athena client from configuration.
pub async fn create_athena_client(config: &AthenaConfig) -> Result<Client> {
    use aws_config::Region;

    let mut aws_config_loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.region {
        aws_config_loader = aws_config_loader.region(Region::new(region.clone()));
    }

    if let Some(endpoint) = &config.endpoint {
        aws_config_loader = aws_config_loader.endpoint_url(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        let credentials = aws_sdk_athena::config::Credentials::new(
            access_key, secret_key, None, None, "el-loader",
        );
        aws_config_loader = aws_config_loader.credentials_provider(credentials);
    }

    if let Some(profile) = &config.profile {
        aws_config_loader = aws_config_loader.profile_name(profile);
    }

    let aws_config = aws_config_loader.load().await;
    Ok(Client::new(&aws_config))
}

/// [`QueryEngine`] implementation over AWS Athena.
pub struct AthenaEngine {
    client: Client,
}

impl AthenaEngine {
    /// Wrap an already-built Athena client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueryEngine for AthenaEngine {
    async fn submit(&self, query: &str, database: &str, output_location: &str) -> Result<String> {
        let context = QueryExecutionContext::builder().database(database).build();
        let results = ResultConfiguration::builder()
            .output_location(output_location)
            .build();

        let resp = self
            .client
            .start_query_execution()
            .query_string(query)
            .query_execution_context(context)
            .result_configuration(results)
            .send()
            .await
            .map_err(|e| EngineError::Submit(format!("{e}")))?;

        let execution_id = resp
            .query_execution_id
            .ok_or_else(|| EngineError::MissingField("QueryExecutionId".to_string()))?;

        debug!(execution_id = %execution_id, output_location = %output_location, "Submitted query");
        Ok(execution_id)
    }

    async fn poll(&self, execution_id: &str) -> Result<ExecutionRecord> {
        let resp = self
            .client
            .get_query_execution()
            .query_execution_id(execution_id)
            .send()
            .await
            .map_err(|e| EngineError::Poll(format!("{e}")))?;

        let execution = resp
            .query_execution
            .ok_or_else(|| EngineError::MissingField("QueryExecution".to_string()))?;

        let status = execution
            .status
            .as_ref()
            .and_then(|s| s.state.as_ref())
            .ok_or_else(|| EngineError::MissingField("Status.State".to_string()))?;

        let status = map_state(status);
        let state_change_reason = execution
            .status
            .as_ref()
            .and_then(|s| s.state_change_reason.clone());
        let output_location = execution
            .result_configuration
            .as_ref()
            .and_then(|r| r.output_location.clone());
        let (execution_time_ms, data_scanned_bytes) = execution
            .statistics
            .as_ref()
            .map(|s| (s.engine_execution_time_in_millis, s.data_scanned_in_bytes))
            .unwrap_or((None, None));

        Ok(ExecutionRecord {
            execution_id: execution_id.to_string(),
            status,
            state_change_reason,
            output_location,
            execution_time_ms,
            data_scanned_bytes,
        })
    }
}

fn map_state(state: &QueryExecutionState) -> ExecutionStatus {
    match state {
        QueryExecutionState::Queued => ExecutionStatus::Queued,
        QueryExecutionState::Running => ExecutionStatus::Running,
        QueryExecutionState::Succeeded => ExecutionStatus::Succeeded,
        QueryExecutionState::Cancelled => ExecutionStatus::Cancelled,
        // Failed, plus any state added to the API after this was written
        _ => ExecutionStatus::Failed,
    }
}
