//! S3 client configuration and the [`ObjectStore`] implementation.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client;
use el_error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::retry::{with_retry, RetryConfig};
use super::ObjectStore;

/// Maximum keys per delete_objects request (S3 API bound).
const DELETE_BATCH_SIZE: usize = 1000;

/// Configuration for S3 access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// S3 bucket name
    pub bucket: String,

    /// AWS region
    pub region: Option<String>,

    /// Custom endpoint URL (for LocalStack)
    pub endpoint: Option<String>,

    /// Explicit AWS access key (optional)
    pub access_key: Option<String>,

    /// Explicit AWS secret key (optional)
    pub secret_key: Option<String>,

    /// AWS profile name (optional)
    pub profile: Option<String>,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: None,
            endpoint: None,
            access_key: None,
            secret_key: None,
            profile: None,
        }
    }
}

impl S3Config {
    /// Create a new S3Config with the required bucket name.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set a custom endpoint (for LocalStack).
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

/// Create an S3 client from configuration.
pub async fn create_s3_client(config: &S3Config) -> Result<Client> {
    use aws_config::Region;

    let mut aws_config_loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.region {
        aws_config_loader = aws_config_loader.region(Region::new(region.clone()));
    }

    if let Some(endpoint) = &config.endpoint {
        aws_config_loader = aws_config_loader.endpoint_url(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        let credentials =
            aws_sdk_s3::config::Credentials::new(access_key, secret_key, None, None, "el-loader");
        aws_config_loader = aws_config_loader.credentials_provider(credentials);
    }

    if let Some(profile) = &config.profile {
        aws_config_loader = aws_config_loader.profile_name(profile);
    }

    let aws_config = aws_config_loader.load().await;

    let s3_config_builder = aws_sdk_s3::config::Builder::from(&aws_config);

    // Path-style access is required by LocalStack
    let s3_config = if config.endpoint.is_some() {
        s3_config_builder.force_path_style(true).build()
    } else {
        s3_config_builder.build()
    };

    Ok(Client::from_conf(s3_config))
}

/// [`ObjectStore`] implementation over a single S3 bucket.
pub struct S3Store {
    client: Client,
    bucket: String,
    retry: RetryConfig,
}

impl S3Store {
    /// Create a store over `bucket` using an already-built client.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            retry: RetryConfig::default(),
        }
    }

    /// Override the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// The bucket this store is bound to.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let keys = with_retry(&self.retry, "s3_list", || async {
            let mut keys = Vec::new();
            let mut continuation_token: Option<String> = None;

            loop {
                let mut req = self
                    .client
                    .list_objects_v2()
                    .bucket(&self.bucket)
                    .prefix(prefix);

                if let Some(ref token) = continuation_token {
                    req = req.continuation_token(token);
                }

                let resp = req
                    .send()
                    .await
                    .map_err(|e| StoreError::List(format!("{e}")))?;

                if let Some(contents) = resp.contents {
                    keys.extend(contents.into_iter().filter_map(|obj| obj.key));
                }

                if resp.is_truncated == Some(true) {
                    continuation_token = resp.next_continuation_token;
                    if continuation_token.is_none() {
                        break;
                    }
                } else {
                    break;
                }
            }

            Ok::<_, StoreError>(keys)
        })
        .await?;

        debug!(bucket = %self.bucket, prefix = %prefix, count = keys.len(), "Listed objects");
        Ok(keys)
    }

    async fn delete(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            // No-op delete: nothing under the prefix is not an error
            return Ok(());
        }

        for chunk in keys.chunks(DELETE_BATCH_SIZE) {
            let objects = chunk
                .iter()
                .map(|key| {
                    ObjectIdentifier::builder()
                        .key(key)
                        .build()
                        .map_err(|e| StoreError::Delete(format!("{e}")))
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let delete = Delete::builder()
                .set_objects(Some(objects))
                .build()
                .map_err(|e| StoreError::Delete(format!("{e}")))?;

            with_retry(&self.retry, "s3_delete", || async {
                self.client
                    .delete_objects()
                    .bucket(&self.bucket)
                    .delete(delete.clone())
                    .send()
                    .await
                    .map_err(|e| StoreError::Delete(format!("{e}")))?;
                Ok::<_, StoreError>(())
            })
            .await?;
        }

        debug!(bucket = %self.bucket, count = keys.len(), "Deleted objects");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let bytes = with_retry(&self.retry, "s3_get", || async {
            let resp = self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| {
                    let msg = format!("{e}");
                    if msg.contains("NoSuchKey") {
                        StoreError::NotFound(key.to_string())
                    } else {
                        StoreError::Get(msg)
                    }
                })?;

            let bytes = resp
                .body
                .collect()
                .await
                .map_err(|e| StoreError::Get(format!("{e}")))?;

            Ok::<_, StoreError>(bytes.to_vec())
        })
        .await?;

        debug!(bucket = %self.bucket, key = %key, bytes = bytes.len(), "Fetched object");
        Ok(bytes)
    }
}
