//! S3 implementation of the object storage gateway

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::Client;
use tracing::debug;

use crate::config::ObjectStoreConfig;
use crate::error::{AppError, Result};
use crate::storage::ObjectStorage;

/// Reads avatar objects from a single configured bucket
pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
}

impl S3ObjectStorage {
    /// Build a client from the object store configuration
    pub fn new(config: &ObjectStoreConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "settings",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .build();

        Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to fetch '{}': {}", key, e)))?;

        let data = object
            .body
            .collect()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to read '{}': {}", key, e)))?;

        debug!(bucket = %self.bucket, key = %key, "Fetched object");
        Ok(data.into_bytes().to_vec())
    }
}
