//! S3-backed [`ObjectStore`].

use std::error::Error;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region, SharedCredentialsProvider};
use aws_sdk_s3::primitives::ByteStream;

use crate::config::{StorageConfig, public_url_from_template};
use crate::{ObjectStore, StorageError};

#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    public_url_template: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: impl Into<String>, public_url_template: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_url_template: public_url_template.into(),
        }
    }

    /// Build a store from configuration.
    ///
    /// Static credentials and a custom endpoint are used when configured
    /// (path-style addressing for S3-compatible services); otherwise the
    /// default AWS provider chain is loaded.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let region = Region::new(config.region.clone());
        let sdk_config = match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => {
                let credentials =
                    Credentials::new(access_key, secret_key, None, None, "colorbook-static");
                let mut builder = aws_config::SdkConfig::builder()
                    .behavior_version(BehaviorVersion::latest())
                    .region(region)
                    .credentials_provider(SharedCredentialsProvider::new(credentials));
                if let Some(endpoint) = &config.endpoint {
                    builder = builder.endpoint_url(endpoint);
                }
                builder.build()
            }
            _ => {
                let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);
                if let Some(endpoint) = &config.endpoint {
                    loader = loader.endpoint_url(endpoint);
                }
                loader.load().await
            }
        };

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint.is_some())
            .build();

        Self::new(
            Client::from_conf(s3_config),
            config.bucket.clone(),
            config.public_url_template.clone(),
        )
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        tracing::debug!(bucket = %self.bucket, key, size = bytes.len(), "Uploading object");
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, key, "Failed to put object")
            })
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        public_url_from_template(&self.public_url_template, &self.bucket, key)
    }
}
