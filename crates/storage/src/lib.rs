//! Public object storage for generated images.
//!
//! Callers depend on the [`ObjectStore`] trait. [`S3ObjectStore`] implements
//! it for any S3-compatible service.

pub mod config;
pub mod s3;

use async_trait::async_trait;

pub use config::StorageConfig;
pub use s3::S3ObjectStore;

/// Errors from the object store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The upload request failed.
    #[error("Upload of '{key}' failed: {message}")]
    Upload { key: String, message: String },
}

/// A bucket that serves uploaded objects at public URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `bytes` under `key` with the given content type.
    ///
    /// Uploading to an existing key overwrites it.
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Public URL at which `key` is served.
    fn public_url(&self, key: &str) -> String;
}
