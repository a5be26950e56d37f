//! Blob storage for S3-compatible backends
//!
//! Supports MinIO, Cloudflare R2, Backblaze B2, and AWS S3.

mod keys;
mod s3_store;

use async_trait::async_trait;
use thiserror::Error;

pub use keys::{
    original_key, processed_key, timestamped_name, ORIGINALS_NAMESPACE, PROCESSED_NAMESPACE,
};
pub use s3_store::S3BlobStore;

/// Storage-specific errors
///
/// All of these are fatal and non-retryable within a single request.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("S3 connection failed: {0}")]
    ConnectionFailed(String),

    #[error("S3 upload failed for {key}: {message}")]
    UploadFailed { key: String, message: String },
}

/// A stored object together with its resolved public URL.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub path: String,
    pub public_url: String,
}

/// Key-addressed object storage with public-URL resolution.
///
/// The pipeline only ever puts objects and resolves URLs; listing, deletion
/// and retention are out of scope.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `{namespace}/{filename}` and return that path.
    async fn put(
        &self,
        namespace: &str,
        filename: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Resolve the public URL for a previously stored path.
    fn public_url(&self, path: &str) -> String;
}
