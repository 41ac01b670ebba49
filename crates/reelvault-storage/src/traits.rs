//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::{AssetReference, StorageBackend};
use async_trait::async_trait;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// The upload pipeline depends only on this capability set; the concrete
/// backend is picked once at startup.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `storage_key` and return the reference to persist.
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<AssetReference>;

    /// Upload from a reader without holding the whole body in memory.
    ///
    /// The reader is consumed until EOF.
    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<AssetReference>;

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete an object. An object that is already gone is not an error.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Reference stored on the record for an object written under `storage_key`
    fn reference_for(&self, storage_key: &str) -> AssetReference;

    /// Key of the object a reference points at, if this backend owns it.
    ///
    /// Foreign URLs and composites naming another bucket yield `None`.
    fn key_for_reference(&self, reference: &AssetReference) -> Option<String>;

    /// Time-boxed GET URL for a stored object
    async fn get_presigned_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
