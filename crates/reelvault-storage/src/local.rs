use crate::traits::{Storage, StorageError, StorageResult};
use crate::{AssetReference, StorageBackend};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// Local filesystem storage implementation
///
/// Files live under `base_path`, mirroring their keys, and are served
/// statically under `base_url`. References are always direct URLs.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for asset files (e.g., "./assets")
    /// * `base_url` - Base URL the directory is served under (e.g., "http://localhost:8091/assets")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert storage key to filesystem path, refusing keys that could escape
    /// the base directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key.contains("..")
            || storage_key.contains('\\')
            || storage_key.starts_with('/')
        {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_from_reader(
        &self,
        storage_key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<(PathBuf, u64)> {
        let path = self.key_to_path(storage_key)?;
        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        let bytes_copied = tokio::io::copy(reader, &mut file).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write stream to file {}: {}",
                path.display(),
                e
            ))
        })?;

        file.flush().await?;
        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok((path, bytes_copied))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<AssetReference> {
        let start = std::time::Instant::now();
        let mut reader: &[u8] = &data;
        let (path, size) = self.write_from_reader(storage_key, &mut reader).await?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload_with_key successful"
        );

        Ok(self.reference_for(storage_key))
    }

    async fn upload_stream(
        &self,
        storage_key: &str,
        _content_type: &str,
        _content_length: Option<u64>,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<AssetReference> {
        let start = std::time::Instant::now();
        let (path, size) = self
            .write_from_reader(storage_key, reader.as_mut().get_mut())
            .await?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage stream upload successful"
        );

        Ok(self.reference_for(storage_key))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(storage_key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        let start = std::time::Instant::now();

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(StorageError::DeleteFailed(format!(
                    "Failed to delete file {}: {}",
                    path.display(),
                    e
                )))
            }
        }

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn reference_for(&self, storage_key: &str) -> AssetReference {
        AssetReference::Direct(self.generate_url(storage_key))
    }

    fn key_for_reference(&self, reference: &AssetReference) -> Option<String> {
        match reference {
            AssetReference::Direct(url) => url
                .strip_prefix(&self.base_url)
                .and_then(|rest| rest.strip_prefix('/'))
                .filter(|key| !key.is_empty())
                .map(String::from),
            AssetReference::Composite { .. } => None,
        }
    }

    async fn get_presigned_url(
        &self,
        storage_key: &str,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        self.key_to_path(storage_key)?;
        Ok(self.generate_url(storage_key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const BASE_URL: &str = "http://localhost:8091/assets";

    async fn storage(dir: &Path) -> LocalStorage {
        LocalStorage::new(dir, BASE_URL.to_string()).await.unwrap()
    }

    #[tokio::test]
    async fn test_upload_with_key_round_trip() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let reference = storage
            .upload_with_key("abc.png", b"png bytes".to_vec(), "image/png")
            .await
            .unwrap();

        assert_eq!(
            reference,
            AssetReference::Direct(format!("{}/abc.png", BASE_URL))
        );
        assert_eq!(storage.download("abc.png").await.unwrap(), b"png bytes");
    }

    #[tokio::test]
    async fn test_upload_stream_creates_prefix_dir() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;
        let body: &'static [u8] = b"mp4 bytes";

        storage
            .upload_stream("landscape/xyz.mp4", "video/mp4", None, Box::pin(body))
            .await
            .unwrap();

        assert!(dir.path().join("landscape").join("xyz.mp4").exists());
        assert!(storage.exists("landscape/xyz.mp4").await.unwrap());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage.download("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete("../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        assert!(storage.delete("nonexistent/file.png").await.is_ok());

        storage
            .upload_with_key("gone.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        storage.delete("gone.png").await.unwrap();
        assert!(!storage.exists("gone.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_key_for_reference() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let own = storage.reference_for("portrait/a.mp4");
        assert_eq!(
            storage.key_for_reference(&own).as_deref(),
            Some("portrait/a.mp4")
        );

        let foreign = AssetReference::Direct("https://cdn.example.com/a.png".to_string());
        assert_eq!(storage.key_for_reference(&foreign), None);

        let composite = AssetReference::Composite {
            bucket: "reels".to_string(),
            key: "a.png".to_string(),
        };
        assert_eq!(storage.key_for_reference(&composite), None);
    }
}
