use crate::traits::{Storage, StorageError, StorageResult};
use crate::{AssetReference, StorageBackend};
use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// S3 storage implementation
///
/// By default the bucket is treated as private: records store a `bucket,key`
/// composite and every read goes through `get_presigned_url`. With
/// `public_read` set, records store the permanent object URL instead.
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<AmazonS3>,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    public_read: bool,
}

fn content_type_attributes(content_type: &str) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert(Attribute::ContentType, content_type.to_string().into());
    attributes
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `public_read` - Whether objects are publicly readable at their plain URL
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_read: bool,
    ) -> StorageResult<Self> {
        Self::with_builder(
            AmazonS3Builder::from_env(),
            bucket,
            region,
            endpoint_url,
            public_read,
        )
    }

    /// Same as [`S3Storage::new`] but starting from a caller-supplied builder,
    /// e.g. one carrying explicit credentials instead of the environment's.
    pub fn with_builder(
        builder: AmazonS3Builder,
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_read: bool,
    ) -> StorageResult<Self> {
        let mut builder = builder
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store: Arc::new(store),
            bucket,
            region,
            endpoint_url,
            public_read,
        })
    }

    /// Public URL for an object
    ///
    /// For AWS S3: https://{bucket}.s3.{region}.amazonaws.com/{key}
    /// For S3-compatible providers, path-style under the endpoint: {endpoint}/{bucket}/{key}
    fn generate_url(&self, key: &str) -> String {
        format!("{}{}", self.public_url_prefix(), key)
    }

    fn public_url_prefix(&self) -> String {
        match self.endpoint_url {
            Some(ref endpoint) => {
                format!("{}/{}/", endpoint.trim_end_matches('/'), self.bucket)
            }
            None => format!("https://{}.s3.{}.amazonaws.com/", self.bucket, self.region),
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<AssetReference> {
        let size = data.len() as u64;
        let location = Path::from(storage_key.to_string());
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(
                &location,
                PutPayload::from(Bytes::from(data)),
                PutOptions::from(content_type_attributes(content_type)),
            )
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload_with_key failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload_with_key successful"
        );

        Ok(self.reference_for(storage_key))
    }

    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        _content_length: Option<u64>,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<AssetReference> {
        let location = Path::from(storage_key.to_string());
        let start = std::time::Instant::now();

        // Multipart upload once the buffer fills, single put otherwise
        let mut writer = BufWriter::new(self.store.clone(), location)
            .with_attributes(content_type_attributes(content_type));

        let copied = tokio::io::copy(&mut reader, &mut writer).await;
        let size = match copied {
            Ok(size) => size,
            Err(e) => {
                if let Err(abort_err) = writer.abort().await {
                    tracing::warn!(
                        error = %abort_err,
                        key = %storage_key,
                        "Failed to abort S3 multipart upload"
                    );
                }
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 stream upload failed"
                );
                return Err(StorageError::UploadFailed(e.to_string()));
            }
        };

        writer.shutdown().await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 stream upload failed to complete"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 stream upload successful"
        );

        Ok(self.reference_for(storage_key))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        match self.store.delete(&location).await {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let location = Path::from(storage_key.to_string());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn reference_for(&self, storage_key: &str) -> AssetReference {
        if self.public_read {
            AssetReference::Direct(self.generate_url(storage_key))
        } else {
            AssetReference::Composite {
                bucket: self.bucket.clone(),
                key: storage_key.to_string(),
            }
        }
    }

    fn key_for_reference(&self, reference: &AssetReference) -> Option<String> {
        match reference {
            AssetReference::Composite { bucket, key } if *bucket == self.bucket => {
                Some(key.clone())
            }
            AssetReference::Composite { .. } => None,
            AssetReference::Direct(url) => url
                .strip_prefix(&self.public_url_prefix())
                .filter(|key| !key.is_empty())
                .map(String::from),
        }
    }

    async fn get_presigned_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let location = Path::from(storage_key.to_string());
        let url_result: ObjectResult<_> = self
            .store
            .signed_url(Method::GET, &location, expires_in)
            .await;

        let url = url_result
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    "S3 presign failed"
                );
                StorageError::SigningFailed(e.to_string())
            })?
            .to_string();

        Ok(url)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::AssetResolver;
    use reelvault_core::{NewVideo, VideoRecord};
    use uuid::Uuid;

    async fn storage(public_read: bool, endpoint: Option<&str>) -> S3Storage {
        S3Storage::with_builder(
            AmazonS3Builder::new()
                .with_access_key_id("AKIDEXAMPLE")
                .with_secret_access_key("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY"),
            "reels".to_string(),
            "us-east-1".to_string(),
            endpoint.map(String::from),
            public_read,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_private_bucket_stores_composite() {
        let storage = storage(false, None).await;
        let reference = storage.reference_for("landscape/abc.mp4");
        assert_eq!(reference.to_string(), "reels,landscape/abc.mp4");
        assert_eq!(
            storage.key_for_reference(&reference).as_deref(),
            Some("landscape/abc.mp4")
        );
    }

    #[tokio::test]
    async fn test_public_bucket_stores_url() {
        let storage = storage(true, Some("http://localhost:9000/")).await;
        let reference = storage.reference_for("abc.png");
        assert_eq!(
            reference,
            AssetReference::Direct("http://localhost:9000/reels/abc.png".to_string())
        );
        assert_eq!(
            storage.key_for_reference(&reference).as_deref(),
            Some("abc.png")
        );
    }

    #[tokio::test]
    async fn test_foreign_references_not_owned() {
        let storage = storage(false, None).await;
        let other_bucket = AssetReference::Composite {
            bucket: "elsewhere".to_string(),
            key: "abc.png".to_string(),
        };
        assert_eq!(storage.key_for_reference(&other_bucket), None);
        let foreign = AssetReference::Direct("https://cdn.example.com/abc.png".to_string());
        assert_eq!(storage.key_for_reference(&foreign), None);
    }

    #[tokio::test]
    async fn test_resolver_signs_private_composite() {
        let storage: Arc<dyn Storage> = Arc::new(storage(false, None).await);
        let resolver = AssetResolver::new(storage, Duration::from_secs(3600));
        let composite = AssetReference::parse("reels,landscape/a.mp4").unwrap();

        let url = resolver.resolve(&composite).await.unwrap();
        assert_ne!(url, "reels,landscape/a.mp4");
        assert!(url.starts_with("https://"), "{url}");
        assert!(url.contains("landscape/a.mp4"), "{url}");
        assert!(url.contains("X-Amz-Signature="), "{url}");
        assert!(url.contains("X-Amz-Expires=3600"), "{url}");
    }

    #[tokio::test]
    async fn test_resolved_record_never_carries_composite() {
        let storage: Arc<dyn Storage> = Arc::new(storage(false, None).await);
        let resolver = AssetResolver::new(storage, Duration::from_secs(3600));
        let mut video = VideoRecord::new(NewVideo {
            title: "t".to_string(),
            description: "d".to_string(),
            user_id: Uuid::new_v4(),
        });
        video.video_url = Some("reels,landscape/a.mp4".to_string());
        video.thumbnail_url = Some("https://cdn.example.com/t.png".to_string());

        let resolved = resolver.resolve_record(video).await.unwrap();
        let video_url = resolved.video_url.unwrap();
        assert!(video_url.contains("X-Amz-Signature="), "{video_url}");
        assert_eq!(
            resolved.thumbnail_url.as_deref(),
            Some("https://cdn.example.com/t.png")
        );
    }
}
