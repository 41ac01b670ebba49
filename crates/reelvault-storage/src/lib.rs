//! Reelvault Storage Library
//!
//! Storage abstraction for uploaded assets, with a local filesystem backend and
//! an S3-compatible backend built on `object_store`.
//!
//! # Storage key format
//!
//! Keys are `[{aspect}/]{token}{ext}` where `token` is 32 random bytes rendered
//! as unpadded URL-safe base64 and `aspect` is `landscape`, `portrait` or `other`
//! for videos. Keys must not contain `..` or a leading `/`. Generation lives in
//! the `keys` module so all backends agree on the layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod resolver;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{extension_for_content_type, generate_asset_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use reelvault_core::{AssetReference, StorageBackend};
pub use resolver::AssetResolver;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
