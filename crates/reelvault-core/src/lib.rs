//! Reelvault Core Library
//!
//! Domain models, error types, configuration and the storage backend selector
//! shared by every reelvault crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, UploadServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{AspectClass, AssetKind, AssetReference, NewVideo, VideoRecord};
pub use storage_types::StorageBackend;
