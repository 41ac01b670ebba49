//! Asset key generation shared by all backends.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::TryRngCore;
use reelvault_core::constants::ASSET_KEY_ENTROPY_BYTES;
use reelvault_core::AspectClass;

use crate::traits::{StorageError, StorageResult};

/// File extension for an accepted content type, with the leading dot.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        "video/mp4" => Some(".mp4"),
        _ => None,
    }
}

/// 32 bytes from the OS generator as unpadded URL-safe base64 (43 chars).
///
/// There is no fallback generator: if the OS source fails the caller gets an error.
pub fn random_token() -> StorageResult<String> {
    let mut bytes = [0u8; ASSET_KEY_ENTROPY_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| StorageError::KeyGeneration(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Generate a fresh storage key: `[{aspect}/]{token}{ext}`.
///
/// Images take no prefix. Collisions are not checked before writing.
pub fn generate_asset_key(
    aspect: Option<AspectClass>,
    content_type: &str,
) -> StorageResult<String> {
    let extension = extension_for_content_type(content_type).ok_or_else(|| {
        StorageError::InvalidKey(format!("No extension for content type {}", content_type))
    })?;
    let prefix = aspect.map(|a| a.key_prefix()).unwrap_or("");
    Ok(format!("{}{}{}", prefix, random_token()?, extension))
}
