use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use reelvault_core::{AppError, AssetKind};
use reelvault_processing::MediaValidator;
use tempfile::NamedTempFile;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

use super::types::{ReceivedFile, SpooledUpload};
use crate::error::HttpAppError;

fn missing_field(kind: AssetKind) -> HttpAppError {
    HttpAppError(AppError::InvalidInput(format!(
        "Missing form field '{}'",
        kind.field_name()
    )))
}

/// Read the part named after `kind` into memory, enforcing the validator's
/// content-type allowlist before any bytes are read and its size cap while reading.
pub async fn read_named_field(
    multipart: &mut Multipart,
    kind: AssetKind,
    validator: &MediaValidator,
) -> Result<ReceivedFile, HttpAppError> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(kind.field_name()) {
            continue;
        }

        let content_type = validator.validate_content_type(field.content_type())?;

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            validator.validate_file_size(data.len() + chunk.len())?;
            data.extend_from_slice(&chunk);
        }
        validator.validate_not_empty(data.len())?;

        return Ok(ReceivedFile { content_type, data });
    }

    Err(missing_field(kind))
}

/// Prefix of every spooled upload file
pub const SPOOL_FILE_PREFIX: &str = "reelvault-upload-";

/// Create the spool file off the async workers.
async fn create_spool_file(spool_dir: &Path) -> Result<NamedTempFile, HttpAppError> {
    let dir: PathBuf = spool_dir.to_path_buf();
    let temp = tokio::task::spawn_blocking(move || {
        std::fs::create_dir_all(&dir)?;
        tempfile::Builder::new()
            .prefix(SPOOL_FILE_PREFIX)
            .suffix(".mp4")
            .tempfile_in(&dir)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Spool file task failed: {}", e)))??;
    Ok(temp)
}

/// Stream the part named after `kind` into a temporary file under `spool_dir`
/// and rewind it.
///
/// The temp file exists before any of the body is consumed and is removed
/// when the returned value (or the error path) drops it.
pub async fn spool_named_field(
    multipart: &mut Multipart,
    kind: AssetKind,
    validator: &MediaValidator,
    spool_dir: &Path,
) -> Result<SpooledUpload, HttpAppError> {
    let temp = create_spool_file(spool_dir).await?;
    let (std_file, path) = temp.into_parts();
    let mut file = tokio::fs::File::from_std(std_file);

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(kind.field_name()) {
            continue;
        }

        let content_type = validator.validate_content_type(field.content_type())?;

        let mut size: u64 = 0;
        while let Some(chunk) = field.chunk().await? {
            size += chunk.len() as u64;
            validator.validate_file_size(usize::try_from(size).unwrap_or(usize::MAX))?;
            file.write_all(&chunk).await?;
        }
        validator.validate_not_empty(usize::try_from(size).unwrap_or(usize::MAX))?;

        file.flush().await?;
        file.seek(SeekFrom::Start(0)).await?;

        tracing::debug!(
            path = %path.display(),
            size_bytes = size,
            "Spooled upload to temporary file"
        );

        return Ok(SpooledUpload {
            file,
            path,
            content_type,
            size,
        });
    }

    Err(missing_field(kind))
}
