use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::constants::{THUMBNAIL_FIELD, VIDEO_FIELD};
use crate::error::AppError;

const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;
const PORTRAIT_RATIO: f64 = 9.0 / 16.0;
const RATIO_TOLERANCE: f64 = 0.4;

/// Which asset slot of a video record an upload targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Thumbnail,
    Video,
}

impl AssetKind {
    /// Multipart field name carrying the asset body
    pub fn field_name(&self) -> &'static str {
        match self {
            AssetKind::Thumbnail => THUMBNAIL_FIELD,
            AssetKind::Video => VIDEO_FIELD,
        }
    }

    pub fn allowed_content_types(&self) -> &'static [&'static str] {
        match self {
            AssetKind::Thumbnail => &["image/jpeg", "image/png"],
            AssetKind::Video => &["video/mp4"],
        }
    }
}

impl Display for AssetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.field_name())
    }
}

/// Aspect-ratio bucket of a video stream. Only used to pick a key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectClass {
    Landscape,
    Portrait,
    Other,
}

impl AspectClass {
    /// Bucket a width/height ratio against 16:9 and 9:16 with a ±0.4 band.
    pub fn from_ratio(ratio: f64) -> Self {
        if (ratio - LANDSCAPE_RATIO).abs() < RATIO_TOLERANCE {
            AspectClass::Landscape
        } else if (ratio - PORTRAIT_RATIO).abs() < RATIO_TOLERANCE {
            AspectClass::Portrait
        } else {
            AspectClass::Other
        }
    }

    /// Returns `None` when height is zero.
    pub fn from_dimensions(width: u32, height: u32) -> Option<Self> {
        if height == 0 {
            return None;
        }
        Some(Self::from_ratio(f64::from(width) / f64::from(height)))
    }

    /// Storage key folder, including the trailing slash
    pub fn key_prefix(&self) -> &'static str {
        match self {
            AspectClass::Landscape => "landscape/",
            AspectClass::Portrait => "portrait/",
            AspectClass::Other => "other/",
        }
    }
}

impl Display for AspectClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AspectClass::Landscape => write!(f, "landscape"),
            AspectClass::Portrait => write!(f, "portrait"),
            AspectClass::Other => write!(f, "other"),
        }
    }
}

/// Value stored in a video record's asset slot.
///
/// `Direct` is handed to clients as-is. `Composite` names a private object and
/// must be exchanged for a signed URL on every read; its stored text form is
/// `bucket,key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetReference {
    Direct(String),
    Composite { bucket: String, key: String },
}

impl AssetReference {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") || raw.starts_with('/') {
            return Ok(AssetReference::Direct(raw.to_string()));
        }

        let mut parts = raw.split(',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(bucket), Some(key), None) if !bucket.is_empty() && !key.is_empty() => {
                Ok(AssetReference::Composite {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                })
            }
            _ => Err(AppError::Internal(format!(
                "Malformed asset reference: {}",
                raw
            ))),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, AssetReference::Composite { .. })
    }
}

impl Display for AssetReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AssetReference::Direct(url) => f.write_str(url),
            AssetReference::Composite { bucket, key } => write!(f, "{},{}", bucket, key),
        }
    }
}
