use reelvault_core::AssetKind;

/// Validation errors for uploaded parts
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Missing content type")]
    MissingContentType,

    #[error("Empty file")]
    EmptyFile,
}

/// Upload validator for one asset kind
///
/// Checks the declared content type of the multipart part and its size; it
/// never sniffs the body.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types,
        }
    }

    pub fn for_kind(kind: AssetKind, max_file_size: usize) -> Self {
        Self::new(
            max_file_size,
            kind.allowed_content_types()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate a declared content type and return it normalized
    /// (lowercase, parameters stripped).
    pub fn validate_content_type(
        &self,
        content_type: Option<&str>,
    ) -> Result<String, ValidationError> {
        let raw = content_type.ok_or(ValidationError::MissingContentType)?;
        let normalized = raw
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        if normalized.is_empty() {
            return Err(ValidationError::MissingContentType);
        }

        if !self.allowed_content_types.contains(&normalized) {
            return Err(ValidationError::InvalidContentType {
                content_type: normalized,
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(normalized)
    }

    /// Validate a byte count seen so far, or the final size of the part.
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    pub fn validate_not_empty(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }
        Ok(())
    }
}
