//! Video prober - stream dimensions through ffprobe

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use reelvault_core::AspectClass;
use serde::Deserialize;
use tokio::process::Command;

use crate::metadata::VideoDimensions;

/// Typed prober failure. `is_retryable` separates transient causes from ones
/// where retrying the same input cannot help.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("ffprobe not found at {0}")]
    ToolMissing(String),

    #[error("Failed to launch ffprobe: {0}")]
    Spawn(String),

    #[error("ffprobe timed out after {0:?}")]
    Timeout(Duration),

    #[error("ffprobe exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Malformed ffprobe output: {0}")]
    MalformedOutput(String),

    #[error("No video stream found")]
    NoStreams,

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl ProbeError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProbeError::Timeout(_) | ProbeError::Spawn(_))
    }
}

#[derive(Debug, Deserialize)]
struct FFprobeOutput {
    streams: Option<Vec<FFprobeStream>>,
}

#[derive(Debug, Deserialize)]
struct FFprobeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Reject characters that have no business in an executable path.
fn validate_executable_path(path: &str) -> Result<(), ProbeError> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.is_empty() || path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(ProbeError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Extract the first stream carrying both width and height.
pub fn parse_probe_output(stdout: &[u8]) -> Result<VideoDimensions, ProbeError> {
    let output: FFprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ProbeError::MalformedOutput(e.to_string()))?;

    let streams = output.streams.unwrap_or_default();
    if streams.is_empty() {
        return Err(ProbeError::NoStreams);
    }

    let (width, height) = streams
        .iter()
        .find_map(|s| Some((s.width?, s.height?)))
        .ok_or(ProbeError::NoStreams)?;

    if height == 0 {
        return Err(ProbeError::MalformedOutput(
            "stream reports zero height".to_string(),
        ));
    }

    Ok(VideoDimensions { width, height })
}

#[derive(Debug, Clone)]
pub struct VideoProber {
    ffprobe_path: String,
    timeout: Duration,
}

impl VideoProber {
    pub fn new(ffprobe_path: impl Into<String>, timeout: Duration) -> Result<Self, ProbeError> {
        let ffprobe_path = ffprobe_path.into();
        validate_executable_path(&ffprobe_path)?;
        Ok(Self {
            ffprobe_path,
            timeout,
        })
    }

    /// Probe the first video stream of a local file.
    ///
    /// The child is killed if the timeout elapses.
    #[tracing::instrument(skip(self), fields(
        process.executable.path = %self.ffprobe_path,
        ffprobe.operation = "probe"
    ))]
    pub async fn probe_dimensions(&self, video_path: &Path) -> Result<VideoDimensions, ProbeError> {
        let start = std::time::Instant::now();
        let path = canonical_input(video_path).await?;

        let child = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .arg(&path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Err(_) => return Err(ProbeError::Timeout(self.timeout)),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProbeError::ToolMissing(self.ffprobe_path.clone()))
            }
            Ok(Err(e)) => return Err(ProbeError::Spawn(e.to_string())),
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            return Err(ProbeError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let dimensions = parse_probe_output(&output.stdout)?;

        tracing::debug!(
            width = dimensions.width,
            height = dimensions.height,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "ffprobe completed"
        );

        Ok(dimensions)
    }

    /// Probe and bucket the file's aspect ratio.
    pub async fn classify(&self, video_path: &Path) -> Result<AspectClass, ProbeError> {
        Ok(self.probe_dimensions(video_path).await?.aspect_class())
    }
}

async fn canonical_input(path: &Path) -> Result<PathBuf, ProbeError> {
    tokio::fs::canonicalize(path)
        .await
        .map_err(|e| ProbeError::InvalidPath(format!("{}: {}", path.display(), e)))
}
