use tempfile::TempPath;

/// A part read fully into memory
#[derive(Debug)]
pub struct ReceivedFile {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A part streamed to a scoped temporary file.
///
/// `file` is positioned at offset 0 once spooling finishes. The file on disk is
/// removed when `path` drops, on every exit path.
#[derive(Debug)]
pub struct SpooledUpload {
    pub file: tokio::fs::File,
    pub path: TempPath,
    pub content_type: String,
    pub size: u64,
}
