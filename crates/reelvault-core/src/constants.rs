//! Shared constants

/// Multipart field carrying the thumbnail image
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Multipart field carrying the video file
pub const VIDEO_FIELD: &str = "video";

/// Random bytes behind every generated asset key (256 bits)
pub const ASSET_KEY_ENTROPY_BYTES: usize = 32;

/// Default lifetime of a signed read URL (1 hour)
pub const DEFAULT_SIGNED_URL_EXPIRY_SECS: u64 = 60 * 60;

/// Default thumbnail upload ceiling (10 MiB)
pub const DEFAULT_MAX_THUMBNAIL_SIZE_MB: usize = 10;

/// Default video upload ceiling (1 GiB)
pub const DEFAULT_MAX_VIDEO_SIZE_MB: usize = 1024;

/// Default ceiling on a single prober invocation
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;

/// Default JWT issuer accepted on access tokens
pub const DEFAULT_JWT_ISSUER: &str = "reelvault-access";
