//! API constants

/// API base path prefix
pub const API_PREFIX: &str = "/api";

/// Mount point for locally stored assets
pub const ASSETS_ROUTE: &str = "/assets";

/// Headroom added to per-route body limits for multipart boundaries and part headers
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Lifetime of access tokens minted by `JwtService::issue_access_token`
pub const ACCESS_TOKEN_TTL_HOURS: i64 = 1;
