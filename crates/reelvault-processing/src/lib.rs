//! Reelvault Processing Library
//!
//! Upload validation and video stream inspection through ffprobe.

pub mod metadata;
pub mod validator;
pub mod video;

pub use metadata::VideoDimensions;
pub use validator::{MediaValidator, ValidationError};
pub use video::{ProbeError, VideoProber};
