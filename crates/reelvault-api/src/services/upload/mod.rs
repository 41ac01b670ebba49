//! Upload-and-publish pipeline
//!
//! - `multipart`: locating the named part, validating its declared type, and
//!   either reading it (thumbnails) or spooling it to a temp file (videos)
//! - `service`: ownership, naming, persistence, record update, superseded cleanup
//! - `types`: values handed between the two

pub mod multipart;
pub mod service;
pub mod types;

pub use service::UploadService;
pub use types::{ReceivedFile, SpooledUpload};
