//! Video inspection module

pub mod processor;

pub use processor::{parse_probe_output, ProbeError, VideoProber};
