//! Media metadata types

use reelvault_core::AspectClass;
use serde::{Deserialize, Serialize};

/// Pixel dimensions of the first video stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDimensions {
    pub width: u32,
    pub height: u32,
}

impl VideoDimensions {
    pub fn ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    pub fn aspect_class(&self) -> AspectClass {
        AspectClass::from_ratio(self.ratio())
    }
}
