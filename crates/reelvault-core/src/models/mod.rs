pub mod asset;
pub mod video;

pub use asset::*;
pub use video::*;
