//! First-frame extraction and transparency trimming for sprite sheets.

pub mod bounds;
pub mod error;
pub mod processor;

pub use bounds::{Bounds, opaque_bounds};
pub use error::FrameError;
pub use processor::{ProcessedFrame, crop_and_trim, crop_first_frame, process, trim_transparency};
