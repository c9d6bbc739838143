use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Failed to decode sprite sheet")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode frame")]
    Encode(#[source] image::ImageError),

    #[error("Frame region is empty ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },
}
