use std::io::Cursor;

use image::{ImageFormat, RgbaImage, imageops};
use log::debug;

use crate::bounds::opaque_bounds;
use crate::error::FrameError;

/// A cropped, transparency-trimmed sprite frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedFrame {
    image: RgbaImage,
}

impl ProcessedFrame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Encode the frame as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, FrameError> {
        let mut buf = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(FrameError::Encode)?;
        Ok(buf.into_inner())
    }
}

/// Decode a sprite sheet and extract its trimmed first frame.
pub fn process(
    sheet_bytes: &[u8],
    frame_width: u32,
    frame_height: u32,
) -> Result<ProcessedFrame, FrameError> {
    let sheet = image::load_from_memory(sheet_bytes)
        .map_err(FrameError::Decode)?
        .into_rgba8();
    debug!(
        "Cropping first frame {}x{} from {}x{} sheet",
        frame_width,
        frame_height,
        sheet.width(),
        sheet.height()
    );
    crop_and_trim(&sheet, frame_width, frame_height)
}

/// Crop the top-left frame and trim its transparent border.
pub fn crop_and_trim(
    sheet: &RgbaImage,
    frame_width: u32,
    frame_height: u32,
) -> Result<ProcessedFrame, FrameError> {
    let frame = crop_first_frame(sheet, frame_width, frame_height)?;
    Ok(ProcessedFrame {
        image: trim_transparency(frame),
    })
}

/// Crop `(0, 0, frame_width, frame_height)`, clipped to the sheet bounds.
pub fn crop_first_frame(
    sheet: &RgbaImage,
    frame_width: u32,
    frame_height: u32,
) -> Result<RgbaImage, FrameError> {
    let width = frame_width.min(sheet.width());
    let height = frame_height.min(sheet.height());
    if width == 0 || height == 0 {
        return Err(FrameError::EmptyFrame { width, height });
    }
    Ok(imageops::crop_imm(sheet, 0, 0, width, height).to_image())
}

/// Crop to the bounding box of non-transparent pixels.
///
/// A fully transparent image is returned as-is.
pub fn trim_transparency(image: RgbaImage) -> RgbaImage {
    let alpha: Vec<u8> = image.pixels().map(|p| p.0[3]).collect();
    match opaque_bounds(image.width(), image.height(), &alpha) {
        Some(b) if !b.covers(image.width(), image.height()) => {
            imageops::crop_imm(&image, b.x, b.y, b.width, b.height).to_image()
        }
        Some(_) => image,
        None => {
            debug!("No opaque pixels, frame left untrimmed");
            image
        }
    }
}
