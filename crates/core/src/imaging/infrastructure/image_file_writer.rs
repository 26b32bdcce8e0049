use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

use crate::imaging::domain::image_writer::ImageWriter;
use crate::shared::constants::JPEG_QUALITY;
use crate::shared::frame::Frame;

/// Writes frames with the `image` crate.
///
/// JPEG output is encoded at a fixed quality with alpha dropped; every other
/// format is chosen by file extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

/// Wraps a frame's pixels in an `image` buffer matching its channel count.
pub fn to_dynamic_image(frame: &Frame) -> Result<DynamicImage, Box<dyn std::error::Error>> {
    let (w, h) = (frame.width(), frame.height());
    let data = frame.data().to_vec();
    let img = match frame.channels() {
        4 => RgbaImage::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
        3 => RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
        1 => GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        n => return Err(format!("Unsupported channel count: {n}").into()),
    };
    img.ok_or_else(|| "Failed to create image from frame data".into())
}

/// Encodes a frame as JPEG bytes.
pub fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let rgb = to_dynamic_image(frame)?.into_rgb8();
    let mut buf = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buf, quality).encode_image(&rgb)?;
    Ok(buf.into_inner())
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false)
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if is_jpeg(path) {
            std::fs::write(path, encode_jpeg(frame, JPEG_QUALITY)?)?;
        } else {
            to_dynamic_image(frame)?.save(path)?;
        }
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}
