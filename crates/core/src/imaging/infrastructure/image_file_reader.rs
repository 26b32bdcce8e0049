use std::path::Path;

use crate::imaging::domain::image_reader::ImageReader;
use crate::shared::frame::Frame;

/// Reads image files with the `image` crate, always producing RGBA frames.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

fn to_frame(img: image::DynamicImage) -> Frame {
    let rgba = img.into_rgba8();
    let (w, h) = rgba.dimensions();
    Frame::new(rgba.into_raw(), w, h, 4, 0)
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
        let img = image::open(path)
            .map_err(|e| format!("Cannot decode {}: {e}", path.display()))?;
        let frame = to_frame(img);
        log::info!(
            "Loaded {} ({}x{})",
            path.display(),
            frame.width(),
            frame.height()
        );
        Ok(frame)
    }
}
