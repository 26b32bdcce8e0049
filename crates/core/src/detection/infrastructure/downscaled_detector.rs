use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba};

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::face_region::FaceRegion;
use crate::shared::frame::Frame;

/// Decorator that shrinks frames before detection and maps the regions back
/// to full resolution.
pub struct DownscaledDetector {
    inner: Box<dyn FaceDetector>,
    scale: f64,
}

impl DownscaledDetector {
    /// `scale` must lie in `(0, 1]`.
    pub fn new(inner: Box<dyn FaceDetector>, scale: f64) -> Result<Self, &'static str> {
        if !(scale > 0.0 && scale <= 1.0) {
            return Err("scale must be in (0, 1]");
        }
        Ok(Self { inner, scale })
    }

    fn shrink(&self, frame: &Frame) -> Result<Frame, Box<dyn std::error::Error>> {
        let w = ((frame.width() as f64 * self.scale).round() as u32).max(1);
        let h = ((frame.height() as f64 * self.scale).round() as u32).max(1);
        let rgba = to_rgba(frame)?;
        let small = imageops::resize(&rgba, w, h, FilterType::Triangle);
        Ok(Frame::new(small.into_raw(), w, h, 4, frame.index()))
    }
}

impl FaceDetector for DownscaledDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
        if self.scale == 1.0 || frame.width() == 0 || frame.height() == 0 {
            return self.inner.detect(frame);
        }
        let small = self.shrink(frame)?;
        let sx = frame.width() as f64 / small.width() as f64;
        let sy = frame.height() as f64 / small.height() as f64;
        let regions = self.inner.detect(&small)?;
        Ok(regions
            .iter()
            .filter_map(|r| r.scaled(sx, sy).ok())
            .collect())
    }
}

fn to_rgba(frame: &Frame) -> Result<ImageBuffer<Rgba<u8>, Vec<u8>>, Box<dyn std::error::Error>> {
    let data = match frame.channels() {
        4 => frame.data().to_vec(),
        3 => frame
            .data()
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        1 => frame.data().iter().flat_map(|&v| [v, v, v, 255]).collect(),
        n => return Err(format!("Unsupported channel count: {n}").into()),
    };
    ImageBuffer::from_raw(frame.width(), frame.height(), data)
        .ok_or_else(|| "Frame buffer does not match its dimensions".into())
}
