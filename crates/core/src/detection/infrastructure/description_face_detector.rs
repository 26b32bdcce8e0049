use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use crate::detection::domain::description_source::DescriptionSource;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::DESCRIPTION_FALLBACK_RADIUS;
use crate::shared::face_region::FaceRegion;
use crate::shared::frame::Frame;

/// Descriptions carry no probability, so parsed regions are trusted fully.
const DESCRIPTION_CONFIDENCE: f64 = 1.0;

fn coordinate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)(?:gesicht|face|person).*?(?:bei|at|position).*?(\d+).*?(\d+).*?(?:radius|größe).*?(\d+)",
        )
        .expect("coordinate pattern is valid")
    })
}

/// Extracts `(x, y, radius)` circles mentioned in a free-text description.
///
/// Matches phrases like "face at 120, 80 with radius 40" within one line. A radius of zero
/// falls back to a fixed default. Regions with unparsable numbers are skipped.
pub fn parse_regions(text: &str) -> Vec<FaceRegion> {
    coordinate_pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let x: f64 = caps[1].parse().ok()?;
            let y: f64 = caps[2].parse().ok()?;
            let r: f64 = caps[3].parse().ok()?;
            let radius = if r > 0.0 { r } else { DESCRIPTION_FALLBACK_RADIUS };
            FaceRegion::new((x, y), radius, DESCRIPTION_CONFIDENCE).ok()
        })
        .collect()
}

/// Detector backed by a remote image-description service.
///
/// Coordinate extraction is a heuristic over free text and is expected to
/// miss faces; callers fall back to manual marking.
pub struct DescriptionFaceDetector {
    source: Box<dyn DescriptionSource>,
    last_description: Option<String>,
}

impl DescriptionFaceDetector {
    pub fn new(source: Box<dyn DescriptionSource>) -> Self {
        Self {
            source,
            last_description: None,
        }
    }

    /// Text returned by the most recent successful request.
    pub fn last_description(&self) -> Option<&str> {
        self.last_description.as_deref()
    }
}

impl FaceDetector for DescriptionFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
        let text = self.source.describe(frame)?;
        if text.trim().is_empty() {
            return Err("Empty description received".into());
        }
        let regions = parse_regions(&text);
        log::debug!("Description yielded {} region(s)", regions.len());
        self.last_description = Some(text);
        Ok(regions)
    }
}

/// Reads a previously saved service response from disk.
pub struct FileDescriptionSource {
    path: PathBuf,
}

impl FileDescriptionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DescriptionSource for FileDescriptionSource {
    fn describe(&mut self, _frame: &Frame) -> Result<String, Box<dyn std::error::Error>> {
        Ok(std::fs::read_to_string(&self.path)?)
    }
}
