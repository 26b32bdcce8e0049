use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::fail_soft::detect_fail_soft;
use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::obfuscation::domain::frame_obfuscator::FrameObfuscator;
use crate::session::photo_session::PhotoSession;
use crate::shared::face_region::FaceRegion;
use crate::shared::status::StatusSink;

/// A face marked by hand on the command line or by a tap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ManualFace {
    /// A point on the displayed photo; radius follows the marker's fraction.
    Point(f64, f64),
    /// An explicit circle in native pixels.
    Region(FaceRegion),
}

/// What happened to one photo.
#[derive(Clone, Debug, PartialEq)]
pub struct ObscureReport {
    pub width: u32,
    pub height: u32,
    pub detected: usize,
    pub manual: usize,
    pub detection_failed: bool,
}

/// Still-photo pipeline: read → detect (fail-soft) → mark → obfuscate → write.
///
/// The session outlives each run so the caller can toggle between the
/// original and the obscured result afterwards.
pub struct ObscurePhotoUseCase {
    reader: Box<dyn ImageReader>,
    writer: Box<dyn ImageWriter>,
    detector: Box<dyn FaceDetector>,
    obfuscator: Box<dyn FrameObfuscator>,
    session: PhotoSession<Box<dyn StatusSink>>,
}

impl ObscurePhotoUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        detector: Box<dyn FaceDetector>,
        obfuscator: Box<dyn FrameObfuscator>,
        session: PhotoSession<Box<dyn StatusSink>>,
    ) -> Self {
        Self {
            reader,
            writer,
            detector,
            obfuscator,
            session,
        }
    }

    pub fn session(&self) -> &PhotoSession<Box<dyn StatusSink>> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut PhotoSession<Box<dyn StatusSink>> {
        &mut self.session
    }

    /// Processes one photo. `shown` is the displayed size used to map
    /// [`ManualFace::Point`] marks; `None` means natural size.
    pub fn execute(
        &mut self,
        input_path: &Path,
        output_path: &Path,
        manual: &[ManualFace],
        shown: Option<(f64, f64)>,
    ) -> Result<ObscureReport, Box<dyn std::error::Error>> {
        self.session.capture_from(&*self.reader, input_path)?;
        let photo = self.session.photo().ok_or("no photo after capture")?;
        let (width, height) = (photo.width(), photo.height());

        let outcome = detect_fail_soft(&mut *self.detector, photo);
        let detected = outcome.regions.len();
        let mut regions = outcome.regions;
        self.session.post(outcome.status);

        for face in manual {
            if let ManualFace::Region(region) = face {
                regions.push(region.clamped_to(width, height));
            }
        }
        self.session.set_regions(regions)?;

        let shown = shown.unwrap_or((width as f64, height as f64));
        for face in manual {
            if let ManualFace::Point(x, y) = face {
                self.session.add_manual_region((*x, *y), shown)?;
            }
        }

        let obscured = self.session.rebuild(&*self.obfuscator)?;
        self.writer.write(output_path, &obscured)?;
        log::info!(
            "Obscured {} region(s) in {}",
            self.session.regions().len(),
            input_path.display()
        );

        Ok(ObscureReport {
            width,
            height,
            detected,
            manual: manual.len(),
            detection_failed: outcome.failed,
        })
    }
}
