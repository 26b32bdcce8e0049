use std::path::Path;
use std::sync::Arc;

use crate::detection::domain::manual_marker::{DisplayGeometry, ManualMarker};
use crate::imaging::domain::image_reader::ImageReader;
use crate::obfuscation::domain::frame_obfuscator::FrameObfuscator;
use crate::shared::face_region::FaceRegion;
use crate::shared::frame::Frame;
use crate::shared::status::{LogStatusSink, StatusMessage, StatusSink};

use super::session_error::SessionError;

const STILL_BUILDING_TEXT: &str = "Obscured image is still being prepared. Please wait.";

/// Cached result of the still obfuscation for the current region list.
#[derive(Clone, Debug, PartialEq)]
pub enum ObfuscationState {
    /// Not built yet, or invalidated by a region change.
    Pending,
    Ready(Arc<Frame>),
    Failed(String),
}

/// One captured photo, its face regions and the cached obscured version.
///
/// Capturing or retaking starts over: regions are dropped, the cache is
/// released and the view switches back to the original.
pub struct PhotoSession<S: StatusSink = LogStatusSink> {
    photo: Option<Arc<Frame>>,
    regions: Vec<FaceRegion>,
    state: ObfuscationState,
    showing_obfuscated: bool,
    marker: ManualMarker,
    status: S,
}

impl PhotoSession<LogStatusSink> {
    pub fn new(marker: ManualMarker) -> Self {
        Self::with_sink(marker, LogStatusSink)
    }
}

impl<S: StatusSink> PhotoSession<S> {
    pub fn with_sink(marker: ManualMarker, status: S) -> Self {
        Self {
            photo: None,
            regions: Vec::new(),
            state: ObfuscationState::Pending,
            showing_obfuscated: false,
            marker,
            status,
        }
    }

    pub fn status_sink(&self) -> &S {
        &self.status
    }

    pub fn post(&mut self, message: StatusMessage) {
        self.status.post(message);
    }

    /// Starts a new session around `frame`.
    pub fn capture(&mut self, frame: Frame) {
        log::info!("Captured {}x{} photo", frame.width(), frame.height());
        self.photo = Some(Arc::new(frame));
        self.regions.clear();
        self.state = ObfuscationState::Pending;
        self.showing_obfuscated = false;
    }

    /// Reads a photo through `reader` and starts a new session with it.
    ///
    /// A failed read leaves the previous photo in place.
    pub fn capture_from(
        &mut self,
        reader: &dyn ImageReader,
        path: &Path,
    ) -> Result<(), SessionError> {
        match reader.read(path) {
            Ok(frame) if frame.width() > 0 && frame.height() > 0 => {
                self.capture(frame);
                Ok(())
            }
            Ok(_) => self.capture_failed("photo has no pixels".to_string()),
            Err(e) => self.capture_failed(e.to_string()),
        }
    }

    fn capture_failed(&mut self, reason: String) -> Result<(), SessionError> {
        self.status
            .post(StatusMessage::error(format!("Could not capture photo: {reason}")));
        Err(SessionError::Capture(reason))
    }

    /// Discards the photo and everything derived from it.
    pub fn retake(&mut self) {
        self.photo = None;
        self.regions.clear();
        self.state = ObfuscationState::Pending;
        self.showing_obfuscated = false;
    }

    pub fn photo(&self) -> Option<&Frame> {
        self.photo.as_deref()
    }

    pub fn regions(&self) -> &[FaceRegion] {
        &self.regions
    }

    pub fn state(&self) -> &ObfuscationState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ObfuscationState::Ready(_))
    }

    pub fn showing_obfuscated(&self) -> bool {
        self.showing_obfuscated
    }

    /// Replaces the region list (typically with detector output).
    pub fn set_regions(&mut self, regions: Vec<FaceRegion>) -> Result<(), SessionError> {
        if self.photo.is_none() {
            return Err(SessionError::NoPhoto);
        }
        self.regions = regions;
        self.invalidate();
        Ok(())
    }

    /// Marks a face at a point on the displayed photo.
    ///
    /// `shown` is the size the photo occupies on screen.
    pub fn add_manual_region(
        &mut self,
        point: (f64, f64),
        shown: (f64, f64),
    ) -> Result<FaceRegion, SessionError> {
        let photo = self.photo.as_ref().ok_or(SessionError::NoPhoto)?;
        let display = DisplayGeometry {
            natural: (photo.width(), photo.height()),
            shown,
        };
        let region = self.marker.add_region(point, &display)?;
        self.regions.push(region);
        self.invalidate();
        self.status.post(StatusMessage::info(format!(
            "Face marked. {} region(s) total.",
            self.regions.len()
        )));
        Ok(region)
    }

    fn invalidate(&mut self) {
        self.state = ObfuscationState::Pending;
        self.showing_obfuscated = false;
    }

    /// Builds and caches the obscured image for the current regions.
    pub fn rebuild(&mut self, obfuscator: &dyn FrameObfuscator) -> Result<Arc<Frame>, SessionError> {
        let photo = self.photo.as_ref().ok_or(SessionError::NoPhoto)?;
        let mut output = Frame::clone(photo);
        match obfuscator.obfuscate(&mut output, &self.regions) {
            Ok(()) => {
                let output = Arc::new(output);
                self.state = ObfuscationState::Ready(Arc::clone(&output));
                log::info!("Obscured image ready ({} region(s))", self.regions.len());
                Ok(output)
            }
            Err(e) => {
                let reason = e.to_string();
                log::error!("Obfuscation failed: {reason}");
                self.state = ObfuscationState::Failed(reason.clone());
                self.showing_obfuscated = false;
                self.status
                    .post(StatusMessage::error("Could not produce the obscured image."));
                Err(SessionError::Encode(reason))
            }
        }
    }

    /// Switches between the original and the cached obscured image.
    ///
    /// Returns the new value of `showing_obfuscated`. Switching towards the
    /// obscured view fails while no result is cached.
    pub fn toggle(&mut self) -> Result<bool, SessionError> {
        if self.photo.is_none() {
            return Err(SessionError::NoPhoto);
        }
        if self.showing_obfuscated {
            self.showing_obfuscated = false;
            return Ok(false);
        }
        if !self.is_ready() {
            self.status.post(StatusMessage::info(STILL_BUILDING_TEXT));
            return Err(SessionError::StillBuilding);
        }
        self.showing_obfuscated = true;
        Ok(true)
    }

    /// The frame currently presented.
    pub fn view(&self) -> Option<&Frame> {
        match (&self.state, self.showing_obfuscated) {
            (ObfuscationState::Ready(frame), true) => Some(frame.as_ref()),
            _ => self.photo(),
        }
    }

    pub fn obfuscated(&self) -> Option<&Arc<Frame>> {
        match &self.state {
            ObfuscationState::Ready(frame) => Some(frame),
            _ => None,
        }
    }
}
