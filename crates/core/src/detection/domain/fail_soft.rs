use crate::shared::face_region::FaceRegion;
use crate::shared::frame::Frame;
use crate::shared::status::StatusMessage;

use super::face_detector::FaceDetector;

/// Regions found for one image plus the message to show the user.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionOutcome {
    pub regions: Vec<FaceRegion>,
    pub status: StatusMessage,
    pub failed: bool,
}

/// Runs `detector`, turning any failure into zero regions.
///
/// Detection never blocks the rest of the pipeline: an error is logged and
/// reported through the status, and the caller proceeds as if no face was
/// found (manual marking stays available).
pub fn detect_fail_soft(detector: &mut dyn FaceDetector, frame: &Frame) -> DetectionOutcome {
    match detector.detect(frame) {
        Ok(regions) if regions.is_empty() => DetectionOutcome {
            regions,
            status: StatusMessage::info("No faces detected. Tap faces to mark them manually."),
            failed: false,
        },
        Ok(regions) => {
            let n = regions.len();
            let noun = if n == 1 { "face" } else { "faces" };
            DetectionOutcome {
                regions,
                status: StatusMessage::info(format!(
                    "Photo analysed ({}x{} px). {n} {noun} detected.",
                    frame.width(),
                    frame.height()
                )),
                failed: false,
            }
        }
        Err(e) => {
            log::warn!("Face detection failed: {e}");
            DetectionOutcome {
                regions: Vec::new(),
                status: StatusMessage::warning(
                    "Face detection failed. Manual marking is available.",
                ),
                failed: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::status::StatusKind;

    struct StubDetector {
        result: Option<Vec<FaceRegion>>,
    }

    impl FaceDetector for StubDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
            self.result.clone().ok_or_else(|| "model not loaded".into())
        }
    }

    fn frame() -> Frame {
        Frame::new(vec![0u8; 40 * 30 * 4], 40, 30, 4, 0)
    }

    #[test]
    fn test_error_becomes_empty_list() {
        let mut detector = StubDetector { result: None };
        let outcome = detect_fail_soft(&mut detector, &frame());
        assert!(outcome.regions.is_empty());
        assert!(outcome.failed);
        assert_eq!(outcome.status.kind, StatusKind::Warning);
    }

    #[test]
    fn test_zero_faces_invites_manual_marking() {
        let mut detector = StubDetector {
            result: Some(vec![]),
        };
        let outcome = detect_fail_soft(&mut detector, &frame());
        assert!(outcome.regions.is_empty());
        assert!(!outcome.failed);
        assert!(outcome.status.text.contains("manually"));
    }

    #[test]
    fn test_regions_passed_through() {
        let r = FaceRegion::new((10.0, 10.0), 5.0, 0.7).unwrap();
        let mut detector = StubDetector {
            result: Some(vec![r, r]),
        };
        let outcome = detect_fail_soft(&mut detector, &frame());
        assert_eq!(outcome.regions, vec![r, r]);
        assert!(outcome.status.text.contains("2 faces"));
        assert!(outcome.status.text.contains("40x30"));
    }
}
