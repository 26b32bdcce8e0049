use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::face_region::FaceRegion;
use crate::shared::frame::Frame;

/// Decorator that runs detection every N calls, reusing results in between.
///
/// The live preview ticks faster than a detector can keep up with on slow
/// devices; skipped ticks repaint the last known regions.
pub struct SkipFrameDetector {
    inner: Box<dyn FaceDetector>,
    skip_interval: usize,
    frame_count: usize,
    last_regions: Vec<FaceRegion>,
}

impl SkipFrameDetector {
    pub fn new(inner: Box<dyn FaceDetector>, skip_interval: usize) -> Result<Self, &'static str> {
        if skip_interval < 1 {
            return Err("skip_interval must be >= 1");
        }
        Ok(Self {
            inner,
            skip_interval,
            frame_count: 0,
            last_regions: Vec::new(),
        })
    }
}

impl FaceDetector for SkipFrameDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
        let due = self.frame_count % self.skip_interval == 0;
        self.frame_count += 1;
        if due {
            self.last_regions = self.inner.detect(frame)?;
        }
        Ok(self.last_regions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeDetector {
        results: Vec<Vec<FaceRegion>>,
        call_count: std::sync::Arc<std::sync::atomic::AtomicUsize>,
    }

    impl FakeDetector {
        fn new(results: Vec<Vec<FaceRegion>>) -> Self {
            Self {
                results,
                call_count: Default::default(),
            }
        }
    }

    impl FaceDetector for FakeDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
            let n = self
                .call_count
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(self.results[n % self.results.len()].clone())
        }
    }

    fn frame(index: usize) -> Frame {
        Frame::new(vec![0u8; 100 * 100 * 3], 100, 100, 3, index)
    }

    fn region(x: f64) -> FaceRegion {
        FaceRegion::new((x, 20.0), 10.0, 0.9).unwrap()
    }

    #[test]
    fn test_skip_interval_1_detects_every_frame() {
        let inner = FakeDetector::new(vec![vec![region(10.0)], vec![region(30.0)]]);
        let calls = inner.call_count.clone();
        let mut detector = SkipFrameDetector::new(Box::new(inner), 1).unwrap();

        let r0 = detector.detect(&frame(0)).unwrap();
        let r1 = detector.detect(&frame(1)).unwrap();

        assert_eq!(r0[0].center().0, 10.0);
        assert_eq!(r1[0].center().0, 30.0);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn test_alternate_ticks_reuse_regions() {
        let inner = FakeDetector::new(vec![vec![region(10.0)], vec![region(30.0)]]);
        let calls = inner.call_count.clone();
        let mut detector = SkipFrameDetector::new(Box::new(inner), 2).unwrap();

        let r0 = detector.detect(&frame(0)).unwrap();
        let r1 = detector.detect(&frame(1)).unwrap(); // skipped
        let r2 = detector.detect(&frame(2)).unwrap();

        assert_eq!(r0, r1);
        assert_eq!(r2[0].center().0, 30.0);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_results_reused() {
        let inner = FakeDetector::new(vec![vec![]]);
        let mut detector = SkipFrameDetector::new(Box::new(inner), 2).unwrap();

        assert!(detector.detect(&frame(0)).unwrap().is_empty());
        assert!(detector.detect(&frame(1)).unwrap().is_empty());
    }

    #[test]
    fn test_skip_interval_0_errors() {
        let inner = FakeDetector::new(vec![vec![]]);
        assert!(SkipFrameDetector::new(Box::new(inner), 0).is_err());
    }

    #[test]
    fn test_inner_error_propagates() {
        struct Failing;
        impl FaceDetector for Failing {
            fn detect(
                &mut self,
                _frame: &Frame,
            ) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
                Err("inference failed".into())
            }
        }
        let mut detector = SkipFrameDetector::new(Box::new(Failing), 2).unwrap();
        assert!(detector.detect(&frame(0)).is_err());
    }
}
