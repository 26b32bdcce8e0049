use crate::shared::constants::MANUAL_RADIUS_FRACTION;
use crate::shared::face_region::{FaceRegion, RegionError, MANUAL_CONFIDENCE};

/// How a photo is currently shown: its natural pixel size and the size it
/// occupies on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayGeometry {
    pub natural: (u32, u32),
    pub shown: (f64, f64),
}

impl DisplayGeometry {
    /// Geometry for an image shown at its natural size.
    pub fn unscaled(width: u32, height: u32) -> Self {
        Self {
            natural: (width, height),
            shown: (width as f64, height as f64),
        }
    }

    /// Maps a point on the display to native image pixels.
    pub fn to_native(&self, point: (f64, f64)) -> (f64, f64) {
        let (w, h) = self.shown;
        let sx = if w > 0.0 { self.natural.0 as f64 / w } else { 1.0 };
        let sy = if h > 0.0 { self.natural.1 as f64 / h } else { 1.0 };
        (point.0 * sx, point.1 * sy)
    }
}

/// Turns taps/clicks on a displayed photo into face regions.
pub struct ManualMarker {
    radius_fraction: f64,
}

impl ManualMarker {
    pub fn new(radius_fraction: f64) -> Self {
        Self { radius_fraction }
    }

    /// Creates a region at a display point.
    ///
    /// The radius is a fixed fraction of the image's shorter side and the
    /// confidence is always 1.0.
    pub fn add_region(
        &self,
        point: (f64, f64),
        display: &DisplayGeometry,
    ) -> Result<FaceRegion, RegionError> {
        let center = display.to_native(point);
        let (w, h) = display.natural;
        let radius = w.min(h) as f64 * self.radius_fraction;
        FaceRegion::new(center, radius, MANUAL_CONFIDENCE)
    }
}

impl Default for ManualMarker {
    fn default() -> Self {
        Self::new(MANUAL_RADIUS_FRACTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case((100.0, 50.0), (4000, 3000), (400.0, 300.0), (1000.0, 500.0))]
    #[case((0.0, 0.0), (1920, 1080), (960.0, 540.0), (0.0, 0.0))]
    #[case((320.0, 240.0), (640, 480), (640.0, 480.0), (320.0, 240.0))]
    #[case((10.0, 10.0), (300, 600), (150.0, 200.0), (20.0, 30.0))]
    fn test_display_point_maps_to_native(
        #[case] point: (f64, f64),
        #[case] natural: (u32, u32),
        #[case] shown: (f64, f64),
        #[case] expected: (f64, f64),
    ) {
        let display = DisplayGeometry { natural, shown };
        let region = ManualMarker::default().add_region(point, &display).unwrap();
        let (x, y) = region.center();
        assert_relative_eq!(x, expected.0);
        assert_relative_eq!(y, expected.1);
    }

    #[test]
    fn test_radius_is_fraction_of_shorter_side() {
        let display = DisplayGeometry::unscaled(4000, 3000);
        let region = ManualMarker::default().add_region((1.0, 1.0), &display).unwrap();
        assert_relative_eq!(region.radius(), 240.0);
    }

    #[test]
    fn test_confidence_is_one() {
        let display = DisplayGeometry::unscaled(100, 100);
        let region = ManualMarker::new(0.07).add_region((5.0, 5.0), &display).unwrap();
        assert_relative_eq!(region.confidence(), 1.0);
        assert_relative_eq!(region.radius(), 7.0);
    }

    #[test]
    fn test_zero_sized_image_errors() {
        let display = DisplayGeometry::unscaled(0, 100);
        assert!(ManualMarker::default().add_region((1.0, 1.0), &display).is_err());
    }

    #[test]
    fn test_zero_display_size_falls_back_to_identity() {
        let display = DisplayGeometry {
            natural: (100, 100),
            shown: (0.0, 0.0),
        };
        assert_eq!(display.to_native((3.0, 4.0)), (3.0, 4.0));
    }
}
