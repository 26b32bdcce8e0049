use thiserror::Error;

use super::geometry::Circle;

/// Confidence assigned to regions the user marked by hand.
pub const MANUAL_CONFIDENCE: f64 = 1.0;

#[derive(Error, Debug, PartialEq)]
pub enum RegionError {
    #[error("region radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
    #[error("region center must be finite, got ({0}, {1})")]
    InvalidCenter(f64, f64),
}

/// A circular face area to obfuscate, in native image pixels.
///
/// Created by a detector adapter or by manual marking. `radius` is always
/// positive; `confidence` is kept within `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceRegion {
    x: f64,
    y: f64,
    radius: f64,
    confidence: f64,
}

impl FaceRegion {
    pub fn new(center: (f64, f64), radius: f64, confidence: f64) -> Result<Self, RegionError> {
        let (x, y) = center;
        if !x.is_finite() || !y.is_finite() {
            return Err(RegionError::InvalidCenter(x, y));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(RegionError::InvalidRadius(radius));
        }
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Ok(Self {
            x,
            y,
            radius,
            confidence,
        })
    }

    /// Builds a region from a detector bounding box `(x1, y1)-(x2, y2)`.
    ///
    /// The circle is centered on the box and its radius is half the longer
    /// side, scaled by `radius_scale` so the whole head is covered.
    pub fn from_bbox(
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        confidence: f64,
        radius_scale: f64,
    ) -> Result<Self, RegionError> {
        let cx = (x1 + x2) / 2.0;
        let cy = (y1 + y2) / 2.0;
        let radius = (x2 - x1).abs().max((y2 - y1).abs()) / 2.0 * radius_scale;
        Self::new((cx, cy), radius, confidence)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.x, self.y, self.radius)
    }

    /// Maps the region into another coordinate space.
    ///
    /// The radius follows the horizontal factor, the same way an overlay
    /// stretched to a display width scales its circles.
    pub fn scaled(&self, sx: f64, sy: f64) -> Result<Self, RegionError> {
        Self::new((self.x * sx, self.y * sy), self.radius * sx, self.confidence)
    }

    /// Returns a copy with the center moved inside a `width × height` image.
    pub fn clamped_to(&self, width: u32, height: u32) -> Self {
        let max_x = (width as f64 - 1.0).max(0.0);
        let max_y = (height as f64 - 1.0).max(0.0);
        Self {
            x: self.x.clamp(0.0, max_x),
            y: self.y.clamp(0.0, max_y),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_new_valid_region() {
        let r = FaceRegion::new((10.0, 20.0), 5.0, 0.8).unwrap();
        assert_eq!(r.center(), (10.0, 20.0));
        assert_relative_eq!(r.radius(), 5.0);
        assert_relative_eq!(r.confidence(), 0.8);
    }

    #[rstest]
    #[case::zero(0.0)]
    #[case::negative(-3.0)]
    #[case::nan(f64::NAN)]
    #[case::infinite(f64::INFINITY)]
    fn test_new_rejects_bad_radius(#[case] radius: f64) {
        assert!(matches!(
            FaceRegion::new((0.0, 0.0), radius, 1.0),
            Err(RegionError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_new_rejects_non_finite_center() {
        assert!(FaceRegion::new((f64::NAN, 0.0), 1.0, 1.0).is_err());
    }

    #[rstest]
    #[case::above(1.7, 1.0)]
    #[case::below(-0.2, 0.0)]
    #[case::nan(f64::NAN, 0.0)]
    fn test_confidence_clamped(#[case] input: f64, #[case] expected: f64) {
        let r = FaceRegion::new((0.0, 0.0), 1.0, input).unwrap();
        assert_relative_eq!(r.confidence(), expected);
    }

    #[test]
    fn test_from_bbox_uses_longer_side() {
        // 40x60 box centered at (30, 50); radius = 60/2 * 1.2 = 36
        let r = FaceRegion::from_bbox(10.0, 20.0, 50.0, 80.0, 0.9, 1.2).unwrap();
        assert_eq!(r.center(), (30.0, 50.0));
        assert_relative_eq!(r.radius(), 36.0);
        assert_relative_eq!(r.confidence(), 0.9);
    }

    #[test]
    fn test_from_bbox_degenerate_box_errors() {
        assert!(FaceRegion::from_bbox(10.0, 10.0, 10.0, 10.0, 0.9, 1.2).is_err());
    }

    #[test]
    fn test_scaled() {
        let r = FaceRegion::new((10.0, 20.0), 5.0, 0.5).unwrap();
        let s = r.scaled(2.0, 3.0).unwrap();
        assert_eq!(s.center(), (20.0, 60.0));
        assert_relative_eq!(s.radius(), 10.0);
        assert_relative_eq!(s.confidence(), 0.5);
    }

    #[test]
    fn test_clamped_to_moves_center_inside() {
        let r = FaceRegion::new((-10.0, 500.0), 20.0, 1.0).unwrap();
        let c = r.clamped_to(100, 80);
        assert_eq!(c.center(), (0.0, 79.0));
        assert_relative_eq!(c.radius(), 20.0);
    }

    #[test]
    fn test_clamped_to_keeps_inside_center() {
        let r = FaceRegion::new((40.0, 30.0), 20.0, 1.0).unwrap();
        assert_eq!(r.clamped_to(100, 80), r);
    }
}
