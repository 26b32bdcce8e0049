/// Axis-aligned pixel rectangle, already clamped to a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoiRect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl RoiRect {
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// Circle in pixel coordinates.
///
/// A pixel `(col, row)` belongs to the circle when its center
/// `(col + 0.5, row + 0.5)` lies within `radius` of `(cx, cy)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

impl Circle {
    pub fn new(cx: f64, cy: f64, radius: f64) -> Self {
        Self { cx, cy, radius }
    }

    /// True if the point lies inside or on the circle.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        let dx = x - self.cx;
        let dy = y - self.cy;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    pub fn contains_pixel(&self, col: usize, row: usize) -> bool {
        self.contains_point(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Normalized distance from the center: 0.0 at the center, 1.0 on the rim.
    pub fn normalized_distance(&self, x: f64, y: f64) -> f64 {
        if self.radius <= 0.0 {
            return f64::INFINITY;
        }
        let dx = x - self.cx;
        let dy = y - self.cy;
        (dx * dx + dy * dy).sqrt() / self.radius
    }

    /// Bounding square of the circle clamped to a `width × height` frame.
    ///
    /// Returns `None` when the clamped rectangle is empty.
    pub fn bounding_rect(&self, width: u32, height: u32) -> Option<RoiRect> {
        if self.radius <= 0.0 || width == 0 || height == 0 {
            return None;
        }
        let x0 = (self.cx - self.radius).floor().max(0.0);
        let y0 = (self.cy - self.radius).floor().max(0.0);
        let x1 = (self.cx + self.radius).ceil().min(width as f64);
        let y1 = (self.cy + self.radius).ceil().min(height as f64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        let rect = RoiRect {
            x: x0 as usize,
            y: y0 as usize,
            w: (x1 - x0) as usize,
            h: (y1 - y0) as usize,
        };
        (!rect.is_empty()).then_some(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_contains_center_and_rim() {
        let c = Circle::new(10.0, 10.0, 5.0);
        assert!(c.contains_point(10.0, 10.0));
        assert!(c.contains_point(15.0, 10.0));
        assert!(!c.contains_point(15.1, 10.0));
    }

    #[test]
    fn test_contains_pixel_uses_pixel_center() {
        let c = Circle::new(0.5, 0.5, 0.1);
        assert!(c.contains_pixel(0, 0));
        assert!(!c.contains_pixel(1, 0));
    }

    #[test]
    fn test_normalized_distance() {
        let c = Circle::new(0.0, 0.0, 10.0);
        assert_relative_eq!(c.normalized_distance(0.0, 0.0), 0.0);
        assert_relative_eq!(c.normalized_distance(6.0, 8.0), 1.0);
        assert_relative_eq!(c.normalized_distance(3.0, 4.0), 0.5);
    }

    #[test]
    fn test_bounding_rect_inside_frame() {
        let c = Circle::new(50.0, 40.0, 10.0);
        let r = c.bounding_rect(100, 100).unwrap();
        assert_eq!(r, RoiRect { x: 40, y: 30, w: 20, h: 20 });
    }

    #[test]
    fn test_bounding_rect_clamped_to_frame() {
        let c = Circle::new(5.0, 5.0, 50.0);
        let r = c.bounding_rect(30, 20).unwrap();
        assert_eq!(r, RoiRect { x: 0, y: 0, w: 30, h: 20 });
    }

    #[test]
    fn test_bounding_rect_outside_frame_is_none() {
        let c = Circle::new(-100.0, -100.0, 10.0);
        assert!(c.bounding_rect(50, 50).is_none());
    }

    #[test]
    fn test_bounding_rect_zero_radius_is_none() {
        let c = Circle::new(10.0, 10.0, 0.0);
        assert!(c.bounding_rect(50, 50).is_none());
    }
}
