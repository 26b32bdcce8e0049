use crate::shared::geometry::Circle;

/// Straight (non-premultiplied) color with fractional alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub const fn gray(level: u8, a: f32) -> Self {
        Self::new(level, level, level, a)
    }

    /// Linear interpolation between two colors, `t` in `[0, 1]`.
    pub fn lerp(&self, other: &Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

/// Radial gradient from a circle's center (offset 0) to its rim (offset 1).
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    stops: Vec<ColorStop>,
}

impl RadialGradient {
    /// Stops are sorted by offset; offsets are clamped into `[0, 1]`.
    pub fn new(mut stops: Vec<ColorStop>) -> Self {
        for s in &mut stops {
            s.offset = s.offset.clamp(0.0, 1.0);
        }
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Self { stops }
    }

    /// Dark wash laid over pixelated faces in a still photo.
    pub fn still_wash() -> Self {
        Self::new(vec![
            ColorStop { offset: 0.0, color: Rgba::gray(60, 0.8) },
            ColorStop { offset: 0.5, color: Rgba::gray(80, 0.7) },
            ColorStop { offset: 1.0, color: Rgba::gray(100, 0.5) },
        ])
    }

    /// Slightly denser wash for the live overlay.
    pub fn live_wash() -> Self {
        Self::new(vec![
            ColorStop { offset: 0.0, color: Rgba::gray(60, 0.9) },
            ColorStop { offset: 0.5, color: Rgba::gray(80, 0.8) },
            ColorStop { offset: 1.0, color: Rgba::gray(100, 0.6) },
        ])
    }

    /// White backdrop behind a glyph.
    pub fn glyph_backdrop() -> Self {
        Self::new(vec![
            ColorStop { offset: 0.0, color: Rgba::gray(255, 0.9) },
            ColorStop { offset: 0.7, color: Rgba::gray(255, 0.8) },
            ColorStop { offset: 1.0, color: Rgba::gray(255, 0.6) },
        ])
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at normalized distance `t` from the center.
    pub fn color_at(&self, t: f32) -> Rgba {
        let Some(first) = self.stops.first() else {
            return Rgba::new(0, 0, 0, 0.0);
        };
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= f32::EPSILON {
                    return b.color;
                }
                return a.color.lerp(&b.color, (t - a.offset) / span);
            }
        }
        self.stops[self.stops.len() - 1].color
    }
}

/// One drawing operation on a live overlay surface.
///
/// Every command is clipped to a circle so nothing is painted outside the
/// face it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    GradientDisc {
        circle: Circle,
        gradient: RadialGradient,
    },
    Block {
        x: i64,
        y: i64,
        size: u32,
        color: Rgba,
        clip: Circle,
    },
    Glyph {
        circle: Circle,
        glyph: &'static str,
        font_size: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lerp_midpoint() {
        let a = Rgba::gray(60, 0.8);
        let b = Rgba::gray(80, 0.6);
        let m = a.lerp(&b, 0.5);
        assert_eq!(m.r, 70);
        assert_relative_eq!(m.a, 0.7, epsilon = 1e-6);
    }

    #[test]
    fn test_color_at_stops() {
        let g = RadialGradient::still_wash();
        assert_eq!(g.color_at(0.0), Rgba::gray(60, 0.8));
        assert_eq!(g.color_at(0.5), Rgba::gray(80, 0.7));
        assert_eq!(g.color_at(1.0), Rgba::gray(100, 0.5));
    }

    #[test]
    fn test_color_at_between_stops() {
        let g = RadialGradient::still_wash();
        let c = g.color_at(0.25);
        assert_eq!(c.r, 70);
        assert_relative_eq!(c.a, 0.75, epsilon = 1e-6);
    }

    #[test]
    fn test_color_beyond_rim_uses_last_stop() {
        let g = RadialGradient::live_wash();
        assert_eq!(g.color_at(1.5), Rgba::gray(100, 0.6));
    }

    #[test]
    fn test_stops_sorted_on_construction() {
        let g = RadialGradient::new(vec![
            ColorStop { offset: 1.0, color: Rgba::gray(0, 1.0) },
            ColorStop { offset: 0.0, color: Rgba::gray(255, 1.0) },
        ]);
        assert_relative_eq!(g.stops()[0].offset, 0.0);
        assert_eq!(g.color_at(0.0).r, 255);
    }

    #[test]
    fn test_empty_gradient_is_transparent() {
        let g = RadialGradient::new(vec![]);
        assert_relative_eq!(g.color_at(0.3).a, 0.0);
    }
}
