//! Pixel-level painting primitives shared by the still and live paths.
//!
//! All fills are clipped to the frame and to a circle; colors are composited
//! with source-over blending.

use crate::obfuscation::domain::draw_command::{RadialGradient, Rgba};
use crate::shared::frame::Frame;
use crate::shared::geometry::{Circle, RoiRect};

/// Source-over blend of `color` onto one pixel (3 or 4 channels).
pub fn blend_pixel(px: &mut [u8], color: Rgba) {
    let sa = color.a.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let src = [color.r as f32, color.g as f32, color.b as f32];

    if px.len() >= 4 {
        let da = px[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return;
        }
        for c in 0..3 {
            let v = (src[c] * sa + px[c] as f32 * da * (1.0 - sa)) / out_a;
            px[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        px[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    } else {
        for c in 0..px.len().min(3) {
            let v = src[c] * sa + px[c] as f32 * (1.0 - sa);
            px[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Fills `circle` with a radial gradient running from its center to its rim.
pub fn fill_gradient_disc(frame: &mut Frame, circle: &Circle, gradient: &RadialGradient) {
    let Some(rect) = circle.bounding_rect(frame.width(), frame.height()) else {
        return;
    };
    let channels = frame.channels() as usize;
    for row in rect.y..rect.y + rect.h {
        for col in rect.x..rect.x + rect.w {
            if !circle.contains_pixel(col, row) {
                continue;
            }
            let t = circle.normalized_distance(col as f64 + 0.5, row as f64 + 0.5);
            let color = gradient.color_at(t as f32);
            let off = frame.offset(col, row);
            blend_pixel(&mut frame.data_mut()[off..off + channels], color);
        }
    }
}

/// Fills the square `[x, x+size) × [y, y+size)` wherever it overlaps `clip`.
pub fn fill_block(frame: &mut Frame, x: i64, y: i64, size: u32, color: Rgba, clip: &Circle) {
    let Some(rect) = clamp_square(x, y, size, frame.width(), frame.height()) else {
        return;
    };
    let channels = frame.channels() as usize;
    for row in rect.y..rect.y + rect.h {
        for col in rect.x..rect.x + rect.w {
            if clip.contains_pixel(col, row) {
                let off = frame.offset(col, row);
                blend_pixel(&mut frame.data_mut()[off..off + channels], color);
            }
        }
    }
}

/// Fills the intersection of `disc` and `clip` with a flat color.
pub fn fill_disc(frame: &mut Frame, disc: &Circle, color: Rgba, clip: &Circle) {
    let Some(rect) = disc.bounding_rect(frame.width(), frame.height()) else {
        return;
    };
    let channels = frame.channels() as usize;
    for row in rect.y..rect.y + rect.h {
        for col in rect.x..rect.x + rect.w {
            if disc.contains_pixel(col, row) && clip.contains_pixel(col, row) {
                let off = frame.offset(col, row);
                blend_pixel(&mut frame.data_mut()[off..off + channels], color);
            }
        }
    }
}

fn clamp_square(x: i64, y: i64, size: u32, width: u32, height: u32) -> Option<RoiRect> {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + size as i64).min(width as i64);
    let y1 = (y + size as i64).min(height as i64);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(RoiRect {
        x: x0 as usize,
        y: y0 as usize,
        w: (x1 - x0) as usize,
        h: (y1 - y0) as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_frame(w: u32, h: u32, value: u8) -> Frame {
        Frame::new(vec![value; (w * h * 3) as usize], w, h, 3, 0)
    }

    #[test]
    fn test_blend_opaque_replaces_rgb() {
        let mut px = [10u8, 20, 30];
        blend_pixel(&mut px, Rgba::opaque(200, 100, 50));
        assert_eq!(px, [200, 100, 50]);
    }

    #[test]
    fn test_blend_half_alpha_rgb() {
        let mut px = [0u8, 0, 0];
        blend_pixel(&mut px, Rgba::gray(200, 0.5));
        assert_eq!(px, [100, 100, 100]);
    }

    #[test]
    fn test_blend_onto_transparent_rgba_keeps_source_color() {
        let mut px = [0u8, 0, 0, 0];
        blend_pixel(&mut px, Rgba::gray(80, 0.5));
        assert_eq!(&px[..3], &[80, 80, 80]);
        assert_eq!(px[3], 128);
    }

    #[test]
    fn test_blend_zero_alpha_is_noop() {
        let mut px = [1u8, 2, 3, 4];
        blend_pixel(&mut px, Rgba::gray(255, 0.0));
        assert_eq!(px, [1, 2, 3, 4]);
    }

    #[test]
    fn test_gradient_disc_leaves_corners() {
        let mut frame = rgb_frame(20, 20, 255);
        let circle = Circle::new(10.0, 10.0, 8.0);
        fill_gradient_disc(&mut frame, &circle, &RadialGradient::still_wash());
        assert_eq!(frame.pixel(0, 0), &[255, 255, 255]);
        assert!(frame.pixel(10, 10)[0] < 255);
    }

    #[test]
    fn test_fill_block_clipped_to_circle() {
        let mut frame = rgb_frame(20, 20, 0);
        let clip = Circle::new(10.0, 10.0, 3.0);
        fill_block(&mut frame, 0, 0, 20, Rgba::opaque(255, 255, 255), &clip);
        assert_eq!(frame.pixel(10, 10), &[255, 255, 255]);
        assert_eq!(frame.pixel(2, 2), &[0, 0, 0]);
    }

    #[test]
    fn test_fill_block_outside_frame_is_noop() {
        let mut frame = rgb_frame(10, 10, 7);
        let clip = Circle::new(0.0, 0.0, 100.0);
        fill_block(&mut frame, -50, -50, 10, Rgba::opaque(255, 0, 0), &clip);
        assert!(frame.data().iter().all(|&b| b == 7));
    }

    #[test]
    fn test_fill_disc_respects_clip() {
        let mut frame = rgb_frame(30, 30, 0);
        let disc = Circle::new(10.0, 10.0, 5.0);
        let clip = Circle::new(20.0, 10.0, 6.0);
        fill_disc(&mut frame, &disc, Rgba::opaque(255, 255, 255), &clip);
        // (7, 10) is in the disc but not the clip
        assert_eq!(frame.pixel(7, 10), &[0, 0, 0]);
        // (14, 10) is in both
        assert_eq!(frame.pixel(14, 10), &[255, 255, 255]);
    }
}
