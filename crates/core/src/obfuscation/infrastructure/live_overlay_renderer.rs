use crate::obfuscation::domain::draw_command::{DrawCommand, RadialGradient, Rgba};
use crate::obfuscation::domain::effect_mode::EffectMode;
use crate::shared::constants::DEFAULT_LIVE_BLOCK_SIZE;
use crate::shared::face_region::FaceRegion;
use crate::shared::frame::Frame;
use crate::shared::geometry::{Circle, RoiRect};

use super::pixelation::block_average;

/// Glyphs are drawn slightly larger than the face circle.
const GLYPH_SCALE: f64 = 1.5;

/// Turns the current face regions into draw commands for the live overlay.
///
/// Regions arrive in frame coordinates; commands are emitted in overlay
/// coordinates so the overlay can be sized to the display rather than the
/// sensor. The blur treatment samples block colors from the frame itself.
pub struct LiveOverlayRenderer {
    block_size: u32,
    effect: EffectMode,
}

impl LiveOverlayRenderer {
    pub fn new(block_size: u32, effect: EffectMode) -> Self {
        Self {
            block_size: block_size.max(1),
            effect,
        }
    }

    pub fn effect(&self) -> EffectMode {
        self.effect
    }

    pub fn set_effect(&mut self, effect: EffectMode) {
        self.effect = effect;
    }

    pub fn render(
        &self,
        frame: &Frame,
        regions: &[FaceRegion],
        overlay_size: (u32, u32),
    ) -> Vec<DrawCommand> {
        if frame.width() == 0 || frame.height() == 0 {
            return Vec::new();
        }
        let sx = overlay_size.0 as f64 / frame.width() as f64;
        let sy = overlay_size.1 as f64 / frame.height() as f64;

        let mut commands = Vec::new();
        for region in regions {
            let Ok(scaled) = region.scaled(sx, sy) else {
                continue;
            };
            let circle = scaled.circle();
            match self.effect.glyph() {
                None => {
                    self.push_pixel_blocks(&mut commands, frame, &circle, sx, sy);
                    commands.push(DrawCommand::GradientDisc {
                        circle,
                        gradient: RadialGradient::live_wash(),
                    });
                }
                Some(glyph) => {
                    commands.push(DrawCommand::GradientDisc {
                        circle,
                        gradient: RadialGradient::glyph_backdrop(),
                    });
                    commands.push(DrawCommand::Glyph {
                        circle,
                        glyph,
                        font_size: circle.radius * GLYPH_SCALE,
                    });
                }
            }
        }
        commands
    }

    /// Opaque squares over the circle's bounding square, each colored with
    /// the average of the frame pixels it covers.
    fn push_pixel_blocks(
        &self,
        commands: &mut Vec<DrawCommand>,
        frame: &Frame,
        circle: &Circle,
        sx: f64,
        sy: f64,
    ) {
        let block = self.block_size as f64;
        let start_x = circle.cx - circle.radius;
        let start_y = circle.cy - circle.radius;
        let end_x = circle.cx + circle.radius;
        let end_y = circle.cy + circle.radius;

        let mut y = start_y;
        while y < end_y {
            let mut x = start_x;
            while x < end_x {
                if let Some(color) = sample_block(frame, x, y, block, sx, sy) {
                    commands.push(DrawCommand::Block {
                        x: x.floor() as i64,
                        y: y.floor() as i64,
                        size: self.block_size,
                        color,
                        clip: *circle,
                    });
                }
                x += block;
            }
            y += block;
        }
    }
}

impl Default for LiveOverlayRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_LIVE_BLOCK_SIZE, EffectMode::Blur)
    }
}

/// Average frame color under an overlay-space square, or `None` if the
/// square falls outside the frame.
fn sample_block(frame: &Frame, x: f64, y: f64, size: f64, sx: f64, sy: f64) -> Option<Rgba> {
    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let x0 = (x / sx).floor().max(0.0);
    let y0 = (y / sy).floor().max(0.0);
    let x1 = ((x + size) / sx).ceil().min(fw);
    let y1 = ((y + size) / sy).ceil().min(fh);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    let avg = block_average(
        frame,
        RoiRect {
            x: x0 as usize,
            y: y0 as usize,
            w: (x1 - x0) as usize,
            h: (y1 - y0) as usize,
        },
    );
    if avg.len() < 3 {
        return None;
    }
    Some(Rgba::opaque(avg[0], avg[1], avg[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn frame(w: u32, h: u32, value: u8) -> Frame {
        Frame::new(vec![value; (w * h * 4) as usize], w, h, 4, 0)
    }

    fn region(x: f64, y: f64, r: f64) -> FaceRegion {
        FaceRegion::new((x, y), r, 0.9).unwrap()
    }

    #[test]
    fn test_no_regions_no_commands() {
        let renderer = LiveOverlayRenderer::default();
        assert!(renderer.render(&frame(50, 50, 0), &[], (50, 50)).is_empty());
    }

    #[test]
    fn test_blur_emits_blocks_then_wash() {
        let renderer = LiveOverlayRenderer::new(12, EffectMode::Blur);
        let cmds = renderer.render(&frame(100, 100, 90), &[region(50.0, 50.0, 20.0)], (100, 100));

        assert!(matches!(cmds.last(), Some(DrawCommand::GradientDisc { .. })));
        let blocks: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Block { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        // 40px square / 12px blocks -> 4x4 grid
        assert_eq!(blocks.len(), 16);
        assert!(blocks.iter().all(|c| *c == Rgba::opaque(90, 90, 90)));
    }

    #[test]
    fn test_glyph_effect_emits_backdrop_and_glyph() {
        let renderer = LiveOverlayRenderer::new(12, EffectMode::Sunglasses);
        let cmds = renderer.render(&frame(100, 100, 0), &[region(50.0, 50.0, 20.0)], (100, 100));

        assert_eq!(cmds.len(), 2);
        match &cmds[1] {
            DrawCommand::Glyph {
                glyph, font_size, ..
            } => {
                assert_eq!(*glyph, "😎");
                assert_relative_eq!(*font_size, 30.0);
            }
            other => panic!("expected glyph, got {other:?}"),
        }
    }

    #[test]
    fn test_regions_scaled_to_overlay() {
        let renderer = LiveOverlayRenderer::new(12, EffectMode::Smiley);
        let cmds = renderer.render(&frame(200, 100, 0), &[region(100.0, 50.0, 20.0)], (100, 50));
        match &cmds[0] {
            DrawCommand::GradientDisc { circle, .. } => {
                assert_relative_eq!(circle.cx, 50.0);
                assert_relative_eq!(circle.cy, 25.0);
                assert_relative_eq!(circle.radius, 10.0);
            }
            other => panic!("expected disc, got {other:?}"),
        }
    }

    #[test]
    fn test_set_effect() {
        let mut renderer = LiveOverlayRenderer::default();
        renderer.set_effect(EffectMode::Cool);
        assert_eq!(renderer.effect(), EffectMode::Cool);
    }

    #[test]
    fn test_blocks_outside_frame_skipped() {
        let renderer = LiveOverlayRenderer::new(10, EffectMode::Blur);
        // Circle hangs off the left edge; blocks fully outside are dropped
        let cmds = renderer.render(&frame(100, 100, 10), &[region(0.0, 50.0, 20.0)], (100, 100));
        let blocks = cmds
            .iter()
            .filter(|c| matches!(c, DrawCommand::Block { .. }))
            .count();
        assert_eq!(blocks, 8);
    }
}
