use serde::Serialize;

use crate::obfuscation::domain::draw_command::DrawCommand;
use crate::shared::frame::Frame;

use super::raster::{fill_block, fill_gradient_disc};

/// A glyph placed on the overlay. Text shaping belongs to whoever presents
/// the overlay, so stamps are recorded rather than rasterized.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GlyphStamp {
    pub center: (f64, f64),
    pub glyph: &'static str,
    pub font_size: f64,
}

/// Transparent RGBA surface laid over the live video.
#[derive(Clone, Debug)]
pub struct Overlay {
    surface: Frame,
    glyphs: Vec<GlyphStamp>,
}

impl Overlay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: Frame::transparent(width, height),
            glyphs: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn surface(&self) -> &Frame {
        &self.surface
    }

    pub fn glyphs(&self) -> &[GlyphStamp] {
        &self.glyphs
    }

    /// Resizes the surface, discarding its content.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.size() != (width, height) {
            self.surface = Frame::transparent(width, height);
        }
        self.clear();
    }

    pub fn clear(&mut self) {
        self.surface.data_mut().fill(0);
        self.glyphs.clear();
    }

    /// True when every pixel is fully transparent and no glyph is placed.
    pub fn is_clear(&self) -> bool {
        self.glyphs.is_empty() && self.surface.data().chunks_exact(4).all(|px| px[3] == 0)
    }

    pub fn apply(&mut self, commands: &[DrawCommand]) {
        for command in commands {
            match command {
                DrawCommand::GradientDisc { circle, gradient } => {
                    fill_gradient_disc(&mut self.surface, circle, gradient);
                }
                DrawCommand::Block {
                    x,
                    y,
                    size,
                    color,
                    clip,
                } => fill_block(&mut self.surface, *x, *y, *size, *color, clip),
                DrawCommand::Glyph {
                    circle,
                    glyph,
                    font_size,
                } => self.glyphs.push(GlyphStamp {
                    center: (circle.cx, circle.cy),
                    glyph: *glyph,
                    font_size: *font_size,
                }),
            }
        }
    }
}
