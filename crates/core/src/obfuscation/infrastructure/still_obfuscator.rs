use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::obfuscation::domain::draw_command::{RadialGradient, Rgba};
use crate::obfuscation::domain::frame_obfuscator::FrameObfuscator;
use crate::shared::config::PicaiConfig;
use crate::shared::constants::{
    DEFAULT_BLOCK_SIZE, DEFAULT_LAYER_COUNT, DEFAULT_LAYER_STEP, DEFAULT_NOISE_BLOBS,
};
use crate::shared::face_region::FaceRegion;
use crate::shared::frame::Frame;
use crate::shared::geometry::Circle;

use super::pixelation::pixelate_circle;
use super::raster::{fill_disc, fill_gradient_disc};

const NOISE_ALPHA: f32 = 0.3;
const NOISE_CHANNEL_MIN: u8 = 50;
const NOISE_CHANNEL_MAX: u8 = 150;
const NOISE_RADIUS_MIN: f64 = 3.0;
const NOISE_RADIUS_MAX: f64 = 11.0;

/// High-quality obfuscation for captured photos.
///
/// Three passes over all regions: layered block-average pixelation clipped to
/// each circle, a dark radial wash per circle, then low-alpha noise blobs
/// scattered inside each circle. Overlapping circles therefore compound their
/// washes on top of a fully pixelated area.
///
/// With a `noise_seed` the output is reproducible for identical input. Each
/// region's noise stream is derived from the seed and the region's geometry,
/// so it does not depend on which other regions are present.
pub struct StillObfuscator {
    block_size: u32,
    layer_count: u32,
    layer_step: u32,
    noise_blobs: u32,
    noise_seed: Option<u64>,
    wash: RadialGradient,
}

impl StillObfuscator {
    pub fn new(block_size: u32, layer_count: u32, layer_step: u32, noise_blobs: u32) -> Self {
        Self {
            block_size: block_size.max(1),
            layer_count: layer_count.max(1),
            layer_step,
            noise_blobs,
            noise_seed: None,
            wash: RadialGradient::still_wash(),
        }
    }

    pub fn from_config(config: &PicaiConfig) -> Self {
        Self::new(
            config.block_size,
            config.layer_count,
            config.layer_step,
            config.noise_blobs,
        )
        .with_seed(config.noise_seed)
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.noise_seed = seed;
        self
    }

    /// Block sizes applied in order, smallest first.
    pub fn layer_block_sizes(&self) -> Vec<u32> {
        (0..self.layer_count)
            .map(|layer| self.block_size + layer * self.layer_step)
            .collect()
    }

    fn rng_for(&self, circle: &Circle) -> StdRng {
        match self.noise_seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ geometry_key(circle)),
            None => StdRng::from_entropy(),
        }
    }

    fn scatter_noise(&self, frame: &mut Frame, circle: &Circle, rng: &mut StdRng) {
        let r = circle.radius;
        for _ in 0..self.noise_blobs {
            let nx = circle.cx + (rng.gen::<f64>() - 0.5) * r * 2.0;
            let ny = circle.cy + (rng.gen::<f64>() - 0.5) * r * 2.0;
            if !circle.contains_point(nx, ny) {
                continue;
            }
            let color = Rgba::new(
                rng.gen_range(NOISE_CHANNEL_MIN..NOISE_CHANNEL_MAX),
                rng.gen_range(NOISE_CHANNEL_MIN..NOISE_CHANNEL_MAX),
                rng.gen_range(NOISE_CHANNEL_MIN..NOISE_CHANNEL_MAX),
                NOISE_ALPHA,
            );
            let blob = Circle::new(nx, ny, rng.gen_range(NOISE_RADIUS_MIN..NOISE_RADIUS_MAX));
            fill_disc(frame, &blob, color, circle);
        }
    }
}

fn geometry_key(circle: &Circle) -> u64 {
    circle.cx.to_bits().rotate_left(21)
        ^ circle.cy.to_bits().rotate_left(42)
        ^ circle.radius.to_bits()
}

impl Default for StillObfuscator {
    fn default() -> Self {
        Self::new(
            DEFAULT_BLOCK_SIZE,
            DEFAULT_LAYER_COUNT,
            DEFAULT_LAYER_STEP,
            DEFAULT_NOISE_BLOBS,
        )
    }
}

impl FrameObfuscator for StillObfuscator {
    fn obfuscate(
        &self,
        frame: &mut Frame,
        regions: &[FaceRegion],
    ) -> Result<(), Box<dyn std::error::Error>> {
        if regions.is_empty() {
            return Ok(());
        }
        let (width, height) = (frame.width(), frame.height());
        let circles: Vec<Circle> = regions
            .iter()
            .map(|region| region.clamped_to(width, height).circle())
            .filter(|circle| circle.bounding_rect(width, height).is_some())
            .collect();
        let block_sizes = self.layer_block_sizes();

        for circle in &circles {
            for &block in &block_sizes {
                pixelate_circle(frame, circle, block);
            }
        }
        for circle in &circles {
            fill_gradient_disc(frame, circle, &self.wash);
        }
        for circle in &circles {
            let mut rng = self.rng_for(circle);
            self.scatter_noise(frame, circle, &mut rng);
        }

        log::debug!(
            "Obfuscated {} region(s) in {}x{} frame",
            circles.len(),
            width,
            height
        );
        Ok(())
    }
}
