pub mod live_overlay_renderer;
pub mod overlay;
mod pixelation;
pub mod raster;
pub mod still_obfuscator;
