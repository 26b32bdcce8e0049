pub const BLAZEFACE_MODEL_NAME: &str = "blazeface_short_range.onnx";

/// Smallest pixelation block of the still path; later layers grow by `DEFAULT_LAYER_STEP`.
pub const DEFAULT_BLOCK_SIZE: u32 = 15;
pub const DEFAULT_LAYER_COUNT: u32 = 3;
pub const DEFAULT_LAYER_STEP: u32 = 5;
pub const DEFAULT_NOISE_BLOBS: u32 = 30;

pub const DEFAULT_LIVE_BLOCK_SIZE: u32 = 12;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 500;
/// Run live detection every Nth tick; ticks in between reuse the last regions.
pub const DEFAULT_SKIP_INTERVAL: usize = 2;
/// Live frames are shrunk by this factor before detection.
pub const DEFAULT_DETECTION_SCALE: f64 = 0.5;

/// Manual marks get a radius of this fraction of the shorter image side.
pub const MANUAL_RADIUS_FRACTION: f64 = 0.08;
pub const STILL_RADIUS_SCALE: f64 = 1.2;
pub const LIVE_RADIUS_SCALE: f64 = 1.1;
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

pub const DESCRIPTION_FALLBACK_RADIUS: f64 = 50.0;

pub const JPEG_QUALITY: u8 = 90;

pub const INFO_STATUS_MS: u64 = 2000;
pub const ERROR_STATUS_MS: u64 = 5000;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
