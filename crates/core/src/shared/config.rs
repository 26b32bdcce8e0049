use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::obfuscation::domain::effect_mode::EffectMode;

use super::constants::{
    DEFAULT_BLOCK_SIZE, DEFAULT_CONFIDENCE, DEFAULT_DETECTION_SCALE, DEFAULT_LAYER_COUNT,
    DEFAULT_LAYER_STEP, DEFAULT_LIVE_BLOCK_SIZE, DEFAULT_NOISE_BLOBS, DEFAULT_SKIP_INTERVAL,
    DEFAULT_TICK_INTERVAL_MS, LIVE_RADIUS_SCALE, MANUAL_RADIUS_FRACTION, STILL_RADIUS_SCALE,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Engine configuration shared by the still and live paths.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PicaiConfig {
    pub block_size: u32,
    pub layer_count: u32,
    pub layer_step: u32,
    pub noise_blobs: u32,
    pub noise_seed: Option<u64>,
    pub live_block_size: u32,
    pub tick_interval_ms: u64,
    pub skip_interval: usize,
    pub detection_scale: f64,
    pub manual_radius_fraction: f64,
    pub still_radius_scale: f64,
    pub live_radius_scale: f64,
    pub confidence: f64,
    pub effect: EffectMode,
    pub model_url: Option<String>,
}

impl Default for PicaiConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            layer_count: DEFAULT_LAYER_COUNT,
            layer_step: DEFAULT_LAYER_STEP,
            noise_blobs: DEFAULT_NOISE_BLOBS,
            noise_seed: None,
            live_block_size: DEFAULT_LIVE_BLOCK_SIZE,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            skip_interval: DEFAULT_SKIP_INTERVAL,
            detection_scale: DEFAULT_DETECTION_SCALE,
            manual_radius_fraction: MANUAL_RADIUS_FRACTION,
            still_radius_scale: STILL_RADIUS_SCALE,
            live_radius_scale: LIVE_RADIUS_SCALE,
            confidence: DEFAULT_CONFIDENCE,
            effect: EffectMode::Blur,
            model_url: None,
        }
    }
}

impl PicaiConfig {
    /// `<config dir>/picai/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("picai").join("config.json"))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `explicit` if given, else the default path when it exists,
    /// else built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => {
                log::debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        fs::write(path, json).map_err(write_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 || self.live_block_size == 0 {
            return Err(ConfigError::Invalid("block sizes must be positive".into()));
        }
        if self.layer_count == 0 {
            return Err(ConfigError::Invalid("layer_count must be at least 1".into()));
        }
        if self.skip_interval == 0 {
            return Err(ConfigError::Invalid("skip_interval must be at least 1".into()));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".into()));
        }
        if !(self.detection_scale > 0.0 && self.detection_scale <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "detection_scale must be in (0, 1], got {}",
                self.detection_scale
            )));
        }
        if !(self.manual_radius_fraction > 0.0 && self.manual_radius_fraction <= 0.5) {
            return Err(ConfigError::Invalid(format!(
                "manual_radius_fraction must be in (0, 0.5], got {}",
                self.manual_radius_fraction
            )));
        }
        if self.still_radius_scale <= 0.0 || self.live_radius_scale <= 0.0 {
            return Err(ConfigError::Invalid("radius scales must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(ConfigError::Invalid(format!(
                "confidence must be between 0.0 and 1.0, got {}",
                self.confidence
            )));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
