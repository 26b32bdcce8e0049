use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Live overlay treatment chosen by the user.
///
/// `Blur` draws the pixelation + gradient wash; every other mode covers the
/// face with a white disc and a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectMode {
    #[default]
    Blur,
    Smiley,
    Sunglasses,
    HeartEyes,
    Wink,
    Cool,
}

impl EffectMode {
    pub const ALL: &[EffectMode] = &[
        EffectMode::Blur,
        EffectMode::Smiley,
        EffectMode::Sunglasses,
        EffectMode::HeartEyes,
        EffectMode::Wink,
        EffectMode::Cool,
    ];

    /// Glyph stamped over the face, `None` for the blur treatment.
    pub fn glyph(&self) -> Option<&'static str> {
        match self {
            EffectMode::Blur => None,
            EffectMode::Smiley => Some("😊"),
            EffectMode::Sunglasses => Some("😎"),
            EffectMode::HeartEyes => Some("😍"),
            EffectMode::Wink => Some("😉"),
            EffectMode::Cool => Some("🤩"),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EffectMode::Blur => "blur",
            EffectMode::Smiley => "smiley",
            EffectMode::Sunglasses => "sunglasses",
            EffectMode::HeartEyes => "heart_eyes",
            EffectMode::Wink => "wink",
            EffectMode::Cool => "cool",
        }
    }
}

impl fmt::Display for EffectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectMode::Blur => write!(f, "Blur"),
            EffectMode::Smiley => write!(f, "Smiley"),
            EffectMode::Sunglasses => write!(f, "Sunglasses"),
            EffectMode::HeartEyes => write!(f, "Heart eyes"),
            EffectMode::Wink => write!(f, "Wink"),
            EffectMode::Cool => write!(f, "Cool"),
        }
    }
}

impl FromStr for EffectMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        EffectMode::ALL
            .iter()
            .copied()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = EffectMode::ALL.iter().map(|m| m.name()).collect();
                format!("Effect must be one of: {}, got '{s}'", names.join(", "))
            })
    }
}
