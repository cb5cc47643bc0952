//! Visual preferences
//!
//! Persisted separately from best scores, as one JSON document.

use serde::{Deserialize, Serialize};

use crate::platform::Storage;

/// One switchable visual effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Trails,
    Sparkles,
    CenterLine,
    Glow,
    Celebrations,
}

impl Toggle {
    /// Keyboard shortcut for this toggle
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "t" | "T" => Some(Toggle::Trails),
            "s" | "S" => Some(Toggle::Sparkles),
            "l" | "L" => Some(Toggle::CenterLine),
            "g" | "G" => Some(Toggle::Glow),
            "c" | "C" => Some(Toggle::Celebrations),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ball trails
    pub trails: bool,
    /// Twinkling background sparkles
    pub sparkles: bool,
    /// Dashed centre line
    pub center_line: bool,
    /// Glow halo around ball and paddle
    pub glow: bool,
    /// Flash the title on a new high score
    pub celebrations: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trails: true,
            sparkles: true,
            center_line: true,
            glow: true,
            celebrations: true,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "neon_arcade_settings";

    /// Load settings, falling back to defaults on missing or corrupt data
    pub fn load(storage: &impl Storage) -> Self {
        if let Some(json) = storage.get_item(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Discarding corrupt settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Flip one effect, returning its new state
    pub fn toggle(&mut self, toggle: Toggle) -> bool {
        let flag = match toggle {
            Toggle::Trails => &mut self.trails,
            Toggle::Sparkles => &mut self.sparkles,
            Toggle::CenterLine => &mut self.center_line,
            Toggle::Glow => &mut self.glow,
            Toggle::Celebrations => &mut self.celebrations,
        };
        *flag = !*flag;
        *flag
    }

    pub fn save(&self, storage: &mut impl Storage) {
        match serde_json::to_string(self) {
            Ok(json) => {
                storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}
