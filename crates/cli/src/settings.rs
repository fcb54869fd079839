use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use chromakey_core::compositing::domain::composite_settings::CompositeSettings;
use chromakey_core::keying::domain::adjustment::Adjustment;
use chromakey_core::keying::domain::key_color::KeyColor;
use chromakey_core::keying::domain::keying_parameters::KeyingParameters;
use chromakey_core::shared::constants::{
    DEFAULT_KEY_COLOR, DEFAULT_SOFTNESS, DEFAULT_SPILL_SUPPRESSION, DEFAULT_TOLERANCE,
};

/// Persisted keying defaults. Command-line flags override each field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub key_color: [u8; 3],
    pub tolerance: u32,
    pub softness: u32,
    pub spill: u32,
    pub fg_brightness: i32,
    pub fg_contrast: f32,
    pub bg_brightness: i32,
    pub bg_contrast: f32,
    pub reverse_background: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            key_color: DEFAULT_KEY_COLOR,
            tolerance: DEFAULT_TOLERANCE,
            softness: DEFAULT_SOFTNESS,
            spill: DEFAULT_SPILL_SUPPRESSION,
            fg_brightness: 0,
            fg_contrast: 1.0,
            bg_brightness: 0,
            bg_contrast: 1.0,
            reverse_background: false,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("ChromaKey").join("settings.json"))
    }

    /// Loads from the platform config directory; missing or malformed
    /// files fall back to defaults.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|json| match serde_json::from_str(&json) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    log::warn!("Ignoring malformed settings at {}: {e}", path.display());
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Returns where the settings were written.
    pub fn save(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = Self::config_path().ok_or("No config directory on this platform")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn composite_settings(&self) -> CompositeSettings {
        CompositeSettings {
            key_color: KeyColor::from(self.key_color),
            keying: KeyingParameters::new(self.tolerance, self.softness, self.spill),
            foreground: Adjustment::new(self.fg_brightness, self.fg_contrast),
            background: Adjustment::new(self.bg_brightness, self.bg_contrast),
        }
    }
}
