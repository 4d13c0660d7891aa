//! Application settings (tabwind.toml)
//!
//! ```toml
//! [settings]
//! transparency = 220
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::errors::ConfigError;

/// Overlay opacity used when nothing usable is configured
pub const DEFAULT_TRANSPARENCY: u8 = 220;

/// Settings file name, looked up beside the executable first
pub const CONFIG_FILE_NAME: &str = "tabwind.toml";

/// File layout as written by users. Values are taken wide so out-of-range
/// numbers can be clamped instead of rejected.
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(default)]
    settings: RawSection,
}

#[derive(Debug, Default, Deserialize)]
struct RawSection {
    transparency: Option<i64>,
}

/// Effective settings, read once at startup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Global opacity multiplier for the overlay, 0..=255
    pub transparency: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            transparency: DEFAULT_TRANSPARENCY,
        }
    }
}

impl Settings {
    /// Find tabwind.toml: executable directory, then %APPDATA%/tabwind
    pub fn find_config_path() -> Option<PathBuf> {
        let candidates = [
            Some(crate::log::exe_dir().join(CONFIG_FILE_NAME)),
            dirs::config_dir().map(|p| p.join("tabwind").join(CONFIG_FILE_NAME)),
        ];

        candidates.into_iter().flatten().find(|p| p.exists())
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load() -> Self {
        let Some(path) = Self::find_config_path() else {
            log!("No {} found, using defaults", CONFIG_FILE_NAME);
            return Self::default();
        };

        match Self::load_from_path(&path) {
            Ok(settings) => {
                log!(
                    "Loaded settings from {}: transparency={}",
                    path.display(),
                    settings.transparency
                );
                settings
            }
            Err(e) => {
                log!("Failed to load {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load settings from a specific file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse settings text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawSettings = toml::from_str(content)?;
        Ok(Self {
            transparency: raw
                .settings
                .transparency
                .map(clamp_transparency)
                .unwrap_or(DEFAULT_TRANSPARENCY),
        })
    }
}

fn clamp_transparency(value: i64) -> u8 {
    value.clamp(0, u8::MAX as i64) as u8
}
