use std::{fs, path::PathBuf};

use crate::enhancement::Enhancement;
use crate::image::PngCompression;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    pub enhancement: Enhancement,
    pub png_compression: PngCompression,
    // Also store original and result next to each other
    pub side_by_side: bool,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            enhancement: Enhancement::BilateralFiltering,
            png_compression: PngCompression::Default,
            side_by_side: false,
        }
    }
}

impl EnhanceConfig {
    pub fn load() -> Option<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn save(&self) -> Option<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    fn load_from(config_path: &std::path::Path) -> Option<Self> {
        fs::read_to_string(config_path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
    }

    fn save_to(&self, config_path: &std::path::Path) -> Option<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).ok()?;
        }

        serde_json::to_string_pretty(self)
            .ok()
            .and_then(|json| fs::write(config_path, json).ok())
    }

    pub fn config_path() -> Option<PathBuf> {
        let home = std::env::home_dir()?;
        Some(home.join(".config").join("imgenhance").join("config.json"))
    }
}
