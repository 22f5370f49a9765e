//! Viewer settings, read from an optional TOML file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use spiderling_core::{DisplayMode, LoadOptions};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Target redraw rate
    pub fps: u32,
    /// Automatic orbit speed in radians per second
    pub spin_speed: f32,
    /// Distance of the camera from the model, which is scaled to a unit sphere
    pub orbit_radius: f32,
    pub display_mode: DisplayMode,
    pub load: LoadOptions,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            spin_speed: 0.5,
            orbit_radius: 3.0,
            display_mode: DisplayMode::Solid,
            load: LoadOptions::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spiderling_core::CornerFormat;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(ViewerConfig::from_toml("").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ViewerConfig::from_toml(
            r#"
            fps = 30
            display_mode = "wireframe"

            [load]
            corner_format = "partial"
            "#,
        )
        .unwrap();

        assert_eq!(config.fps, 30);
        assert_eq!(config.display_mode, DisplayMode::Wireframe);
        assert_eq!(config.load.corner_format, CornerFormat::Partial);
        assert_eq!(config.orbit_radius, 3.0);
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(ViewerConfig::from_toml("display_mode = \"shaded\"").is_err());
    }
}
