use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::fsystem::{Position, WELCOME_TEXT};
use crate::gesture::Size;

/// Desktop surface geometry. The original took these from the live DOM
/// rect; here they are configuration, defaulting to the values the source
/// was written against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    pub surface: Size,
    pub taskbar_height: f64,
    /// Icon cell edge; icons are clamped and gridded on this.
    pub icon_cell: f64,
    pub margin: f64,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        DesktopConfig {
            surface: Size::new(1280.0, 720.0),
            taskbar_height: 48.0,
            icon_cell: 96.0,
            margin: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub initial_position: Position,
    pub initial_size: Size,
    pub min_size: Size,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            initial_position: Position::new(100.0, 100.0),
            initial_size: Size::new(800.0, 600.0),
            min_size: Size::new(400.0, 300.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub desktop: DesktopConfig,
    pub window: WindowConfig,
    pub welcome_text: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        SystemConfig {
            desktop: DesktopConfig::default(),
            window: WindowConfig::default(),
            welcome_text: WELCOME_TEXT.to_string(),
        }
    }
}

impl SystemConfig {
    pub fn load(path: &Path) -> Result<SystemConfig> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_source_constants() {
        let config = SystemConfig::default();
        assert_eq!(config.desktop.icon_cell, 96.0);
        assert_eq!(config.desktop.margin, 20.0);
        assert_eq!(config.window.initial_position, Position::new(100.0, 100.0));
        assert_eq!(config.window.initial_size, Size::new(800.0, 600.0));
        assert_eq!(config.window.min_size, Size::new(400.0, 300.0));
    }

    #[test]
    fn partial_config_files_fill_in_defaults() {
        let config: SystemConfig =
            serde_json::from_str(r#"{"desktop": {"icon_cell": 80.0}}"#).unwrap();
        assert_eq!(config.desktop.icon_cell, 80.0);
        assert_eq!(config.desktop.margin, 20.0);
        assert_eq!(config.window.min_size, Size::new(400.0, 300.0));
    }
}
