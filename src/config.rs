//! Configuration module for the renderer

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::images::{CellBox, Protocol};
use crate::theme::Theme;

/// Rendering configuration
///
/// Carries everything the host declares once at startup: the negotiated
/// graphics protocol, the cell pixel box, default widths and the theme. The
/// engine never probes the terminal for any of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Selected theme
    #[serde(default)]
    pub theme: Theme,

    /// Graphics protocol declared by the terminal driver
    #[serde(default)]
    pub protocol: Protocol,

    /// Pixel dimensions of one terminal cell
    #[serde(default)]
    pub cell: CellBox,

    /// Default wrap width when the host gives no better one
    #[serde(default = "default_text_width")]
    pub text_width: usize,

    /// Width of rendered media previews, in cells
    #[serde(default = "default_media_cols")]
    pub media_cols: usize,

    /// Height of rendered media previews, in cells
    #[serde(default = "default_media_rows")]
    pub media_rows: usize,

    /// Whether to render media previews at all
    #[serde(default = "default_show_media")]
    pub show_media: bool,
}

fn default_text_width() -> usize {
    72
}

fn default_media_cols() -> usize {
    40
}

fn default_media_rows() -> usize {
    10
}

fn default_show_media() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            protocol: Protocol::default(),
            cell: CellBox::default(),
            text_width: default_text_width(),
            media_cols: default_media_cols(),
            media_rows: default_media_rows(),
            show_media: default_show_media(),
        }
    }
}

impl RenderConfig {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("tern");
        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = RenderConfig::load_from(&PathBuf::from("/nonexistent/tern.toml")).unwrap();
        assert_eq!(config.text_width, 72);
        assert_eq!(config.protocol, Protocol::Halfblock);
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = RenderConfig::default();
        config.protocol = Protocol::Sixel;
        config.media_rows = 14;
        config.save_to(&path).unwrap();

        let loaded = RenderConfig::load_from(&path).unwrap();
        assert_eq!(loaded.protocol, Protocol::Sixel);
        assert_eq!(loaded.media_rows, 14);
        assert_eq!(loaded.text_width, 72);
    }
}
