//! Configuration management for Markdown Desk
//!
//! Handles loading and validating application configuration.
//! Configuration is a JSON file in the platform config directory; every
//! field is optional and falls back to its default.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier following reverse-DNS convention
pub const APP_ID: &str = "com.markdowndesk.MarkdownDesk";

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default file name for PDF exports
pub const DEFAULT_EXPORT_FILE_NAME: &str = "markdown-export.pdf";

/// A4 portrait width in millimetres
pub const A4_WIDTH_MM: f64 = 210.0;

/// A4 portrait height in millimetres
pub const A4_HEIGHT_MM: f64 = 297.0;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// PDF page geometry and typography
    pub layout: LayoutConfig,

    /// Preview rendering
    pub preview: PreviewConfig,

    /// Export output
    pub export: ExportConfig,

    /// Live preview file watching
    pub watch: WatchConfig,
}

impl Config {
    /// Load configuration from the default location or return defaults
    pub fn load() -> ConfigResult<Self> {
        let path = Self::config_dir()?.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject geometry the layout engine cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        let layout = &self.layout;
        if layout.line_height <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "layout.line_height".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if layout.margin < 0.0 || layout.margin * 2.0 >= layout.page_width {
            return Err(ConfigError::InvalidValue {
                key: "layout.margin".to_string(),
                reason: "must leave a positive usable width".to_string(),
            });
        }
        if layout.page_height - layout.margin <= layout.margin + layout.title_spacing {
            return Err(ConfigError::InvalidValue {
                key: "layout.page_height".to_string(),
                reason: "page too short for its margins".to_string(),
            });
        }
        Ok(())
    }

    /// Get the configuration directory path
    pub fn config_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Get the data directory path (persisted editor state)
    pub fn data_dir() -> ConfigResult<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }
}

/// Page geometry and typography for PDF export.
///
/// Lengths are millimetres, font sizes are points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    /// Base line height; blank lines advance half of it
    pub line_height: f64,
    /// Extra left offset for bullet items
    pub bullet_indent: f64,
    /// Gap between the title baseline and the first content line
    pub title_spacing: f64,
    pub title: String,
    pub title_font_size: f32,
    pub body_font_size: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH_MM,
            page_height: A4_HEIGHT_MM,
            margin: 20.0,
            line_height: 7.0,
            bullet_indent: 5.0,
            title_spacing: 10.0,
            title: "Markdown Export".to_string(),
            title_font_size: 18.0,
            body_font_size: 11.0,
        }
    }
}

/// Preview rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Highlight fenced code blocks that name a language
    pub highlight_code: bool,

    /// syntect theme used for highlighting
    pub code_theme: String,

    /// Include a table of contents in standalone HTML
    pub include_toc: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            highlight_code: true,
            code_theme: "base16-ocean.dark".to_string(),
            include_toc: false,
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name used when no output path is given
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

/// Live preview watching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Debounce interval in milliseconds
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 200 }
    }
}
