use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Suggested file name handed to the sink
pub const DEFAULT_OUTPUT_NAME: &str = "merged.pdf";
/// Standard font used for the stamp
pub const DEFAULT_STAMP_FONT: &str = "Helvetica";

/// Stamp text color (RGB, each component 0.0-1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl TextColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub const fn dark_red() -> Self {
        Self::new(0.8, 0.0, 0.0)
    }

    pub const fn blue() -> Self {
        Self::new(0.0, 0.0, 0.8)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "black" => Some(Self::black()),
            "darkred" | "dark_red" | "dark-red" => Some(Self::dark_red()),
            "blue" => Some(Self::blue()),
            _ => None,
        }
    }

    /// Components clamped to the range PDF color operators accept.
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }
}

impl Default for TextColor {
    fn default() -> Self {
        Self::black()
    }
}

/// How and where the label is drawn on each stamped page.
///
/// The position is measured from the page's top-right corner:
/// `x = width - offset_x`, `y = height - offset_y` in PDF user space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampConfig {
    /// Name of a standard Latin Type1 font (e.g. "Helvetica", "Times-Bold")
    #[serde(default = "default_font")]
    pub font: String,

    /// Font size in points
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// Distance from the right page edge to the label origin
    #[serde(default = "default_offset_x")]
    pub offset_x: f32,

    /// Distance from the top page edge to the label baseline
    #[serde(default = "default_offset_y")]
    pub offset_y: f32,

    #[serde(default)]
    pub color: TextColor,
}

fn default_font() -> String {
    DEFAULT_STAMP_FONT.to_string()
}

const fn default_font_size() -> f32 {
    12.0
}

const fn default_offset_x() -> f32 {
    70.0
}

const fn default_offset_y() -> f32 {
    30.0
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            font: default_font(),
            font_size: default_font_size(),
            offset_x: default_offset_x(),
            offset_y: default_offset_y(),
            color: TextColor::default(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Stamp appearance
    #[serde(default)]
    pub stamp: StampConfig,

    /// File name suggested to the sink for the merged document
    #[serde(default = "default_output_name")]
    pub output_name: String,

    /// Compress uncompressed streams before writing
    #[serde(default = "default_true")]
    pub compress: bool,
}

fn default_output_name() -> String {
    DEFAULT_OUTPUT_NAME.to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stamp: StampConfig::default(),
            output_name: default_output_name(),
            compress: true,
        }
    }
}

impl AppConfig {
    /// Parse configuration from TOML text and validate it
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Load from default locations (~/.config/pdf-stamper/config.toml, ./config.toml)
    pub fn load() -> Self {
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("pdf-stamper").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        let local_config = std::path::PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    /// Reject values that would make every merge fail or produce garbage.
    pub fn validate(&self) -> Result<()> {
        if !(self.stamp.font_size.is_finite() && self.stamp.font_size > 0.0) {
            return Err(Error::ConfigInvalid {
                field: "stamp.font_size".to_string(),
                reason: format!("must be a positive number, got {}", self.stamp.font_size),
            });
        }

        if !(self.stamp.offset_x.is_finite() && self.stamp.offset_y.is_finite()) {
            return Err(Error::ConfigInvalid {
                field: "stamp.offset".to_string(),
                reason: "offsets must be finite".to_string(),
            });
        }

        if self.output_name.trim().is_empty() {
            return Err(Error::ConfigInvalid {
                field: "output_name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
