//! Configuration file handling for camlab.
//!
//! Loads configuration from `~/.config/camlab/config.toml` or a custom path.
//! Command-line flags take precedence over anything set here.

use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::frame::DEFAULT_MAX_PAYLOAD;
use crate::process::ScaleFactor;

/// Default bright-pixel budget, matching the board firmware.
pub const DEFAULT_MAX_PIXELS: usize = 1000;
/// Default raw frame geometry sent by the board.
pub const DEFAULT_FRAME_WIDTH: u32 = 96;
pub const DEFAULT_FRAME_HEIGHT: u32 = 96;

/// Configuration file structure for camlab.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub threshold: ThresholdConfig,
    #[serde(default)]
    pub resample: ResampleConfig,
    #[serde(default)]
    pub receive: ReceiveConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ThresholdConfig {
    #[serde(default = "default_max_pixels")]
    pub max_pixels: usize,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ResampleConfig {
    /// Written as `"NUM/DEN"`, e.g. `"3/2"`
    #[serde(default = "default_scale", deserialize_with = "deserialize_scale")]
    pub scale: ScaleFactor,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ReceiveConfig {
    #[serde(default = "default_frame_width")]
    pub width: u32,
    #[serde(default = "default_frame_height")]
    pub height: u32,
    #[serde(default)]
    pub tagged: bool,
    #[serde(default = "default_max_payload")]
    pub max_payload: usize,
}

impl Default for ReceiveConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_FRAME_WIDTH,
            height: DEFAULT_FRAME_HEIGHT,
            tagged: false,
            max_payload: DEFAULT_MAX_PAYLOAD,
        }
    }
}

fn default_max_pixels() -> usize {
    DEFAULT_MAX_PIXELS
}

fn default_scale() -> ScaleFactor {
    ScaleFactor::UP_3_2
}

fn default_frame_width() -> u32 {
    DEFAULT_FRAME_WIDTH
}

fn default_frame_height() -> u32 {
    DEFAULT_FRAME_HEIGHT
}

fn default_max_payload() -> usize {
    DEFAULT_MAX_PAYLOAD
}

fn deserialize_scale<'de, D>(deserializer: D) -> Result<ScaleFactor, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("loaded config from {}", path.display());
            Ok(config)
        } else {
            log::debug!("no config at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("camlab").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/camlab/config.toml")
        })
}

/// Commented config file written by `camlab config init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# camlab configuration

[threshold]
# Maximum number of bright pixels kept in the binary mask
max_pixels = 1000

[resample]
# Scale factor as "NUM/DEN" (3/2 enlarges, 2/3 shrinks)
scale = "3/2"

[receive]
# Geometry of raw gray frames (used with --raw)
width = 96
height = 96
# Frames carry a one-byte image-type tag after the sync word
tagged = false
# Largest accepted payload in bytes
max_payload = 4194304
"#;
