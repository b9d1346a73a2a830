//! Configuration file support for SetDeck.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/setdeck/config.toml`.

use crate::deck::DEFAULT_SKIP_OFFSET;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub deck: DeckConfig,

    #[serde(default)]
    pub gesture: GestureConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Deck reordering configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeckConfig {
    /// How many cards a skipped card goes behind
    #[serde(default = "default_skip_offset")]
    pub skip_offset: usize,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            skip_offset: default_skip_offset(),
        }
    }
}

/// Swipe classification thresholds
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct GestureConfig {
    /// Horizontal travel (px) that commits a swipe regardless of speed
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f64,

    /// Release speed (px/ms) that commits a shorter flick
    #[serde(default = "default_velocity_threshold")]
    pub velocity_threshold: f64,

    /// Minimum travel (px) for a flick to count
    #[serde(default = "default_flick_min_distance")]
    pub flick_min_distance: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            distance_threshold: default_distance_threshold(),
            velocity_threshold: default_velocity_threshold(),
            flick_min_distance: default_flick_min_distance(),
        }
    }
}

/// Presentation options
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_weight_unit")]
    pub weight_unit: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            weight_unit: default_weight_unit(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("setdeck")
}

fn default_skip_offset() -> usize {
    DEFAULT_SKIP_OFFSET
}

fn default_distance_threshold() -> f64 {
    100.0
}

fn default_velocity_threshold() -> f64 {
    0.5
}

fn default_flick_min_distance() -> f64 {
    20.0
}

fn default_weight_unit() -> String {
    "kg".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values that would make skipping or swiping meaningless
    pub fn validate(&self) -> Result<()> {
        if self.deck.skip_offset == 0 {
            return Err(Error::Config(
                "deck.skip_offset must be at least 1".into(),
            ));
        }

        let g = &self.gesture;
        for (name, value) in [
            ("gesture.distance_threshold", g.distance_threshold),
            ("gesture.velocity_threshold", g.velocity_threshold),
            ("gesture.flick_min_distance", g.flick_min_distance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("setdeck").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
