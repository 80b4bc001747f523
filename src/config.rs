//! Application configuration.
//!
//! Settings come from an optional `config.toml` in the config directory
//! (`--config`, default: current directory). The file is sparse: stock
//! defaults are serialized to a TOML table, the user file is merged on top key
//! by key, and the result is deserialized and validated.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [storage]
//! output_dir = "data/synthetic"     # Where generated and augmented PNGs go
//! database = "synthetic_images.db"  # Artifact table, relative to output_dir
//! usage_log = "logs.txt"            # Append-only augmentation parameter log
//!
//! [procedural]
//! width = 256
//! height = 256
//! count = 5                         # Images per `generate procedural` run
//! blur_sigma = 3.5                  # 0 disables the blur
//!
//! [gan]
//! width = 64
//! height = 64
//! count = 1
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the config directory.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// File locations.
    pub storage: StorageConfig,
    /// Procedural blob generator defaults.
    pub procedural: ProceduralConfig,
    /// GAN stub defaults.
    pub gan: GanConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.output_dir.is_empty() {
            return Err(ConfigError::Validation(
                "storage.output_dir must not be empty".into(),
            ));
        }
        if self.storage.database.is_empty() {
            return Err(ConfigError::Validation(
                "storage.database must not be empty".into(),
            ));
        }
        if self.procedural.width == 0 || self.procedural.height == 0 {
            return Err(ConfigError::Validation(
                "procedural.width and procedural.height must be non-zero".into(),
            ));
        }
        if !self.procedural.blur_sigma.is_finite() || self.procedural.blur_sigma < 0.0 {
            return Err(ConfigError::Validation(
                "procedural.blur_sigma must be a finite value >= 0".into(),
            ));
        }
        if self.gan.width == 0 || self.gan.height == 0 {
            return Err(ConfigError::Validation(
                "gan.width and gan.height must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Where artifacts, the database and the usage log live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub output_dir: String,
    /// Database filename, resolved inside `output_dir`.
    pub database: String,
    pub usage_log: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: "data/synthetic".to_string(),
            database: "synthetic_images.db".to_string(),
            usage_log: "logs.txt".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }

    pub fn database_path(&self) -> PathBuf {
        self.output_dir().join(&self.database)
    }

    pub fn usage_log_path(&self) -> PathBuf {
        PathBuf::from(&self.usage_log)
    }
}

/// Procedural generator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProceduralConfig {
    pub width: u32,
    pub height: u32,
    /// Default batch size.
    pub count: usize,
    /// Gaussian sigma applied after drawing; `0` disables the blur.
    pub blur_sigma: f32,
}

impl Default for ProceduralConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            count: 5,
            blur_sigma: crate::synth::procedural::DEFAULT_BLUR_SIGMA,
        }
    }
}

/// GAN stub settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GanConfig {
    pub width: u32,
    pub height: u32,
    pub count: usize,
}

impl Default for GanConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            count: 1,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in `dir`, falling back to stock defaults.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Fully-commented stock `config.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# medaug configuration
# ====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Storage
# ---------------------------------------------------------------------------
[storage]
# Directory receiving every generated or augmented PNG.
output_dir = "data/synthetic"

# SQLite artifact table, created inside output_dir on first use.
database = "synthetic_images.db"

# Append-only log of custom augmentation parameters (one JSON object per line).
usage_log = "logs.txt"

# ---------------------------------------------------------------------------
# Procedural "lung blob" generator
# ---------------------------------------------------------------------------
[procedural]
width = 256
height = 256

# Images per `medaug generate procedural` run when -n is not given.
count = 5

# Gaussian blur sigma applied to the blobs. 0 disables the blur.
blur_sigma = 3.5

# ---------------------------------------------------------------------------
# GAN stub (uniform noise placeholder)
# ---------------------------------------------------------------------------
[gan]
width = 64
height = 64
count = 1
"##
}
