//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::calibration::CalibrationSettings;
use crate::engine::{BoundaryPolicy, GridSettings};

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "BRAILLER_CONFIG_DIR";

/// Largest accepted row or column count.
pub const MAX_GRID_DIMENSION: usize = 200;

/// Theme display mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    /// Automatically detect OS theme (dark/light)
    #[default]
    Auto,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

/// Dot key assignment and chord timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Keys for dots 1-6, in dot order
    #[serde(default = "default_dot_keys")]
    pub dot_keys: Vec<char>,
    /// Idle time after the last press before held dots count as released,
    /// on terminals that do not report key releases
    #[serde(default = "default_chord_timeout_ms")]
    pub chord_timeout_ms: u64,
}

/// Perkins home-row layout: f d s for dots 1-3, j k l for dots 4-6.
fn default_dot_keys() -> Vec<char> {
    vec!['f', 'd', 's', 'j', 'k', 'l']
}

fn default_chord_timeout_ms() -> u64 {
    150
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            dot_keys: default_dot_keys(),
            chord_timeout_ms: default_chord_timeout_ms(),
        }
    }
}

/// UI preferences configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Display help on startup
    pub show_help_on_startup: bool,
    /// Theme mode preference (Auto, Dark, Light)
    pub theme_mode: ThemeMode,
    /// Nudge on-screen dot keys towards where mouse presses land
    pub adaptive_keys: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_help_on_startup: true,
            theme_mode: ThemeMode::default(),
            adaptive_keys: false,
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/brailler/config.toml`
/// - macOS: `~/Library/Application Support/brailler/config.toml`
/// - Windows: `%APPDATA%\brailler\config.toml`
///
/// `BRAILLER_CONFIG_DIR` replaces the directory on every platform.
///
/// # Validation
///
/// - rows and cols within 1..=200
/// - exactly six distinct dot keys, none of them space
/// - chord timeout within 20..=2000 ms
/// - calibration alpha within (0, 1], at least one sample, non-negative cap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Grid dimensions and boundary policy
    #[serde(default)]
    pub grid: GridSettings,
    /// Dot key assignment
    #[serde(default)]
    pub keys: KeyConfig,
    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
    /// Adaptive key placement tuning
    #[serde(default)]
    pub calibration: CalibrationSettings,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Gets the config directory path.
    ///
    /// - `$BRAILLER_CONFIG_DIR` if set
    /// - Linux: `~/.config/brailler/`
    /// - macOS: `~/Library/Application Support/brailler/`
    /// - Windows: `%APPDATA%\brailler\`
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("brailler");

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path, falling back to defaults
    /// when the file is missing.
    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        if !config_path.exists() {
            debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate().context(format!(
            "Invalid configuration in {}",
            config_path.display()
        ))?;

        debug!(path = %config_path.display(), "config loaded");
        Ok(config)
    }

    /// Loads the config file, logging and falling back to defaults on error.
    #[must_use]
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {e:#}");
            Self::default()
        })
    }

    /// Saves configuration to the config file using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_file_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Saves configuration to an explicit path using atomic write.
    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        self.validate()?;

        // Ensure config directory exists
        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        // Serialize to TOML
        let content = self.to_toml()?;
        let temp_path = config_path.with_extension("toml.tmp");

        // Write to temp file
        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        // Atomic rename
        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("rows", self.grid.rows), ("cols", self.grid.cols)] {
            if value == 0 || value > MAX_GRID_DIMENSION {
                anyhow::bail!(
                    "Grid {name} must be between 1 and {MAX_GRID_DIMENSION}, got {value}"
                );
            }
        }

        let keys = &self.keys.dot_keys;
        if keys.len() != 6 {
            anyhow::bail!("Exactly 6 dot keys are required, got {}", keys.len());
        }
        for (i, key) in keys.iter().enumerate() {
            if key.is_whitespace() || key.is_control() {
                anyhow::bail!("Dot {} key must be a visible character", i + 1);
            }
            let lower = key.to_ascii_lowercase();
            if keys[..i].iter().any(|k| k.to_ascii_lowercase() == lower) {
                anyhow::bail!("Dot key '{key}' is assigned more than once");
            }
        }

        if !(20..=2000).contains(&self.keys.chord_timeout_ms) {
            anyhow::bail!(
                "Chord timeout must be between 20 and 2000 ms, got {}",
                self.keys.chord_timeout_ms
            );
        }

        let calibration = &self.calibration;
        if calibration.alpha.is_nan() || calibration.alpha <= 0.0 || calibration.alpha > 1.0 {
            anyhow::bail!(
                "Calibration alpha must be in (0, 1], got {}",
                calibration.alpha
            );
        }
        if calibration.min_samples == 0 {
            anyhow::bail!("Calibration needs at least one sample");
        }
        if calibration.max_offset.is_nan() || calibration.max_offset < 0.0 {
            anyhow::bail!(
                "Calibration max offset must not be negative, got {}",
                calibration.max_offset
            );
        }

        Ok(())
    }

    /// Applies command-line overrides on top of the loaded values and
    /// re-validates.
    pub fn apply_overrides(
        &mut self,
        rows: Option<usize>,
        cols: Option<usize>,
        policy: Option<BoundaryPolicy>,
    ) -> Result<()> {
        if let Some(rows) = rows {
            self.grid.rows = rows;
        }
        if let Some(cols) = cols {
            self.grid.cols = cols;
        }
        if let Some(policy) = policy {
            self.grid.boundary_policy = policy;
        }
        self.validate()
    }
}
