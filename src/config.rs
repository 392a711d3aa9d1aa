//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.pgpow.toml` in current directory
//! 4. `~/.config/pgpow/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [severity]
//! critical = 0.5         # share of the plan at which a node turns red
//! elevated = 0.1         # share at which it turns yellow
//! scale_by_loops = false # weigh actual time by loop count
//!
//! [output]
//! color = "auto"         # auto, always, never
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `PGPOW_CRITICAL_SHARE` | Critical threshold |
//! | `PGPOW_ELEVATED_SHARE` | Elevated threshold |
//! | `PGPOW_COLOR` | Colour mode |
//! | `PGPOW_LOG` | Log filter for diagnostics on stderr |

use std::{
    env, fs,
    path::{Path, PathBuf}
};

use clap::ValueEnum;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{AppResult, config_error},
    explain::SeverityPolicy
};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub severity: SeverityPolicy,
    #[serde(default)]
    pub output:   OutputConfig
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub color: ColorMode
}

/// When to emphasise plan output with colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never
}

impl ColorMode {
    /// Resolve against whether the destination is a terminal.
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            Self::Auto => is_terminal,
            Self::Always => true,
            Self::Never => false
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.pgpow.toml)
    /// 3. Config file in home directory (~/.config/pgpow/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        // Try to load from home directory config
        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("pgpow")
                .join("config.toml");

            if home_config.exists() {
                config = Self::read_file(&home_config)?;
            }
        }

        // Try to load from current directory config (overrides home config)
        let local_config = PathBuf::from(".pgpow.toml");
        if local_config.exists() {
            config = Self::read_file(&local_config)?;
        }

        config.apply_env(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> AppResult<Self> {
        debug!(event = "config_file", path = %path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse a configuration file body
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    /// Override values from environment variables, read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> AppResult<()> {
        if let Some(value) = lookup("PGPOW_CRITICAL_SHARE") {
            self.severity.critical = parse_share("PGPOW_CRITICAL_SHARE", &value)?;
        }

        if let Some(value) = lookup("PGPOW_ELEVATED_SHARE") {
            self.severity.elevated = parse_share("PGPOW_ELEVATED_SHARE", &value)?;
        }

        if let Some(value) = lookup("PGPOW_COLOR") {
            self.output.color = ColorMode::from_str(&value, true)
                .map_err(|_| config_error(format!("Invalid PGPOW_COLOR value '{}'", value)))?;
        }

        Ok(())
    }

    /// Check that thresholds satisfy `0 <= elevated <= critical`
    pub fn validate(&self) -> AppResult<()> {
        let SeverityPolicy {
            critical,
            elevated,
            ..
        } = self.severity;
        if !critical.is_finite() || !elevated.is_finite() {
            return Err(config_error("Severity thresholds must be finite numbers"));
        }
        if elevated < 0.0 || elevated > critical {
            return Err(config_error(format!(
                "Severity thresholds must satisfy 0 <= elevated <= critical (got elevated={}, critical={})",
                elevated, critical
            )));
        }
        Ok(())
    }
}

fn parse_share(key: &str, value: &str) -> AppResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| config_error(format!("Invalid {} value '{}': expected a number", key, value)))
}
