//! Configuration loading.
//!
//! `~/.recruitdesk/config.toml` is optional; every section falls back to
//! defaults when absent. The reply windows and the elevated-role allow-list
//! are constants of the messaging core and deliberately not configurable.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Sendability engine settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Record store settings.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Sendability engine settings.
#[derive(Debug, Default, Deserialize)]
pub struct EngineConfig {
    /// Emit a `debug` event for every sendability decision.
    #[serde(default)]
    pub trace_decisions: bool,
}

/// Logging settings.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for JSON log files. Console-only logging when unset.
    #[serde(default)]
    pub logs_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            logs_dir: None,
        }
    }
}

/// Record store settings.
#[derive(Debug, Default, Deserialize)]
pub struct StoreConfig {
    /// Fixture file loaded when none is given on the command line.
    #[serde(default)]
    pub fixtures: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_owned()
}

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config at {}: {e}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))?;
    Ok(config)
}

/// Load configuration from `path`, or defaults when the file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_or_default(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    load_config(path)
}

/// Resolve the default config directory (`~/.recruitdesk/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".recruitdesk"))
}

/// Resolve the default config file path (`~/.recruitdesk/config.toml`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
