use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::{LevelFilter, info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "launcher.json";
const CONFIG_VERSION: u32 = 1;
const DEFAULT_LAUNCH_TIMEOUT_MS: u64 = 10_000;
const MAX_LAUNCH_TIMEOUT_MS: u64 = 300_000;

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_launch_timeout_ms() -> u64 {
    DEFAULT_LAUNCH_TIMEOUT_MS
}

fn default_kill_on_failure() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Settings for launching the debug proxy helper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Overall budget from spawn until the helper reports readiness.
    #[serde(default = "default_launch_timeout_ms")]
    pub launch_timeout_ms: u64,

    /// Kill the helper when the launch fails after it was spawned.
    #[serde(default = "default_kill_on_failure")]
    pub kill_on_failure: bool,

    /// Replaces the hosting context's runtime launcher when set.
    #[serde(default)]
    pub runtime_launcher: Option<PathBuf>,

    /// `off`, `error`, `warn`, `info`, `debug` or `trace`, for this crate's own logging.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Trace every raw helper stdout line under the `launcher_core::helper_output` target.
    #[serde(default)]
    pub log_helper_output: bool,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            launch_timeout_ms: default_launch_timeout_ms(),
            kill_on_failure: default_kill_on_failure(),
            runtime_launcher: None,
            log_level: default_log_level(),
            log_helper_output: false,
        }
    }
}

impl LauncherConfig {
    /// Load config from {config_dir}/launcher.json.
    ///
    /// # Returns
    ///
    /// Returns `Ok(LauncherConfig)` if loaded successfully or defaults if the file is missing.
    /// Returns `Err(ConfigError)` if the file exists but is unreadable, corrupted or invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read launcher config: {e}");
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: LauncherConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse launcher config JSON: {e}");
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid version: {} (expected 1-{CONFIG_VERSION})",
                    self.version
                ),
            });
        }

        if self.launch_timeout_ms == 0 || self.launch_timeout_ms > MAX_LAUNCH_TIMEOUT_MS {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid launch timeout: {}ms (must be 1-{MAX_LAUNCH_TIMEOUT_MS})",
                    self.launch_timeout_ms
                ),
            });
        }

        if let Some(ref launcher) = self.runtime_launcher
            && launcher.as_os_str().is_empty()
        {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "runtime_launcher cannot be empty".to_string(),
            });
        }

        if LevelFilter::from_str(&self.log_level).is_err() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("Invalid log level: {:?}", self.log_level),
            });
        }

        Ok(())
    }

    /// Parsed `log_level`; falls back to Info for a config that skipped `validate()`.
    pub fn log_level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn launch_timeout(&self) -> Duration {
        Duration::from_millis(self.launch_timeout_ms)
    }
}
