//! Configuration file loading with precedence handling.

use crate::integration::WorkflowSettings;
use crate::lookup::catalog::default_catalog_path;
use crate::scan::DEFAULT_SCAN_TIMEOUT;
use crate::state::{DEFAULT_MAX_NOTICES, DEFAULT_RESULT_DISPLAY};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A setting parsed but its value is unusable.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Setting name as written in the config file or env var.
        field: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/scanmatch/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Inactivity gap (ms) after which a scan completes without Enter.
    #[serde(default)]
    pub scan_timeout_ms: Option<u64>,

    /// How long (ms) a comparison result stays on screen.
    #[serde(default)]
    pub result_display_ms: Option<u64>,

    /// Record catalog to look references up in.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Notices visible at once.
    #[serde(default)]
    pub max_notices: Option<usize>,

    /// Key binding overrides: action name to key specs.
    ///
    /// ```toml
    /// [keybindings]
    /// confirm = ["F2", "Ctrl+y"]
    /// quit = ["F10"]
    /// ```
    #[serde(default)]
    pub keybindings: Option<HashMap<String, Vec<String>>>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Scan inactivity timeout in milliseconds.
    pub scan_timeout_ms: u64,
    /// Comparison result display time in milliseconds.
    pub result_display_ms: u64,
    /// Record catalog path.
    pub catalog_path: PathBuf,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Notices visible at once.
    pub max_notices: usize,
    /// Key binding overrides, applied on top of the defaults.
    pub keybindings: HashMap<String, Vec<String>>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            scan_timeout_ms: DEFAULT_SCAN_TIMEOUT.as_millis() as u64,
            result_display_ms: DEFAULT_RESULT_DISPLAY.as_millis() as u64,
            catalog_path: default_catalog_path(),
            log_file_path: default_log_path(),
            max_notices: DEFAULT_MAX_NOTICES,
            keybindings: HashMap::new(),
        }
    }
}

impl ResolvedConfig {
    /// Reject values the workflow cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad setting.
    pub fn validate(self) -> Result<Self, ConfigError> {
        let zero = |field: &str| ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "must be greater than zero".to_string(),
        };

        if self.scan_timeout_ms == 0 {
            return Err(zero("scan_timeout_ms"));
        }
        if self.result_display_ms == 0 {
            return Err(zero("result_display_ms"));
        }
        if self.max_notices == 0 {
            return Err(zero("max_notices"));
        }
        Ok(self)
    }

    /// Timing and capacity settings for the workflow core.
    pub fn workflow_settings(&self) -> WorkflowSettings {
        WorkflowSettings {
            scan_timeout: Duration::from_millis(self.scan_timeout_ms),
            result_display: Duration::from_millis(self.result_display_ms),
            max_notices: self.max_notices,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/scanmatch/scanmatch.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("scanmatch").join("scanmatch.log")
    } else {
        PathBuf::from("scanmatch.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/scanmatch/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("scanmatch").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `SCANMATCH_CONFIG` environment variable
/// 3. Default path `~/.config/scanmatch/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("SCANMATCH_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `SCANMATCH_CATALOG`: Override catalog path
/// - `SCANMATCH_SCAN_TIMEOUT_MS`: Override scan inactivity timeout
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if the timeout is not a number.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(catalog) = std::env::var("SCANMATCH_CATALOG") {
        config.catalog_path = PathBuf::from(catalog);
    }

    if let Ok(timeout) = std::env::var("SCANMATCH_SCAN_TIMEOUT_MS") {
        config.scan_timeout_ms =
            timeout
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                    field: "SCANMATCH_SCAN_TIMEOUT_MS".to_string(),
                    reason: e.to_string(),
                })?;
    }

    Ok(config)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        scan_timeout_ms: config.scan_timeout_ms.unwrap_or(defaults.scan_timeout_ms),
        result_display_ms: config
            .result_display_ms
            .unwrap_or(defaults.result_display_ms),
        catalog_path: config.catalog_path.unwrap_or(defaults.catalog_path),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        max_notices: config.max_notices.unwrap_or(defaults.max_notices),
        keybindings: config.keybindings.unwrap_or(defaults.keybindings),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    catalog_override: Option<PathBuf>,
    scan_timeout_override: Option<u64>,
    result_display_override: Option<u64>,
) -> ResolvedConfig {
    if let Some(catalog) = catalog_override {
        config.catalog_path = catalog;
    }

    if let Some(timeout) = scan_timeout_override {
        config.scan_timeout_ms = timeout;
    }

    if let Some(display) = result_display_override {
        config.result_display_ms = display;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
