//! Configuration loading and resolution
//!
//! Config file resolution follows a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. `OUTREACH_CONFIG` environment variable
//! 3. Platform config directory (`<config_dir>/outreach-dash/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing or malformed file is never fatal: it is logged and the compiled
//! defaults are used. `OUTREACH_FEED_URL` and `OUTREACH_PASSWORD` override
//! the corresponding file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::time::millis_to_duration;
use crate::visits::{MonthlyScope, ViewOptions};
use crate::{Error, Result};

pub const CONFIG_ENV_VAR: &str = "OUTREACH_CONFIG";
pub const FEED_URL_ENV_VAR: &str = "OUTREACH_FEED_URL";
pub const PASSWORD_ENV_VAR: &str = "OUTREACH_PASSWORD";

/// Five minutes, matching the sheet's typical edit cadence
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 300_000;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5730";

/// CSV export URL for a published Google Sheet
pub fn sheet_export_url(sheet_id: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{}/gviz/tq?tqx=out:csv",
        sheet_id
    )
}

/// Logging section of the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` level when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Dashboard service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV export URL of the visit sheet
    pub feed_url: String,
    pub poll_interval_ms: u64,
    pub bind_addr: String,
    /// Password for the dashboard session gate; empty disables the gate
    pub dashboard_password: String,
    /// Years charted on the monthly visit graph
    pub chart_years: Vec<i32>,
    pub monthly_scope: MonthlyScope,
    pub logging: LoggingConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            feed_url: String::new(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            dashboard_password: String::new(),
            chart_years: ViewOptions::default().years,
            monthly_scope: MonthlyScope::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse a TOML document; absent keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolve, load and apply environment overrides
    ///
    /// Never fails: problems are logged and defaults used instead.
    pub fn load(cli_path: Option<&Path>) -> Self {
        let mut config = match resolve_config_path(cli_path, CONFIG_ENV_VAR) {
            Some(path) => match Self::from_file(&path) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!(
                        "Could not load configuration from {}: {} (using defaults)",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            None => {
                info!("No configuration file found, using compiled defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config
    }

    /// Apply `OUTREACH_FEED_URL` / `OUTREACH_PASSWORD` when set
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(FEED_URL_ENV_VAR) {
            self.feed_url = url;
        }
        if let Ok(password) = std::env::var(PASSWORD_ENV_VAR) {
            self.dashboard_password = password;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.bind_addr.trim().is_empty() {
            return Err(Error::Config("bind_addr must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        millis_to_duration(self.poll_interval_ms)
    }

    pub fn gate_enabled(&self) -> bool {
        !self.dashboard_password.is_empty()
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            years: self.chart_years.clone(),
            monthly_scope: self.monthly_scope,
        }
    }
}

/// Locate the config file by priority; `None` means use defaults
///
/// CLI and environment paths are returned even if the file does not exist,
/// so that loading reports the problem. The platform default is returned
/// only when present.
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    default_config_path().filter(|path| path.exists())
}

/// `<config_dir>/outreach-dash/config.toml` for the current platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("outreach-dash").join("config.toml"))
}
