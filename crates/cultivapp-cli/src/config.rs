//! Configuration management for the CultivApp CLI
//!
//! Settings are layered: built-in defaults, then the TOML config file, then
//! `CULTIVAPP_*` environment variables. Command-line flags are applied last by
//! the caller. The config file is also where the bearer token is persisted.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// CLI Configuration Constants
// ============================================================================

/// Default backend URL when not configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Default timeout for API requests in seconds.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Default stage plan file, relative to the working directory.
pub const DEFAULT_PLAN_FILE: &str = "etapas.yml";

/// Keys accepted by `cultivapp config get/set`.
pub const CONFIG_KEYS: [&str; 4] = ["server_url", "token", "timeout_secs", "plan_file"];

/// Resolved CLI configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Backend base URL
    pub server_url: String,

    /// Bearer token sent with every request
    pub token: Option<String>,

    /// Request timeout
    pub timeout_secs: u64,

    /// Stage plan file used by `cultivapp stages`
    pub plan_file: PathBuf,
}

/// On-disk shape of the config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            plan_file: PathBuf::from(DEFAULT_PLAN_FILE),
        }
    }
}

impl Config {
    /// Location of the config file: `CULTIVAPP_CONFIG`, or
    /// `<config dir>/cultivapp/config.toml`.
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("CULTIVAPP_CONFIG") {
            return Ok(PathBuf::from(path));
        }

        let dir = dirs::config_dir()
            .ok_or_else(|| CliError::config("Could not determine config directory"))?;
        Ok(dir.join("cultivapp").join("config.toml"))
    }

    /// Load defaults, the config file (if present) and environment overrides.
    pub fn load() -> Result<Self> {
        let file = ConfigFile::load(&Self::config_path()?)?;
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge a config file and an environment lookup over the defaults.
    pub fn resolve(file: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = file.server_url {
            config.server_url = url;
        }
        if let Some(token) = file.token {
            config.token = Some(token);
        }
        if let Some(timeout) = file.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(plan) = file.plan_file {
            config.plan_file = plan;
        }

        if let Some(url) = env("CULTIVAPP_SERVER_URL") {
            config.server_url = url;
        }
        if let Some(token) = env("CULTIVAPP_TOKEN") {
            config.token = Some(token);
        }
        if let Some(timeout) = env("CULTIVAPP_API_TIMEOUT_SECS") {
            config.timeout_secs = timeout.parse().map_err(|_| {
                CliError::config(format!("CULTIVAPP_API_TIMEOUT_SECS must be a number, got '{}'", timeout))
            })?;
        }
        if let Some(plan) = env("CULTIVAPP_PLAN_FILE") {
            config.plan_file = PathBuf::from(plan);
        }

        // An empty token is the same as no token
        config.token = config.token.filter(|t| !t.trim().is_empty());

        Ok(config)
    }

    /// Read one setting as text
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "server_url" => Ok(self.server_url.clone()),
            "token" => Ok(self.token.clone().unwrap_or_default()),
            "timeout_secs" => Ok(self.timeout_secs.to_string()),
            "plan_file" => Ok(self.plan_file.display().to_string()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Builder-style server URL override (command-line flag)
    pub fn with_server_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.server_url = url;
        }
        self
    }

    /// Builder-style plan file override (command-line flag)
    pub fn with_plan_file(mut self, plan: Option<PathBuf>) -> Self {
        if let Some(plan) = plan {
            self.plan_file = plan;
        }
        self
    }
}

impl ConfigFile {
    /// Read the config file; a missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Set one key. An empty value clears it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let cleared = value.is_empty();

        match key {
            "server_url" => self.server_url = (!cleared).then(|| value.to_string()),
            "token" => self.token = (!cleared).then(|| value.to_string()),
            "timeout_secs" => {
                self.timeout_secs = if cleared {
                    None
                } else {
                    Some(value.parse().map_err(|_| {
                        CliError::config(format!("timeout_secs must be a number, got '{}'", value))
                    })?)
                }
            },
            "plan_file" => self.plan_file = (!cleared).then(|| PathBuf::from(value)),
            _ => return Err(unknown_key(key)),
        }

        Ok(())
    }
}

fn unknown_key(key: &str) -> CliError {
    CliError::config(format!(
        "Unknown config key: {}. Valid keys: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}
