//! Config file handling
//!
//! ```toml
//! [defaults]
//! domain = "https://eu.infisical.com"
//! timeout = 20
//!
//! [headers]
//! x-team = "platform"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::BrokerError;
use crate::models::HeaderMap;

/// infisical-auth configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Identity service base URL
    pub domain: Option<String>,
    /// Login request timeout in seconds
    pub timeout: Option<f64>,
    /// Default headers, folded in before `--extra-headers`
    pub headers: HeaderMap,
}

impl Config {
    /// Load the config file (TOML format)
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, BrokerError> {
        let config_file = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = Self::default_config_dir().join("config.toml");
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&config_file).map_err(|e| {
            BrokerError::Configuration(format!(
                "Failed to read config {}: {}",
                config_file.display(),
                e
            ))
        })?;

        Self::parse(&content)
    }

    /// Parse config file contents
    pub fn parse(content: &str) -> Result<Self, BrokerError> {
        let toml_value: toml::Value = toml::from_str(content)
            .map_err(|e| BrokerError::Configuration(format!("Invalid config TOML: {}", e)))?;

        let defaults = toml_value.get("defaults");

        let domain = defaults
            .and_then(|d| d.get("domain"))
            .and_then(|v| v.as_str())
            .map(String::from);

        let timeout = defaults.and_then(|d| d.get("timeout")).and_then(|v| {
            v.as_float().or_else(|| v.as_integer().map(|i| i as f64))
        });
        if let Some(t) = timeout {
            if t.is_nan() || t <= 0.0 || Duration::try_from_secs_f64(t).is_err() {
                return Err(BrokerError::Configuration(format!(
                    "defaults.timeout must be a positive number of seconds, got {}",
                    t
                )));
            }
        }

        // Header names are case-insensitive; store them lower-cased like --extra-headers
        let headers = toml_value
            .get("headers")
            .and_then(|h| h.as_table())
            .map(|table| {
                table
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.trim().to_lowercase(), s.trim().to_string())))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            domain,
            timeout,
            headers,
        })
    }

    /// Get the default config directory
    fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("infisical-auth"))
            .unwrap_or_else(|| PathBuf::from(".infisical-auth"))
    }
}
