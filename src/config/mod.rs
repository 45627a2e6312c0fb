//! Configuration module for the WaaV Deepgram nodes
//!
//! Configuration comes from `.env` files, environment variables and an optional
//! YAML file. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Environment variables
//! - `DEEPGRAM_API_KEY`: API key (required before any item is processed)
//! - `DEEPGRAM_BASE_URL`: self-hosted endpoint, empty for the cloud API
//! - `DEEPGRAM_REQUEST_TIMEOUT_SECONDS`: total request timeout (default 120)
//! - `DEEPGRAM_CONNECT_TIMEOUT_SECONDS`: connect timeout (default 30)
//! - `CONTINUE_ON_FAIL`: record per-item errors instead of aborting the batch
//!
//! # Example
//! ```rust,no_run
//! use waav_nodes::config::NodesConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = NodesConfig::from_env()?;
//!
//! // Load from YAML file with environment variable base
//! let config = NodesConfig::from_file(&PathBuf::from("nodes.yaml"))?;
//! println!("continue_on_fail = {}", config.continue_on_fail);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

mod env;
mod yaml;

pub use yaml::{DeepgramYaml, ExecutionYaml, YamlConfig};

use crate::errors::{NodeError, NodeResult};

/// Default total request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 120;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 30;

/// Runtime configuration for the Deepgram nodes
#[derive(Clone)]
pub struct NodesConfig {
    pub deepgram_api_key: Option<String>,
    pub deepgram_base_url: Option<String>,
    pub request_timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    /// Tolerant mode: failed items become error records instead of aborting
    pub continue_on_fail: bool,
}

impl Default for NodesConfig {
    fn default() -> Self {
        Self {
            deepgram_api_key: None,
            deepgram_base_url: None,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT_SECONDS,
            continue_on_fail: false,
        }
    }
}

impl std::fmt::Debug for NodesConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodesConfig")
            .field(
                "deepgram_api_key",
                &self.deepgram_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("deepgram_base_url", &self.deepgram_base_url)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .field("continue_on_fail", &self.continue_on_fail)
            .finish()
    }
}

/// Zeroize the API key when the configuration is dropped.
impl Drop for NodesConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.deepgram_api_key {
            key.zeroize();
        }
    }
}

impl NodesConfig {
    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// The `.env` file is loaded by the binary at startup, so its values are
    /// visible here as ordinary environment variables.
    ///
    /// # Errors
    /// Returns an error if a boolean or numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let defaults = Self::default();

        Ok(Self {
            deepgram_api_key: env::optional_string("DEEPGRAM_API_KEY"),
            deepgram_base_url: env::optional_string("DEEPGRAM_BASE_URL"),
            request_timeout_seconds: env::optional_number("DEEPGRAM_REQUEST_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.request_timeout_seconds),
            connect_timeout_seconds: env::optional_number("DEEPGRAM_CONNECT_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.connect_timeout_seconds),
            continue_on_fail: env::optional_bool("CONTINUE_ON_FAIL")?
                .unwrap_or(defaults.continue_on_fail),
        })
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if the YAML file cannot be read or is malformed, or if
    /// an environment variable has an invalid format.
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = YamlConfig::from_file(path)?;
        let mut config = Self::from_env()?;
        config.apply_yaml(yaml_config);
        Ok(config)
    }

    fn apply_yaml(&mut self, yaml: YamlConfig) {
        if let Some(deepgram) = yaml.deepgram {
            if let Some(key) = deepgram.api_key.filter(|k| !k.trim().is_empty()) {
                self.deepgram_api_key = Some(key);
            }
            if let Some(base_url) = deepgram.base_url {
                // An explicit empty string in YAML resets to the cloud endpoint
                self.deepgram_base_url = Some(base_url).filter(|u| !u.trim().is_empty());
            }
            if let Some(timeout) = deepgram.request_timeout_seconds {
                self.request_timeout_seconds = timeout;
            }
            if let Some(timeout) = deepgram.connect_timeout_seconds {
                self.connect_timeout_seconds = timeout;
            }
        }

        if let Some(continue_on_fail) = yaml.execution.and_then(|e| e.continue_on_fail) {
            self.continue_on_fail = continue_on_fail;
        }
    }

    /// The configured API key.
    ///
    /// # Errors
    /// `ConfigurationError` when the key is absent or blank.
    pub fn api_key(&self) -> NodeResult<&str> {
        self.deepgram_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                NodeError::ConfigurationError(
                    "Deepgram API key is missing. Set DEEPGRAM_API_KEY or deepgram.api_key"
                        .to_string(),
                )
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}
