use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present in
/// the file override the corresponding environment variables.
///
/// # Example YAML structure
/// ```yaml
/// deepgram:
///   api_key: "your-deepgram-key"
///   base_url: "https://deepgram.internal.example.com"
///   request_timeout_seconds: 60
///   connect_timeout_seconds: 10
///
/// execution:
///   continue_on_fail: true
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub deepgram: Option<DeepgramYaml>,
    pub execution: Option<ExecutionYaml>,
}

/// Deepgram credentials and HTTP settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DeepgramYaml {
    pub api_key: Option<String>,
    /// Self-hosted / on-premises endpoint. Empty means the cloud API.
    pub base_url: Option<String>,
    pub request_timeout_seconds: Option<u64>,
    pub connect_timeout_seconds: Option<u64>,
}

/// Batch execution settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ExecutionYaml {
    pub continue_on_fail: Option<bool>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the YAML is malformed.
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
