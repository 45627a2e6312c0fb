//! Deepgram HTTP client factory.
//!
//! A [`DeepgramClient`] is a read-only configuration object: API key, base URL
//! and one pooled `reqwest::Client`. It is built once per batch and shared by
//! every item. It performs no retries.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use tracing::{debug, info};

use crate::config::{DEFAULT_CONNECT_TIMEOUT_SECONDS, DEFAULT_REQUEST_TIMEOUT_SECONDS, NodesConfig};
use crate::errors::{NodeError, NodeResult};
use crate::utils::url_validation::validate_base_url;

// =============================================================================
// Constants
// =============================================================================

/// Deepgram cloud endpoint used when no base URL override is configured.
pub const DEEPGRAM_API_URL: &str = "https://api.deepgram.com";

/// Pre-recorded transcription path.
pub const LISTEN_PATH: &str = "/v1/listen";

/// Text-to-speech path.
pub const SPEAK_PATH: &str = "/v1/speak";

/// User-Agent header value for API requests.
const USER_AGENT: &str = concat!("WaaV-Nodes/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Deepgram Client
// =============================================================================

/// Configured Deepgram client for transcription and synthesis calls.
///
/// # Example
///
/// ```rust,no_run
/// use waav_nodes::core::DeepgramClient;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Cloud endpoint
/// let client = DeepgramClient::new("dg-api-key", None)?;
/// assert_eq!(client.listen_url(), "https://api.deepgram.com/v1/listen");
///
/// // Self-hosted deployment
/// let client = DeepgramClient::new("dg-api-key", Some("http://deepgram.internal:8080/"))?;
/// assert_eq!(client.speak_url(), "http://deepgram.internal:8080/v1/speak");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DeepgramClient {
    /// HTTP client for API requests (reused for connection pooling).
    http_client: Client,
    api_key: String,
    /// Base URL without trailing slash.
    base_url: String,
}

impl DeepgramClient {
    /// Create a client with default timeouts.
    ///
    /// An empty or whitespace `base_url` selects the cloud endpoint.
    ///
    /// # Errors
    /// `ConfigurationError` when the API key is empty, the base URL is not an
    /// absolute http(s) URL, or the HTTP client cannot be built.
    pub fn new(api_key: &str, base_url: Option<&str>) -> NodeResult<Self> {
        Self::with_timeouts(
            api_key,
            base_url,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS),
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECONDS),
        )
    }

    /// Create a client from loaded configuration.
    pub fn from_config(config: &NodesConfig) -> NodeResult<Self> {
        let api_key = config.api_key()?;
        Self::with_timeouts(
            api_key,
            config.deepgram_base_url.as_deref(),
            config.request_timeout(),
            config.connect_timeout(),
        )
    }

    /// Create a client with explicit timeouts.
    pub fn with_timeouts(
        api_key: &str,
        base_url: Option<&str>,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> NodeResult<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(NodeError::ConfigurationError(
                "Deepgram API key is required".to_string(),
            ));
        }

        let base_url = match base_url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => validate_base_url(url).map_err(|e| {
                NodeError::ConfigurationError(format!("Invalid Deepgram base URL '{url}': {e}"))
            })?,
            None => DEEPGRAM_API_URL.to_string(),
        };

        let http_client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                NodeError::ConfigurationError(format!("Failed to create HTTP client: {e}"))
            })?;

        info!(base_url = %base_url, "Deepgram client configured");

        Ok(Self {
            http_client,
            api_key: api_key.to_string(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Transcription endpoint: `{base}/v1/listen`.
    pub fn listen_url(&self) -> String {
        format!("{}{LISTEN_PATH}", self.base_url)
    }

    /// Synthesis endpoint: `{base}/v1/speak`.
    pub fn speak_url(&self) -> String {
        format!("{}{SPEAK_PATH}", self.base_url)
    }

    /// Authorized POST request builder.
    pub(crate) fn post(&self, url: &str) -> RequestBuilder {
        debug!(url = %url, "Dispatching Deepgram request");
        self.http_client
            .post(url)
            .header(reqwest::header::AUTHORIZATION, format!("Token {}", self.api_key))
    }
}

impl std::fmt::Debug for DeepgramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepgramClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Drop for DeepgramClient {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.api_key.zeroize();
    }
}
