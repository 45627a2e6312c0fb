//! Speech provider capability, its Deepgram implementation and the synthesis
//! pipeline built on top of it.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::StatusCode;
use reqwest::header::CONTENT_LENGTH;
use serde_json::json;
use tracing::debug;

use super::output::{OutputArtifact, default_filename};
use super::request::SynthesisRequest;
use super::stream::SynthesisResponse;
use crate::core::client::DeepgramClient;
use crate::errors::{NodeError, NodeResult};

/// A service that turns text into a streamed audio response.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Dispatch one synthesis request.
    ///
    /// Implementations return the raw response; deciding whether it carries
    /// audio is left to [`SynthesisResponse::into_audio`].
    async fn speak(&self, request: &SynthesisRequest) -> NodeResult<SynthesisResponse>;
}

#[async_trait]
impl SpeechProvider for DeepgramClient {
    async fn speak(&self, request: &SynthesisRequest) -> NodeResult<SynthesisResponse> {
        let url = self.speak_url();
        let query = request.audio.query_pairs(request.model);

        debug!(
            model = %request.model,
            chars = request.text.chars().count(),
            "Requesting speech synthesis"
        );

        let response = self
            .post(&url)
            .query(&query)
            .json(&json!({ "text": request.text }))
            .send()
            .await
            .map_err(|e| NodeError::TransportError(format!("Request failed: {e}")))?;

        let status = response.status();
        let headers = response.headers().clone();

        let empty_body = status == StatusCode::NO_CONTENT
            || headers
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                == Some(0);

        debug!(status = status.as_u16(), empty_body, "Deepgram speak response received");

        if empty_body {
            return Ok(SynthesisResponse::new(headers, None));
        }

        let body = response
            .bytes_stream()
            .map_err(|e| NodeError::TransportError(format!("Failed to read audio stream: {e}")))
            .boxed();

        Ok(SynthesisResponse::new(headers, Some(body)))
    }
}

/// Run the synthesis pipeline for one item.
///
/// Validation runs before the provider is called. When `file_name` is blank
/// a name is derived from the inferred MIME type.
pub async fn synthesize<P>(
    provider: &P,
    request: &SynthesisRequest,
    binary_property_name: &str,
    file_name: Option<&str>,
) -> NodeResult<OutputArtifact>
where
    P: SpeechProvider + ?Sized,
{
    request.validate()?;

    let response = provider.speak(request).await?;
    let data = response.into_audio().await?;

    let mime_type = request.audio.mime_type();
    let file_name = file_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .unwrap_or_else(|| default_filename(mime_type));

    Ok(OutputArtifact {
        binary_property_name: binary_property_name.to_string(),
        file_name,
        mime_type: mime_type.to_string(),
        data,
    })
}
