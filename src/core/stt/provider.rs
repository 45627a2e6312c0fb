//! Transcription provider capability and its Deepgram implementation.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::messages::TranscriptionResponse;
use super::request::{AudioSource, TranscriptionRequest};
use crate::core::client::DeepgramClient;
use crate::core::messages::{classify_http_failure, request_id_from_headers, request_id_suffix};
use crate::errors::{NodeError, NodeResult};

/// A service that turns audio into a transcription document.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Endpoint URL reported in call metadata.
    fn endpoint_url(&self) -> String;

    /// Run one pre-recorded transcription.
    ///
    /// `Ok(None)` means the provider answered successfully without a result
    /// document.
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> NodeResult<Option<TranscriptionResponse>>;
}

#[async_trait]
impl TranscriptionProvider for DeepgramClient {
    fn endpoint_url(&self) -> String {
        self.listen_url()
    }

    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> NodeResult<Option<TranscriptionResponse>> {
        let url = self.listen_url();
        let query = request.options.query_pairs(request.model);

        let builder = self.post(&url).query(&query);
        let builder = match &request.source {
            AudioSource::Url(audio_url) => {
                debug!(model = %request.model, audio_url = %audio_url, "Transcribing remote audio");
                builder.json(&json!({ "url": audio_url }))
            }
            AudioSource::Bytes { data, .. } => {
                debug!(
                    model = %request.model,
                    bytes = data.len(),
                    content_type = request.source.content_type(),
                    "Transcribing uploaded audio"
                );
                builder
                    .header(CONTENT_TYPE, request.source.content_type())
                    .body(data.clone())
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|e| NodeError::TransportError(format!("Request failed: {e}")))?;

        let status = response.status();
        let request_id = request_id_from_headers(response.headers());
        if let Some(ref request_id) = request_id {
            debug!("Deepgram request ID: {}", request_id);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| NodeError::TransportError(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Deepgram transcription request failed");
            return Err(classify_http_failure(status, &body, request_id.as_deref()));
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            warn!("Deepgram returned an empty transcription body");
            return Ok(None);
        }

        let document: Value = serde_json::from_slice(&body).map_err(|e| {
            NodeError::ProviderError(format!(
                "Failed to parse transcription response: {e}{}",
                request_id_suffix(request_id.as_deref())
            ))
        })?;

        if document.is_null() {
            return Ok(None);
        }

        Ok(Some(TranscriptionResponse::new(document)))
    }
}
