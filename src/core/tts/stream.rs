//! Synthesis response classification and buffering.
//!
//! A speak response is headers plus a lazy, single-pass sequence of byte
//! chunks. The `content-type` header decides what happens to the body:
//!
//! - `audio/*` with a body: drain every chunk, in order, into one buffer
//! - anything else with a body: drain (bounded) and parse it as a JSON error
//! - no body: report the headers
//!
//! Classification happens before the full drain, so an error payload is never
//! buffered past [`MAX_ERROR_BODY_BYTES`].

use std::collections::BTreeMap;

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use futures::stream::BoxStream;
use http::HeaderMap;
use http::header::CONTENT_TYPE;
use tracing::{debug, warn};

use crate::core::messages::{DeepgramErrorResponse, request_id_from_headers, request_id_suffix};
use crate::errors::{NodeError, NodeResult};

/// Upper bound on how much of a non-audio body is read for error details.
pub const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// Lazy body of a synthesis response.
pub type ByteStream = BoxStream<'static, NodeResult<Bytes>>;

/// Headers and body returned by a speech provider.
pub struct SynthesisResponse {
    pub headers: HeaderMap,
    /// `None` when the provider sent no body at all
    pub body: Option<ByteStream>,
}

impl SynthesisResponse {
    pub fn new(headers: HeaderMap, body: Option<ByteStream>) -> Self {
        Self { headers, body }
    }

    /// Response whose body yields the given chunks.
    pub fn from_chunks(headers: HeaderMap, chunks: Vec<Bytes>) -> Self {
        let stream = futures::stream::iter(chunks.into_iter().map(Ok));
        Self::new(headers, Some(stream.boxed()))
    }

    /// `content-type` header value, `""` when missing or not valid text.
    pub fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    /// Whether the response carries audio.
    pub fn is_audio(&self) -> bool {
        self.body.is_some() && self.has_audio_content_type()
    }

    fn has_audio_content_type(&self) -> bool {
        self.content_type()
            .trim_start()
            .to_ascii_lowercase()
            .starts_with("audio/")
    }

    /// Classify the response and return the complete audio buffer.
    ///
    /// # Errors
    /// - `ProviderError` for a non-audio or body-less response
    /// - `TransportError` when reading the body fails
    pub async fn into_audio(mut self) -> NodeResult<Bytes> {
        match (self.has_audio_content_type(), self.body.take()) {
            (true, Some(body)) => {
                let audio = drain(body, None).await?;
                debug!(bytes = audio.len(), "Received synthesized audio");
                Ok(audio)
            }
            (_, body) => {
                self.body = body;
                Err(self.into_error().await)
            }
        }
    }

    async fn into_error(self) -> NodeError {
        let content_type = self.content_type().to_string();
        let suffix = request_id_suffix(request_id_from_headers(&self.headers).as_deref());

        let Some(body) = self.body else {
            warn!("Deepgram speak response had no body");
            return NodeError::ProviderError(format!(
                "Deepgram API Error: No audio stream received. Headers: {}{suffix}",
                headers_as_json(&self.headers)
            ));
        };

        warn!(content_type = %content_type, "Deepgram speak response is not audio");

        let payload = match drain(body, Some(MAX_ERROR_BODY_BYTES)).await {
            Ok(payload) => payload,
            Err(err) => return err,
        };

        match DeepgramErrorResponse::from_slice(&payload) {
            Some(error_response) => NodeError::ProviderError(format!(
                "Deepgram API Error: {}{suffix}",
                error_response.message()
            )),
            None => NodeError::ProviderError(format!(
                "Deepgram API returned non-audio content (Content-Type: {content_type}). \
                 Could not parse error details.{suffix}"
            )),
        }
    }
}

impl std::fmt::Debug for SynthesisResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesisResponse")
            .field("headers", &self.headers)
            .field("body", &self.body.as_ref().map(|_| "<stream>"))
            .finish()
    }
}

/// Concatenate every chunk of `stream` in arrival order. With a `limit`,
/// reading stops once that many bytes are buffered.
async fn drain(mut stream: ByteStream, limit: Option<usize>) -> NodeResult<Bytes> {
    let mut buffer = BytesMut::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        buffer.extend_from_slice(&chunk);

        if let Some(limit) = limit {
            if buffer.len() >= limit {
                buffer.truncate(limit);
                break;
            }
        }
    }

    Ok(buffer.freeze())
}

fn headers_as_json(headers: &HeaderMap) -> String {
    let map: BTreeMap<&str, String> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    serde_json::to_string(&map).unwrap_or_else(|_| "{}".to_string())
}
