use bytes::Bytes;

use super::config::{TranscriptionModel, TranscriptionOptions};
use crate::errors::{NodeError, NodeResult};

/// MIME type sent for uploads whose type is unknown.
pub const DEFAULT_UPLOAD_MIME_TYPE: &str = "application/octet-stream";

/// Where the audio to transcribe comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioSource {
    /// Remote audio, fetched by the provider
    Url(String),
    /// Audio uploaded in the request body
    Bytes {
        data: Bytes,
        mime_type: Option<String>,
    },
}

impl AudioSource {
    /// Content type for the upload body.
    pub fn content_type(&self) -> &str {
        match self {
            Self::Url(_) => "application/json",
            Self::Bytes { mime_type, .. } => mime_type
                .as_deref()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(DEFAULT_UPLOAD_MIME_TYPE),
        }
    }

    fn validate(&self) -> NodeResult<()> {
        match self {
            Self::Url(url) if url.is_empty() => Err(NodeError::ValidationError(
                "Audio URL is required when Source Type is URL".to_string(),
            )),
            Self::Bytes { data, .. } if data.is_empty() => Err(NodeError::ValidationError(
                "Audio data is empty".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// One transcription call, built fresh per item.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionRequest {
    pub source: AudioSource,
    pub model: TranscriptionModel,
    pub options: TranscriptionOptions,
}

impl TranscriptionRequest {
    pub fn new(
        source: AudioSource,
        model: TranscriptionModel,
        options: TranscriptionOptions,
    ) -> Self {
        Self {
            source,
            model,
            options,
        }
    }

    /// Validate before any network call is made.
    pub fn validate(&self) -> NodeResult<()> {
        self.source.validate()?;
        self.options.validate()
    }
}
