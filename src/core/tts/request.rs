use super::config::{SpeakAudioOptions, SpeakModel};
use crate::errors::{NodeError, NodeResult};

/// Longest text accepted by `/v1/speak`, in characters.
pub const MAX_TEXT_CHARS: usize = 2000;

/// One synthesis call, built fresh per item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub model: SpeakModel,
    pub audio: SpeakAudioOptions,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, model: SpeakModel, audio: SpeakAudioOptions) -> Self {
        Self {
            text: text.into(),
            model,
            audio,
        }
    }

    /// Validate before any network call is made.
    pub fn validate(&self) -> NodeResult<()> {
        if self.text.is_empty() {
            return Err(NodeError::ValidationError(
                "Text to speak cannot be empty".to_string(),
            ));
        }

        let length = self.text.chars().count();
        if length > MAX_TEXT_CHARS {
            return Err(NodeError::ValidationError(format!(
                "Text to speak cannot exceed {MAX_TEXT_CHARS} characters (got {length})"
            )));
        }

        Ok(())
    }
}
