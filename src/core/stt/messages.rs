//! Transcription response document.
//!
//! The `/v1/listen` response is an externally defined document that is passed
//! through to the output item unchanged. Only the primary transcript is read:
//!
//! ```json
//! {
//!   "metadata": { "request_id": "..." },
//!   "results": {
//!     "channels": [
//!       { "alternatives": [ { "transcript": "hello world", "confidence": 0.98, "words": [] } ] }
//!     ]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON pointer to the primary transcript.
const PRIMARY_TRANSCRIPT_POINTER: &str = "/results/channels/0/alternatives/0/transcript";

/// Raw transcription result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranscriptionResponse(Value);

impl TranscriptionResponse {
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    /// `results.channels[0].alternatives[0].transcript`, or `""` when any
    /// part of that path is missing or not a string.
    pub fn transcript(&self) -> &str {
        self.0
            .pointer(PRIMARY_TRANSCRIPT_POINTER)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transcript_extraction() {
        let response = TranscriptionResponse::new(json!({
            "metadata": {"request_id": "req-1"},
            "results": {"channels": [{"alternatives": [
                {"transcript": "hello world", "confidence": 0.98},
                {"transcript": "hollow world", "confidence": 0.41}
            ]}]}
        }));
        assert_eq!(response.transcript(), "hello world");
    }

    #[test]
    fn test_incomplete_documents_yield_empty_transcript() {
        let documents = [
            json!({}),
            json!({"results": null}),
            json!({"results": {}}),
            json!({"results": {"channels": []}}),
            json!({"results": {"channels": [{}]}}),
            json!({"results": {"channels": [{"alternatives": []}]}}),
            json!({"results": {"channels": [{"alternatives": [{}]}]}}),
            json!({"results": {"channels": [{"alternatives": [{"transcript": 7}]}]}}),
            json!("not an object"),
            Value::Null,
        ];

        for document in documents {
            assert_eq!(TranscriptionResponse::new(document).transcript(), "");
        }
    }
}
