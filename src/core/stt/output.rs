//! Shaping a transcription result into an output JSON document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::messages::TranscriptionResponse;

/// Field holding the full result in [`OutputFormat::Full`].
pub const FULL_RESULT_FIELD: &str = "deepgramTranscription";

/// Transcript field used when the configured name is blank.
pub const DEFAULT_TRANSCRIPT_FIELD: &str = "transcript";

/// Field holding [`CallMetadata`].
pub const METADATA_FIELD: &str = "deepgramMetadata";

/// Output shape for a transcription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    /// The whole result document under [`FULL_RESULT_FIELD`]
    #[default]
    Full,
    /// Only the primary transcript, under a configurable field
    TranscriptOnly,
}

/// Configured transcript field name, or [`DEFAULT_TRANSCRIPT_FIELD`] when blank.
pub fn transcript_field_name(configured: &str) -> &str {
    let trimmed = configured.trim();
    if trimmed.is_empty() {
        DEFAULT_TRANSCRIPT_FIELD
    } else {
        trimmed
    }
}

/// Write the result into `json` according to `format`.
///
/// An absent result becomes `null` (full) or `""` (transcript only); the
/// field is never omitted.
pub fn shape_transcription(
    json: &mut Map<String, Value>,
    result: Option<TranscriptionResponse>,
    format: OutputFormat,
    transcript_field: &str,
) {
    match format {
        OutputFormat::Full => {
            let value = result.map_or(Value::Null, TranscriptionResponse::into_value);
            json.insert(FULL_RESULT_FIELD.to_string(), value);
        }
        OutputFormat::TranscriptOnly => {
            let transcript = result
                .as_ref()
                .map(|r| r.transcript().to_string())
                .unwrap_or_default();
            json.insert(
                transcript_field_name(transcript_field).to_string(),
                Value::String(transcript),
            );
        }
    }
}

/// Details of one provider call, attached on request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallMetadata {
    pub endpoint_url: String,
    pub parameters_used: Map<String, Value>,
    /// Wall-clock time around the provider call, network latency included
    pub duration_ms: u64,
}

impl CallMetadata {
    pub fn attach(self, json: &mut Map<String, Value>) {
        let value = serde_json::to_value(self).unwrap_or(Value::Null);
        json.insert(METADATA_FIELD.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> TranscriptionResponse {
        TranscriptionResponse::new(json!({
            "results": {"channels": [{"alternatives": [{"transcript": "hi there"}]}]}
        }))
    }

    #[test]
    fn test_full_output() {
        let mut json = Map::new();
        json.insert("id".into(), json!(7));

        shape_transcription(&mut json, Some(sample()), OutputFormat::Full, "");

        assert_eq!(json["id"], json!(7));
        assert_eq!(
            json[FULL_RESULT_FIELD]["results"]["channels"][0]["alternatives"][0]["transcript"],
            json!("hi there")
        );
    }

    #[test]
    fn test_full_output_absent_result_is_null() {
        let mut json = Map::new();
        shape_transcription(&mut json, None, OutputFormat::Full, "");
        assert_eq!(json.get(FULL_RESULT_FIELD), Some(&Value::Null));
    }

    #[test]
    fn test_transcript_only_custom_field() {
        let mut json = Map::new();
        shape_transcription(&mut json, Some(sample()), OutputFormat::TranscriptOnly, " text ");
        assert_eq!(json.get("text"), Some(&json!("hi there")));
        assert!(json.get(FULL_RESULT_FIELD).is_none());
    }

    #[test]
    fn test_transcript_only_blank_field_and_absent_result() {
        let mut json = Map::new();
        shape_transcription(&mut json, None, OutputFormat::TranscriptOnly, "   ");
        assert_eq!(json.get(DEFAULT_TRANSCRIPT_FIELD), Some(&json!("")));
    }

    #[test]
    fn test_metadata_serialization() {
        let mut params = Map::new();
        params.insert("model".into(), json!("nova-2"));

        let mut json = Map::new();
        CallMetadata {
            endpoint_url: "https://api.deepgram.com/v1/listen".to_string(),
            parameters_used: params,
            duration_ms: 12,
        }
        .attach(&mut json);

        assert_eq!(
            json[METADATA_FIELD],
            json!({
                "endpointUrl": "https://api.deepgram.com/v1/listen",
                "parametersUsed": {"model": "nova-2"},
                "durationMs": 12
            })
        );
    }

    #[test]
    fn test_output_format_names() {
        let format: OutputFormat = serde_json::from_value(json!("transcriptOnly")).unwrap();
        assert_eq!(format, OutputFormat::TranscriptOnly);
        assert_eq!(OutputFormat::default(), OutputFormat::Full);
    }
}
