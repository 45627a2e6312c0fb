//! Configuration types for Deepgram pre-recorded transcription.
//!
//! - Model selection (fixed vocabulary)
//! - Typed transcription options sent as `/v1/listen` query parameters

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{NodeError, NodeResult};
use crate::utils::serde_helpers::{comma_separated_or_list, empty_as_none};
use crate::utils::url_validation::validate_callback_url;

// =============================================================================
// Transcription Models
// =============================================================================

/// Deepgram transcription models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TranscriptionModel {
    #[serde(rename = "base")]
    Base,
    /// Older generation model
    #[serde(rename = "enhanced")]
    Enhanced,
    #[default]
    #[serde(rename = "nova-2")]
    Nova2,
    #[serde(rename = "nova-2-finance")]
    Nova2Finance,
    #[serde(rename = "nova-2-general")]
    Nova2General,
    #[serde(rename = "nova-2-meeting")]
    Nova2Meeting,
    #[serde(rename = "nova-2-phonecall")]
    Nova2Phonecall,
    #[serde(rename = "nova-2-video")]
    Nova2Video,
    #[serde(rename = "nova-2-voicemail")]
    Nova2Voicemail,
    /// Latest general purpose model
    #[serde(rename = "nova-3")]
    Nova3,
}

impl TranscriptionModel {
    /// Convert to the API parameter value.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Enhanced => "enhanced",
            Self::Nova2 => "nova-2",
            Self::Nova2Finance => "nova-2-finance",
            Self::Nova2General => "nova-2-general",
            Self::Nova2Meeting => "nova-2-meeting",
            Self::Nova2Phonecall => "nova-2-phonecall",
            Self::Nova2Video => "nova-2-video",
            Self::Nova2Voicemail => "nova-2-voicemail",
            Self::Nova3 => "nova-3",
        }
    }
}

impl std::fmt::Display for TranscriptionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Transcription Options
// =============================================================================

/// Recognised `/v1/listen` options.
///
/// Unknown keys are rejected at deserialization time so a misspelt option
/// is reported instead of silently ignored. Unset options are never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscriptionOptions {
    /// BCP-47 language tag (e.g. `en`, `es`)
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Add punctuation and capitalization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub punctuate: Option<bool>,

    /// Identify different speakers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diarize: Option<bool>,

    /// Format dates, numbers and similar entities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_format: Option<bool>,

    /// Keywords to boost, each `word` or `word:boost`
    #[serde(
        default,
        deserialize_with = "comma_separated_or_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub keywords: Vec<String>,

    /// URL Deepgram calls with the result (asynchronous transcription)
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,

    /// Split the transcript into utterances
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utterances: Option<bool>,

    /// Let Deepgram detect the spoken language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detect_language: Option<bool>,
}

impl TranscriptionOptions {
    /// Check semantic constraints on the options.
    pub fn validate(&self) -> NodeResult<()> {
        if let Some(callback) = &self.callback {
            validate_callback_url(callback).map_err(|e| {
                NodeError::ValidationError(format!("Invalid callback URL '{callback}': {e}"))
            })?;
        }

        if let Some(bad) = self.keywords.iter().find(|k| !is_valid_keyword(k)) {
            return Err(NodeError::ValidationError(format!(
                "Invalid keyword '{bad}': expected 'word' or 'word:boost'"
            )));
        }

        Ok(())
    }

    /// Query parameters for `/v1/listen`, including the model.
    pub fn query_pairs(&self, model: TranscriptionModel) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("model", model.as_str().to_string())];

        if let Some(language) = &self.language {
            pairs.push(("language", language.clone()));
        }
        push_bool(&mut pairs, "punctuate", self.punctuate);
        push_bool(&mut pairs, "diarize", self.diarize);
        push_bool(&mut pairs, "smart_format", self.smart_format);
        for keyword in &self.keywords {
            pairs.push(("keywords", keyword.clone()));
        }
        if let Some(callback) = &self.callback {
            pairs.push(("callback", callback.clone()));
        }
        push_bool(&mut pairs, "utterances", self.utterances);
        push_bool(&mut pairs, "detect_language", self.detect_language);

        pairs
    }

    /// `{model, ...options}` as reported in call metadata.
    pub fn parameters_used(&self, model: TranscriptionModel) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("model".to_string(), Value::from(model.as_str()));

        if let Ok(Value::Object(options)) = serde_json::to_value(self) {
            params.extend(options);
        }

        params
    }
}

fn push_bool(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<bool>) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}

fn is_valid_keyword(keyword: &str) -> bool {
    match keyword.rsplit_once(':') {
        Some((word, boost)) => !word.trim().is_empty() && boost.trim().parse::<f64>().is_ok(),
        None => !keyword.trim().is_empty(),
    }
}
