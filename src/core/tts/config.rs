//! Configuration types for Deepgram text-to-speech.
//!
//! - Voice model selection (Aura voices)
//! - Output audio format (encoding, container, sample rate, bit rate)
//! - MIME type inference for the produced audio

use serde::{Deserialize, Serialize};

use crate::utils::serde_helpers::empty_as_none;

// =============================================================================
// Speak Models
// =============================================================================

/// Deepgram Aura voice models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpeakModel {
    #[serde(rename = "aura-angus-en")]
    AuraAngus,
    #[serde(rename = "aura-arcas-en")]
    AuraArcas,
    #[default]
    #[serde(rename = "aura-asteria-en")]
    AuraAsteria,
    #[serde(rename = "aura-athena-en")]
    AuraAthena,
    #[serde(rename = "aura-helios-en")]
    AuraHelios,
    #[serde(rename = "aura-hera-en")]
    AuraHera,
    #[serde(rename = "aura-luna-en")]
    AuraLuna,
    #[serde(rename = "aura-orion-en")]
    AuraOrion,
    #[serde(rename = "aura-orpheus-en")]
    AuraOrpheus,
    #[serde(rename = "aura-perseus-en")]
    AuraPerseus,
    #[serde(rename = "aura-stella-en")]
    AuraStella,
    #[serde(rename = "aura-zeus-en")]
    AuraZeus,
}

impl SpeakModel {
    /// Convert to the API parameter value.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuraAngus => "aura-angus-en",
            Self::AuraArcas => "aura-arcas-en",
            Self::AuraAsteria => "aura-asteria-en",
            Self::AuraAthena => "aura-athena-en",
            Self::AuraHelios => "aura-helios-en",
            Self::AuraHera => "aura-hera-en",
            Self::AuraLuna => "aura-luna-en",
            Self::AuraOrion => "aura-orion-en",
            Self::AuraOrpheus => "aura-orpheus-en",
            Self::AuraPerseus => "aura-perseus-en",
            Self::AuraStella => "aura-stella-en",
            Self::AuraZeus => "aura-zeus-en",
        }
    }
}

impl std::fmt::Display for SpeakModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Audio Format
// =============================================================================

/// Audio encodings accepted by `/v1/speak`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioEncoding {
    Mp3,
    /// 16-bit signed little-endian PCM
    Linear16,
    /// G.711 mu-law
    Mulaw,
}

impl AudioEncoding {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Linear16 => "linear16",
            Self::Mulaw => "mulaw",
        }
    }
}

/// Container wrapping the encoded audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioContainer {
    Wav,
    Mp3,
}

impl AudioContainer {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
        }
    }
}

/// Optional output format settings.
///
/// Every field is optional and only sent when set; the provider's own
/// defaults apply otherwise. Blank strings and zero count as unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeakAudioOptions {
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub encoding: Option<AudioEncoding>,

    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub container: Option<AudioContainer>,

    /// Sample rate in Hz
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,

    /// Bit rate in bits per second
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub bit_rate: Option<u32>,
}

impl SpeakAudioOptions {
    /// MIME type of the audio these options produce.
    ///
    /// | container | encoding | MIME |
    /// |-----------|----------|------|
    /// | `wav` | any | `audio/wav` |
    /// | none | `linear16` | `audio/wav` |
    /// | none | `mulaw` | `audio/basic` |
    /// | otherwise | | `audio/mpeg` |
    pub fn mime_type(&self) -> &'static str {
        match (self.container, self.encoding) {
            (Some(AudioContainer::Wav), _) => "audio/wav",
            (None, Some(AudioEncoding::Linear16)) => "audio/wav",
            (None, Some(AudioEncoding::Mulaw)) => "audio/basic",
            _ => "audio/mpeg",
        }
    }

    /// Query parameters for `/v1/speak`, including the model.
    pub fn query_pairs(&self, model: SpeakModel) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("model", model.as_str().to_string())];

        if let Some(encoding) = self.encoding {
            pairs.push(("encoding", encoding.as_str().to_string()));
        }
        if let Some(container) = self.container {
            pairs.push(("container", container.as_str().to_string()));
        }
        if let Some(sample_rate) = self.sample_rate {
            pairs.push(("sample_rate", sample_rate.to_string()));
        }
        if let Some(bit_rate) = self.bit_rate {
            pairs.push(("bit_rate", bit_rate.to_string()));
        }

        pairs
    }
}
