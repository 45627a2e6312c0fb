//! Deepgram text-to-speech.
//!
//! # Pipeline
//!
//! 1. [`SynthesisRequest::validate`] checks the text (non-empty, at most
//!    [`MAX_TEXT_CHARS`] characters) before any I/O
//! 2. [`SpeechProvider::speak`] calls `/v1/speak` and returns headers plus a
//!    lazy body
//! 3. [`SynthesisResponse::into_audio`] classifies the response by
//!    `content-type` and drains the audio
//! 4. [`synthesize`] packages the audio as an [`OutputArtifact`] with an
//!    inferred MIME type and file name

mod config;
mod output;
mod provider;
mod request;
mod stream;

pub use config::{AudioContainer, AudioEncoding, SpeakAudioOptions, SpeakModel};
pub use output::{DEFAULT_FILENAME_PREFIX, OutputArtifact, default_filename};
pub use provider::{SpeechProvider, synthesize};
pub use request::{MAX_TEXT_CHARS, SynthesisRequest};
pub use stream::{ByteStream, MAX_ERROR_BODY_BYTES, SynthesisResponse};
