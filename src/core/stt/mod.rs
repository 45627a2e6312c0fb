//! Deepgram pre-recorded transcription.
//!
//! # Pipeline
//!
//! 1. Build a [`TranscriptionRequest`] from an [`AudioSource`] (URL or bytes),
//!    a [`TranscriptionModel`] and typed [`TranscriptionOptions`]
//! 2. [`TranscriptionRequest::validate`] rejects bad input before any I/O
//! 3. [`TranscriptionProvider::transcribe`] calls `/v1/listen`
//! 4. [`shape_transcription`] writes either the full document or only the
//!    primary transcript, and [`CallMetadata`] optionally records the call

mod config;
mod messages;
mod output;
mod provider;
mod request;

pub use config::{TranscriptionModel, TranscriptionOptions};
pub use messages::TranscriptionResponse;
pub use output::{
    CallMetadata, DEFAULT_TRANSCRIPT_FIELD, FULL_RESULT_FIELD, METADATA_FIELD, OutputFormat,
    shape_transcription, transcript_field_name,
};
pub use provider::TranscriptionProvider;
pub use request::{AudioSource, DEFAULT_UPLOAD_MIME_TYPE, TranscriptionRequest};
