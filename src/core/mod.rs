pub mod client;
pub mod messages;
pub mod stt;
pub mod tts;

// Re-export commonly used types for convenience
pub use client::{DEEPGRAM_API_URL, DeepgramClient};
pub use messages::DeepgramErrorResponse;

pub use stt::{
    AudioSource, CallMetadata, OutputFormat, TranscriptionModel, TranscriptionOptions,
    TranscriptionProvider, TranscriptionRequest, TranscriptionResponse,
};

pub use tts::{
    OutputArtifact, SpeakAudioOptions, SpeakModel, SpeechProvider, SynthesisRequest,
    SynthesisResponse, synthesize,
};
