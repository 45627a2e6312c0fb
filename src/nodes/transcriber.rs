//! Deepgram transcriber node: audio (URL or binary property) in, transcript out.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::execution::{ItemProcessor, execute_items};
use super::item::NodeItem;
use super::parameters::ParameterSource;
use crate::config::NodesConfig;
use crate::core::DeepgramClient;
use crate::core::stt::{
    AudioSource, CallMetadata, DEFAULT_TRANSCRIPT_FIELD, OutputFormat, TranscriptionModel,
    TranscriptionOptions, TranscriptionProvider, TranscriptionRequest, shape_transcription,
};
use crate::errors::{NodeError, NodeOperationError, NodeResult};

/// Binary property read when none is configured.
pub const DEFAULT_BINARY_PROPERTY: &str = "data";

/// Where the transcriber takes its audio from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Url,
    File,
}

/// Parameters of [`DeepgramTranscriberNode`], resolved per item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TranscriberParameters {
    pub source_type: SourceType,
    /// Used with [`SourceType::Url`]
    pub audio_url: String,
    /// Used with [`SourceType::File`]
    pub binary_property_name: String,
    pub model: TranscriptionModel,
    pub options: TranscriptionOptions,
    pub append_metadata: bool,
    pub output_format: OutputFormat,
    pub transcript_field_name: String,
    /// Carry the input item's binary attachments to the output item
    pub keep_binary: bool,
}

impl Default for TranscriberParameters {
    fn default() -> Self {
        Self {
            source_type: SourceType::default(),
            audio_url: String::new(),
            binary_property_name: DEFAULT_BINARY_PROPERTY.to_string(),
            model: TranscriptionModel::default(),
            options: TranscriptionOptions::default(),
            append_metadata: false,
            output_format: OutputFormat::default(),
            transcript_field_name: DEFAULT_TRANSCRIPT_FIELD.to_string(),
            keep_binary: false,
        }
    }
}

/// Transcribes one audio source per item.
pub struct DeepgramTranscriberNode {
    provider: Arc<dyn TranscriptionProvider>,
    parameters: Box<dyn ParameterSource<TranscriberParameters>>,
    continue_on_fail: bool,
}

impl DeepgramTranscriberNode {
    pub fn new(
        provider: Arc<dyn TranscriptionProvider>,
        parameters: impl ParameterSource<TranscriberParameters> + 'static,
    ) -> Self {
        Self {
            provider,
            parameters: Box::new(parameters),
            continue_on_fail: false,
        }
    }

    /// Node backed by a [`DeepgramClient`] built from `config`.
    ///
    /// # Errors
    /// `ConfigurationError` when the credentials are missing or invalid.
    pub fn from_config(
        config: &NodesConfig,
        parameters: impl ParameterSource<TranscriberParameters> + 'static,
    ) -> NodeResult<Self> {
        let client = DeepgramClient::from_config(config)?;
        Ok(Self::new(Arc::new(client), parameters).with_continue_on_fail(config.continue_on_fail))
    }

    pub fn with_continue_on_fail(mut self, continue_on_fail: bool) -> Self {
        self.continue_on_fail = continue_on_fail;
        self
    }

    /// Transcribe every item.
    pub async fn execute(&self, items: &[NodeItem]) -> Result<Vec<NodeItem>, NodeOperationError> {
        execute_items(self, items, self.continue_on_fail).await
    }

    async fn audio_source(
        &self,
        params: &TranscriberParameters,
        item: &NodeItem,
    ) -> NodeResult<AudioSource> {
        match params.source_type {
            SourceType::Url => Ok(AudioSource::Url(params.audio_url.trim().to_string())),
            SourceType::File => {
                let property = match params.binary_property_name.trim() {
                    "" => DEFAULT_BINARY_PROPERTY,
                    name => name,
                };
                let binary = item.binary.get(property).ok_or_else(|| {
                    NodeError::ValidationError(format!(
                        "No binary data found in property '{property}'"
                    ))
                })?;
                let data = binary.read().await?;
                Ok(AudioSource::Bytes {
                    data,
                    mime_type: Some(binary.mime_type.clone()),
                })
            }
        }
    }
}

#[async_trait]
impl ItemProcessor for DeepgramTranscriberNode {
    fn name(&self) -> &'static str {
        "deepgramTranscriber"
    }

    async fn process_item(&self, item_index: usize, item: &NodeItem) -> NodeResult<NodeItem> {
        let params = self.parameters.resolve(item_index, item)?;

        let source = self.audio_source(&params, item).await?;
        let request = TranscriptionRequest::new(source, params.model, params.options.clone());
        request.validate()?;

        let started = Instant::now();
        let result = self.provider.transcribe(&request).await;
        let duration_ms = started.elapsed().as_millis() as u64;
        let result = result?;

        info!(item_index, model = %params.model, duration_ms, "Transcription completed");

        let mut json = item.json.clone();
        shape_transcription(
            &mut json,
            result,
            params.output_format,
            &params.transcript_field_name,
        );

        if params.append_metadata {
            CallMetadata {
                endpoint_url: self.provider.endpoint_url(),
                parameters_used: params.options.parameters_used(params.model),
                duration_ms,
            }
            .attach(&mut json);
        }

        let mut output = NodeItem::derived(item_index, json);
        if params.keep_binary {
            output.binary = item.binary.clone();
        }
        Ok(output)
    }

    /// The original binary is not carried on error items.
    fn error_item(&self, item_index: usize, item: &NodeItem, error: &NodeError) -> NodeItem {
        item.failed(item_index, error, false)
    }
}
