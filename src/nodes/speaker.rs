//! Deepgram speaker node: text in, audio attachment out.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::binary::{BinarySink, InlineBinarySink};
use super::execution::{ItemProcessor, execute_items};
use super::item::NodeItem;
use super::parameters::ParameterSource;
use super::transcriber::DEFAULT_BINARY_PROPERTY;
use crate::config::NodesConfig;
use crate::core::DeepgramClient;
use crate::core::tts::{SpeakAudioOptions, SpeakModel, SpeechProvider, SynthesisRequest, synthesize};
use crate::errors::{NodeOperationError, NodeResult};
use crate::utils::serde_helpers::empty_as_none;

/// Parameters of [`DeepgramSpeakerNode`], resolved per item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SpeakerParameters {
    pub text: String,
    pub model: SpeakModel,
    pub audio_options: SpeakAudioOptions,
    pub output_binary_property_name: String,
    /// Derived from the MIME type when unset
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub output_filename: Option<String>,
}

impl Default for SpeakerParameters {
    fn default() -> Self {
        Self {
            text: String::new(),
            model: SpeakModel::default(),
            audio_options: SpeakAudioOptions::default(),
            output_binary_property_name: DEFAULT_BINARY_PROPERTY.to_string(),
            output_filename: None,
        }
    }
}

impl SpeakerParameters {
    /// Copy of these parameters with `text` taken from the item's `field`.
    ///
    /// Keeps the configured text when the field is missing or not a string.
    pub fn with_text_from_field(&self, item: &NodeItem, field: &str) -> Self {
        let mut resolved = self.clone();
        if let Some(text) = item.json.get(field).and_then(Value::as_str) {
            resolved.text = text.to_string();
        }
        resolved
    }
}

/// Synthesizes speech for one text per item.
pub struct DeepgramSpeakerNode {
    provider: Arc<dyn SpeechProvider>,
    parameters: Box<dyn ParameterSource<SpeakerParameters>>,
    sink: Arc<dyn BinarySink>,
    continue_on_fail: bool,
}

impl DeepgramSpeakerNode {
    /// Node storing audio inline in the output items.
    pub fn new(
        provider: Arc<dyn SpeechProvider>,
        parameters: impl ParameterSource<SpeakerParameters> + 'static,
    ) -> Self {
        Self {
            provider,
            parameters: Box::new(parameters),
            sink: Arc::new(InlineBinarySink),
            continue_on_fail: false,
        }
    }

    /// Node backed by a [`DeepgramClient`] built from `config`.
    ///
    /// # Errors
    /// `ConfigurationError` when the credentials are missing or invalid.
    pub fn from_config(
        config: &NodesConfig,
        parameters: impl ParameterSource<SpeakerParameters> + 'static,
    ) -> NodeResult<Self> {
        let client = DeepgramClient::from_config(config)?;
        Ok(Self::new(Arc::new(client), parameters).with_continue_on_fail(config.continue_on_fail))
    }

    pub fn with_sink(mut self, sink: Arc<dyn BinarySink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_continue_on_fail(mut self, continue_on_fail: bool) -> Self {
        self.continue_on_fail = continue_on_fail;
        self
    }

    /// Synthesize every item.
    pub async fn execute(&self, items: &[NodeItem]) -> Result<Vec<NodeItem>, NodeOperationError> {
        execute_items(self, items, self.continue_on_fail).await
    }
}

#[async_trait]
impl ItemProcessor for DeepgramSpeakerNode {
    fn name(&self) -> &'static str {
        "deepgramSpeaker"
    }

    async fn process_item(&self, item_index: usize, item: &NodeItem) -> NodeResult<NodeItem> {
        let params = self.parameters.resolve(item_index, item)?;

        let property = match params.output_binary_property_name.trim() {
            "" => DEFAULT_BINARY_PROPERTY,
            name => name,
        };

        let request = SynthesisRequest::new(params.text, params.model, params.audio_options);
        let artifact = synthesize(
            self.provider.as_ref(),
            &request,
            property,
            params.output_filename.as_deref(),
        )
        .await?;

        info!(
            item_index,
            model = %request.model,
            bytes = artifact.data.len(),
            mime_type = %artifact.mime_type,
            "Speech synthesized"
        );

        let binary = self
            .sink
            .prepare(artifact.data, &artifact.file_name, &artifact.mime_type)
            .await?;

        let mut output = NodeItem::derived(item_index, item.json.clone());
        output.binary = BTreeMap::from([(artifact.binary_property_name, binary)]);
        Ok(output)
    }
}
