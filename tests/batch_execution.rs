//! End-to-end batch tests for the transcriber and speaker nodes
//!
//! Nodes are built from `NodesConfig` with the base URL pointed at a wiremock
//! server, so configuration, HTTP client, node execution and output shaping
//! run together.

use serde_json::{Value, json};
use waav_nodes::core::stt::OutputFormat;
use waav_nodes::nodes::{BinaryStorage, DirectoryBinarySink, FixedParameters, SourceType};
use waav_nodes::{
    DeepgramSpeakerNode, DeepgramTranscriberNode, ErrorKind, NodeError, NodeItem, NodeResult,
    NodesConfig, SpeakerParameters, TranscriberParameters,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, continue_on_fail: bool) -> NodesConfig {
    let mut config = NodesConfig::default();
    config.deepgram_api_key = Some("batch-key".to_string());
    config.deepgram_base_url = Some(server.uri());
    config.continue_on_fail = continue_on_fail;
    config
}

fn items(value: Value) -> Vec<NodeItem> {
    serde_json::from_value(value).unwrap()
}

fn transcript_result(text: &str) -> Value {
    json!({
        "results": {"channels": [{"alternatives": [{"transcript": text}]}]}
    })
}

#[tokio::test]
async fn test_transcriber_reads_uploaded_binary() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/listen"))
        .and(header("authorization", "Token batch-key"))
        .and(header("content-type", "audio/wav"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transcript_result("from upload")))
        .expect(1)
        .mount(&server)
        .await;

    let params = TranscriberParameters {
        source_type: SourceType::File,
        binary_property_name: "recording".to_string(),
        output_format: OutputFormat::TranscriptOnly,
        transcript_field_name: "text".to_string(),
        append_metadata: true,
        ..Default::default()
    };
    let node = DeepgramTranscriberNode::from_config(
        &config_for(&server, false),
        FixedParameters(params),
    )
    .unwrap();

    // "UklGRg==" is base64 for "RIFF"
    let input = items(json!([{
        "json": {"call": 17},
        "binary": {"recording": {"mimeType": "audio/wav", "data": "UklGRg=="}}
    }]));

    let output = node.execute(&input).await.unwrap();

    assert_eq!(output.len(), 1);
    assert_eq!(output[0].json["call"], json!(17));
    assert_eq!(output[0].json["text"], json!("from upload"));
    assert!(output[0].binary.is_empty());

    let metadata = &output[0].json["deepgramMetadata"];
    assert_eq!(
        metadata["endpointUrl"],
        json!(format!("{}/v1/listen", server.uri()))
    );
    assert_eq!(metadata["parametersUsed"]["model"], json!("nova-2"));
    assert!(metadata["durationMs"].is_u64());
}

#[tokio::test]
async fn test_transcriber_tolerant_batch_records_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/listen"))
        .and(body_json(json!({"url": "https://example.com/missing.wav"})))
        .respond_with(
            ResponseTemplate::new(400)
                .insert_header("dg-request-id", "req-missing")
                .set_body_json(json!({"err_msg": "Failed to fetch remote audio"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/listen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transcript_result("ok")))
        .mount(&server)
        .await;

    let audio_url_from_item = |_: usize, item: &NodeItem| -> NodeResult<TranscriberParameters> {
        Ok(TranscriberParameters {
            audio_url: item
                .json
                .get("url")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            ..Default::default()
        })
    };
    let node =
        DeepgramTranscriberNode::from_config(&config_for(&server, true), audio_url_from_item)
            .unwrap();

    let input = items(json!([
        {"json": {"url": "https://example.com/one.wav"}},
        {"json": {"url": "https://example.com/missing.wav"}},
        {"json": {"url": ""}}
    ]));

    let output = node.execute(&input).await.unwrap();
    assert_eq!(output.len(), 3);

    assert!(!output[0].is_error());
    assert_eq!(output[0].json["deepgramTranscription"], transcript_result("ok"));

    let provider_failure = output[1].error.as_ref().unwrap();
    assert_eq!(provider_failure.kind, ErrorKind::Provider);
    assert_eq!(provider_failure.item_index, 1);
    assert_eq!(
        provider_failure.message,
        "Deepgram API Error (400): Failed to fetch remote audio [request_id: req-missing]"
    );

    let validation_failure = output[2].error.as_ref().unwrap();
    assert_eq!(validation_failure.kind, ErrorKind::Validation);
    assert_eq!(
        validation_failure.message,
        "Audio URL is required when Source Type is URL"
    );

    // The empty URL was rejected before any request
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_transcriber_strict_batch_aborts_at_failing_item() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/listen"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"err_msg": "Too many requests"})),
        )
        .mount(&server)
        .await;

    let params = TranscriberParameters {
        audio_url: "https://example.com/a.wav".to_string(),
        ..Default::default()
    };
    let node =
        DeepgramTranscriberNode::from_config(&config_for(&server, false), FixedParameters(params))
            .unwrap();

    let err = node
        .execute(&items(json!([{"json": {}}, {"json": {}}])))
        .await
        .unwrap_err();

    assert_eq!(err.item_index, 0);
    assert_eq!(
        err.source,
        NodeError::ProviderError(
            "Deepgram API Error (429): Rate limit exceeded: Too many requests".to_string()
        )
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_api_key_is_configuration_error() {
    let server = MockServer::start().await;
    let mut config = config_for(&server, true);
    config.deepgram_api_key = None;

    let err =
        DeepgramSpeakerNode::from_config(&config, FixedParameters(SpeakerParameters::default()))
            .err()
            .unwrap();

    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_speaker_writes_audio_to_directory() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/speak"))
        .and(body_json(json!({"text": "Good morning"})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"mp3-bytes".to_vec(), "audio/mpeg"))
        .expect(1)
        .mount(&server)
        .await;

    let params = SpeakerParameters {
        text: "Good morning".to_string(),
        ..Default::default()
    };
    let node =
        DeepgramSpeakerNode::from_config(&config_for(&server, false), FixedParameters(params))
            .unwrap()
            .with_sink(std::sync::Arc::new(DirectoryBinarySink::new(dir.path())));

    let output = node
        .execute(&items(json!([{"json": {"greeting": true}}])))
        .await
        .unwrap();

    assert_eq!(output[0].json["greeting"], json!(true));
    let binary = &output[0].binary["data"];
    assert_eq!(binary.mime_type, "audio/mpeg");
    assert_eq!(binary.file_name.as_deref(), Some("deepgram_output.mpeg"));
    assert_eq!(binary.file_size, Some(9));

    let BinaryStorage::File { path } = &binary.storage else {
        panic!("expected file storage, got {:?}", binary.storage);
    };
    assert!(path.starts_with(dir.path()));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mpeg"));
    assert_eq!(std::fs::read(path).unwrap(), b"mp3-bytes");
}

#[tokio::test]
async fn test_speaker_tolerant_error_item_keeps_binary() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/speak"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<html>maintenance</html>".to_vec(), "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let params = SpeakerParameters {
        text: "Hello".to_string(),
        ..Default::default()
    };
    let node = DeepgramSpeakerNode::from_config(&config_for(&server, true), FixedParameters(params))
        .unwrap();

    let input = items(json!([{
        "json": {"id": 1},
        "binary": {"attachment": {"mimeType": "text/plain", "data": "aGk="}}
    }]));

    let output = node.execute(&input).await.unwrap();

    assert_eq!(output.len(), 1);
    assert_eq!(output[0].json, input[0].json);
    assert_eq!(output[0].binary, input[0].binary);

    let record = output[0].error.as_ref().unwrap();
    assert_eq!(record.kind, ErrorKind::Provider);
    assert_eq!(
        record.message,
        "Deepgram API returned non-audio content (Content-Type: text/html; charset=utf-8). \
         Could not parse error details."
    );
}
