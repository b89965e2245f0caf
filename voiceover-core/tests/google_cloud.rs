use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use httpmock::Method::{GET, POST};
use httpmock::MockServer;
use serde_json::json;
use tempfile::TempDir;
use voiceover_core::credentials::CredentialContext;
use voiceover_core::voice::tts::google_cloud::{GoogleCloudConfig, GoogleCloudTts};
use voiceover_core::voice::tts::provider::TextToSpeech;
use voiceover_core::voice::tts::types::{AudioEncoding, SsmlGender, VoiceDefaults};
use voiceover_core::{Script, Segment, SynthesisError, SynthesisRunner};

fn provider(server: &MockServer, credentials: CredentialContext) -> GoogleCloudTts {
    let mut config = GoogleCloudConfig::new(credentials);
    config.endpoint = server.base_url();
    GoogleCloudTts::new(config).unwrap()
}

fn api_key() -> CredentialContext {
    CredentialContext::ApiKey("test-key".to_string())
}

fn request(text: &str) -> voiceover_core::voice::tts::types::SynthesisRequest {
    VoiceDefaults::default().request(text, "en-US-Wavenet-D")
}

#[tokio::test]
async fn synthesize_posts_request_and_decodes_audio() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/text:synthesize")
                .query_param("key", "test-key")
                .json_body(json!({
                    "input": { "text": "Hello there." },
                    "voice": {
                        "languageCode": "en-US",
                        "name": "en-US-Wavenet-D",
                        "ssmlGender": "NEUTRAL"
                    },
                    "audioConfig": { "audioEncoding": "MP3" }
                }));
            then.status(200)
                .json_body(json!({ "audioContent": general_purpose::STANDARD.encode(b"ID3 fake mp3") }));
        })
        .await;

    let tts = provider(&server, api_key());
    let audio = tts.synthesize(&request("Hello there.")).await.unwrap();

    mock.assert_async().await;
    assert_eq!(audio.bytes, b"ID3 fake mp3");
    assert_eq!(audio.encoding, AudioEncoding::Mp3);
}

#[tokio::test]
async fn access_token_is_sent_as_bearer_with_quota_project() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/text:synthesize")
                .header("authorization", "Bearer ya29.token")
                .header("x-goog-user-project", "demo-project");
            then.status(200)
                .json_body(json!({ "audioContent": general_purpose::STANDARD.encode(b"ok") }));
        })
        .await;

    let mut config = GoogleCloudConfig::new(CredentialContext::AccessToken("ya29.token".into()));
    config.endpoint = server.base_url();
    config.quota_project = Some("demo-project".to_string());
    let tts = GoogleCloudTts::new(config).unwrap();

    let audio = tts.synthesize(&request("Hi.")).await.unwrap();
    mock.assert_async().await;
    assert_eq!(audio.bytes, b"ok");
}

#[tokio::test]
async fn rejected_credentials_map_to_authentication_error() {
    for status in [401, 403] {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/text:synthesize");
                then.status(status)
                    .body(r#"{"error":{"code":403,"status":"PERMISSION_DENIED"}}"#);
            })
            .await;

        let err = provider(&server, api_key())
            .synthesize(&request("Hi."))
            .await
            .unwrap_err();
        assert!(
            matches!(err, SynthesisError::Authentication(_)),
            "status {status} gave {err:?}"
        );
    }
}

#[tokio::test]
async fn service_rejection_maps_to_request_error() {
    for status in [400, 429, 500] {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/text:synthesize");
                then.status(status).body("Either input.text or input.ssml is required");
            })
            .await;

        let err = provider(&server, api_key())
            .synthesize(&request("Hi."))
            .await
            .unwrap_err();
        match err {
            SynthesisError::Request(e) => {
                assert!(e.to_string().contains(&status.to_string()));
            }
            other => panic!("status {status} gave {other:?}"),
        }
    }
}

#[tokio::test]
async fn malformed_success_body_is_request_error() {
    let cases = [
        json!({}),
        json!({ "audioContent": "***not base64***" }),
    ];

    for body in cases {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/text:synthesize");
                then.status(200).json_body(body.clone());
            })
            .await;

        let err = provider(&server, api_key())
            .synthesize(&request("Hi."))
            .await
            .unwrap_err();
        assert!(matches!(err, SynthesisError::Request(_)), "{body} gave {err:?}");
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_request_error() {
    let mut config = GoogleCloudConfig::new(api_key());
    config.endpoint = "http://127.0.0.1:1".to_string();
    let tts = GoogleCloudTts::new(config).unwrap();

    let err = tts.synthesize(&request("Hi.")).await.unwrap_err();
    assert!(matches!(err, SynthesisError::Request(_)));
}

#[tokio::test]
async fn list_voices_filters_by_language() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/voices")
                .query_param("languageCode", "en-US")
                .query_param("key", "test-key");
            then.status(200).json_body(json!({
                "voices": [
                    {
                        "languageCodes": ["en-US"],
                        "name": "en-US-Wavenet-D",
                        "ssmlGender": "MALE",
                        "naturalSampleRateHertz": 24000
                    },
                    {
                        "languageCodes": ["en-US"],
                        "name": "en-US-Wavenet-C",
                        "ssmlGender": "FEMALE",
                        "naturalSampleRateHertz": 24000
                    }
                ]
            }));
        })
        .await;

    let voices = provider(&server, api_key())
        .list_voices(Some("en-US"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(voices.len(), 2);
    assert_eq!(voices[0].name, "en-US-Wavenet-D");
    assert_eq!(voices[0].ssml_gender, SsmlGender::Male);
    assert_eq!(voices[1].natural_sample_rate_hertz, 24000);
}

#[tokio::test]
async fn runner_writes_files_from_remote_audio() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/text:synthesize");
            then.status(200)
                .json_body(json!({ "audioContent": general_purpose::STANDARD.encode(b"mp3 bytes") }));
        })
        .await;

    let dir = TempDir::new().unwrap();
    let runner = SynthesisRunner::new(Arc::new(provider(&server, api_key())))
        .with_output_dir(dir.path());

    let script = Script::new(vec![
        Segment::new("One.", "one.mp3", "en-US-Wavenet-D"),
        Segment::new("Two.", "two.mp3", "en-US-Wavenet-D"),
    ]);
    let report = runner.run(&script).await.unwrap();

    mock.assert_hits_async(2).await;
    assert!(report.is_success());
    for name in ["one.mp3", "two.mp3"] {
        assert_eq!(std::fs::read(dir.path().join(name)).unwrap(), b"mp3 bytes");
    }
}
