//! HTTP-level tests for the Google text-to-speech provider.

use docqa_llm::{GoogleTtsProvider, LlmError, SpeechConfig, SpeechProvider};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> GoogleTtsProvider {
    let config = SpeechConfig {
        base_url: format!("{}/v1", server.uri()),
        api_key_env: "DOCQA_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
        timeout_secs: 5,
        ..SpeechConfig::default()
    };
    GoogleTtsProvider::from_config(&config)
        .unwrap()
        .with_api_key("g-test")
}

#[tokio::test]
async fn test_synthesize_decodes_audio() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/text:synthesize"))
        .and(header("x-goog-api-key", "g-test"))
        .and(body_partial_json(json!({
            "input": { "text": "Welcome to the overview." },
            "voice": { "languageCode": "en-US", "name": "en-US-Neural2-F" },
            "audioConfig": { "audioEncoding": "MP3" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            // "ID3 audio"
            "audioContent": "SUQzIGF1ZGlv"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let audio = provider(&server)
        .synthesize("Welcome to the overview.")
        .await
        .unwrap();
    assert_eq!(audio, b"ID3 audio".to_vec());
}

#[tokio::test]
async fn test_missing_audio_content_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/text:synthesize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    assert!(matches!(
        provider(&server).synthesize("hello").await,
        Err(LlmError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_bad_base64_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/text:synthesize"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "audioContent": "not base64!" })),
        )
        .mount(&server)
        .await;

    assert!(matches!(
        provider(&server).synthesize("hello").await,
        Err(LlmError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_error_status_is_api_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/text:synthesize"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let err = provider(&server).synthesize("hello").await.unwrap_err();
    match err {
        LlmError::ApiRequest(message) => assert!(message.contains("API key not valid")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_uses_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/text:synthesize"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "12"))
        .mount(&server)
        .await;

    assert!(matches!(
        provider(&server).synthesize("hello").await,
        Err(LlmError::RateLimited {
            retry_after_secs: 12
        })
    ));
}
