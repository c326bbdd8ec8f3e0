//! HTTP-level tests for the OpenAI-compatible provider.

use docqa_llm::{
    ChatMessage, ChatProvider, ChatRequest, LlmConfig, LlmError, OpenAiCompatProvider,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> OpenAiCompatProvider {
    let config = LlmConfig {
        base_url: format!("{}/v1", server.uri()),
        model: "test-model".to_string(),
        api_key_env: "DOCQA_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
        timeout_secs: 5,
        ..LlmConfig::default()
    };
    OpenAiCompatProvider::from_config(&config)
        .unwrap()
        .with_api_key("sk-test")
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15 }
    })
}

#[tokio::test]
async fn test_complete_sends_messages_and_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "max_tokens": 500,
            "messages": [
                { "role": "system", "content": "Answer from the documents." },
                { "role": "user", "content": "What is Rust?" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("A language.")))
        .expect(1)
        .mount(&server)
        .await;

    let request = ChatRequest::new(vec![
        ChatMessage::system("Answer from the documents."),
        ChatMessage::user("What is Rust?"),
    ]);
    let response = provider(&server).complete(request).await.unwrap();

    assert_eq!(response.content, "A language.");
    assert_eq!(response.model, "test-model");
    assert_eq!(response.tokens_used, Some(15));
}

#[tokio::test]
async fn test_request_overrides_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({ "max_tokens": 1500 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("[]")))
        .expect(1)
        .mount(&server)
        .await;

    let request = ChatRequest::from_prompt("quiz me")
        .with_temperature(0.5)
        .with_max_tokens(1500);
    let response = provider(&server).complete(request).await.unwrap();
    assert_eq!(response.content, "[]");
}

#[tokio::test]
async fn test_rate_limit_uses_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .complete(ChatRequest::from_prompt("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::RateLimited { retry_after_secs: 7 }));
}

#[tokio::test]
async fn test_rate_limit_defaults_to_sixty_seconds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = provider(&server)
        .complete(ChatRequest::from_prompt("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::RateLimited { retry_after_secs: 60 }));
}

#[tokio::test]
async fn test_server_error_is_api_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model overloaded"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .complete(ChatRequest::from_prompt("hi"))
        .await
        .unwrap_err();
    match err {
        LlmError::ApiRequest(message) => assert!(message.contains("model overloaded")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_choices_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "model": "test-model", "choices": [] })),
        )
        .mount(&server)
        .await;

    let err = provider(&server)
        .complete(ChatRequest::from_prompt("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::InvalidResponse(_)));
}
