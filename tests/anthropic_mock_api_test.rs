//! Mock API tests for the Anthropic Messages adapter

mod support;

use costgate::prelude::*;
use serde_json::json;
use support::{adapter, assert_close};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn message_response(text: &str) -> serde_json::Value {
    json!({
        "id": "msg_01XFDUDYJgAACzvnptvVoYEL",
        "type": "message",
        "role": "assistant",
        "model": "claude-3-5-sonnet-20241022",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 1000, "output_tokens": 1000}
    })
}

#[tokio::test]
async fn chat_sends_anthropic_headers_and_lifts_system() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-anthropic-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 1024,
            "system": "You are a technical assistant",
            "messages": [{"role": "user", "content": "Explain quantum computing"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_response("Qubits.")))
        .expect(1)
        .mount(&server)
        .await;

    let chat = adapter(&server, "anthropic", RequestKind::Chat, None);
    let response = chat
        .generate(GenerateRequest::new(vec![
            ChatMessage::system("You are a technical assistant"),
            ChatMessage::user("Explain quantum computing"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.provider(), "anthropic");
    assert_eq!(response.text(), Some("Qubits."));
    assert_eq!(response.total_tokens(), 2000);
    // 1000 * 0.003 / 1000 + 1000 * 0.015 / 1000
    assert_close(response.cost(), 0.018);
}

#[tokio::test]
async fn completion_via_claude_alias_sends_prompt_as_user_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({
            "max_tokens": 50,
            "stop_sequences": ["\n\n"],
            "messages": [{"role": "user", "content": "Once upon a time"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_response("there was")))
        .expect(1)
        .mount(&server)
        .await;

    let completion = adapter(&server, "claude", RequestKind::Completion, None);
    assert_eq!(completion.request_kind(), RequestKind::Completion);

    let request = GenerateRequest::new("Once upon a time").with_options(
        GenerateOptions::new()
            .with_max_tokens(50)
            .with_stop(vec!["\n\n".to_string()]),
    );
    let response = completion.generate(request).await.unwrap();
    assert_eq!(response.text(), Some("there was"));
    assert_eq!(response.prompt(), "Once upon a time");
}

#[tokio::test]
async fn missing_usage_falls_back_to_local_count() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "message",
            "content": [
                {"type": "text", "text": "four"},
                {"type": "text", "text": " five"}
            ]
        })))
        .mount(&server)
        .await;

    let chat = adapter(&server, "anthropic", RequestKind::Chat, None);
    let response = chat.generate("one two three".into()).await.unwrap();

    assert_eq!(response.text(), Some("four five"));
    assert_eq!(response.input_tokens(), 3);
    assert_eq!(response.output_tokens(), 2);
}

#[tokio::test]
async fn overloaded_error_is_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_json(json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        })))
        .mount(&server)
        .await;

    let chat = adapter(&server, "anthropic", RequestKind::Chat, None);
    let err = chat.generate("Hello".into()).await.unwrap_err();

    assert_eq!(err.generation_kind(), Some(GenerationErrorKind::Transport));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn invalid_key_is_authentication() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": {"type": "authentication_error", "message": "invalid x-api-key"}
        })))
        .mount(&server)
        .await;

    let chat = adapter(&server, "anthropic", RequestKind::Chat, None);
    let err = chat.generate("Hello".into()).await.unwrap_err();

    assert_eq!(err.generation_kind(), Some(GenerationErrorKind::Authentication));
    match err {
        LlmError::Generation { provider, .. } => assert_eq!(provider, "anthropic"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn system_only_input_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let chat = adapter(&server, "anthropic", RequestKind::Chat, None);
    let err = chat
        .generate(GenerateRequest::new(vec![ChatMessage::system("You are terse")]))
        .await
        .unwrap_err();

    assert_eq!(err.generation_kind(), Some(GenerationErrorKind::InvalidRequest));
}
