//! Shared pricing catalog, pricing files and token tracking across adapters

mod support;

use std::io::Write;
use std::sync::Arc;

use costgate::prelude::*;
use costgate::{TokenUsageEntry, tokens::CharacterTokenCounter};
use serde_json::json;
use support::{assert_close, factory, mock_config};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_response(prompt_tokens: u32, completion_tokens: u32) -> serde_json::Value {
    json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": "ok"}}],
        "usage": {
            "prompt_tokens": prompt_tokens,
            "completion_tokens": completion_tokens,
            "total_tokens": prompt_tokens + completion_tokens
        }
    })
}

#[tokio::test]
async fn registration_is_visible_to_existing_adapters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"model": "ft:gpt-4o-mini:acme"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(2000, 1000)))
        .mount(&server)
        .await;

    let catalog = Arc::new(PricingCatalog::with_defaults());
    let chat = factory(catalog.clone())
        .from_config(&mock_config(&server), "openai", RequestKind::Chat, None)
        .unwrap();

    let request = GenerateRequest::new("Hello")
        .with_options(GenerateOptions::new().with_model("ft:gpt-4o-mini:acme"));

    // unknown model: provider default rates (0.0015, 0.002)
    let before = chat.generate(request.clone()).await.unwrap();
    assert_close(before.cost(), 0.005);

    catalog
        .register_model(
            "openai",
            "ft:gpt-4o-mini:acme",
            ModelPricing::tokens(ModelType::Chat, 0.01, 0.02),
        )
        .unwrap();

    let after = chat.generate(request).await.unwrap();
    assert_eq!(after.model(), "ft:gpt-4o-mini:acme");
    assert_close(after.cost(), 0.04);
}

#[test]
fn newly_registered_model_becomes_default() {
    let catalog = Arc::new(PricingCatalog::with_defaults());
    catalog
        .register_model(
            "openai",
            "gpt-5-preview",
            ModelPricing::tokens(ModelType::Chat, 0.02, 0.04).released(2025, 8, 7),
        )
        .unwrap();

    let chat = factory(catalog)
        .create("openai", RequestKind::Chat, "test-api-key", None)
        .unwrap();
    assert_eq!(chat.model(), "gpt-5-preview");
}

#[test]
fn pricing_file_replaces_builtin_table() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let table = json!({
        "OpenAI": {
            "default_rates": {"input_cost_per_1k": 0.001, "output_cost_per_1k": 0.001},
            "models": {
                "house-chat": {
                    "type": "chat",
                    "input_cost_per_1k": 0.5,
                    "output_cost_per_1k": 1.0,
                    "release_date": "2025-01-01"
                },
                "house-embed": {"type": "embedding", "input_cost_per_1k": 0.1}
            }
        }
    });
    write!(file, "{table}").unwrap();

    let config = GatewayConfig {
        pricing_file: Some(file.path().to_path_buf()),
        ..GatewayConfig::default()
    };
    let catalog = config.pricing_catalog().unwrap();

    assert_eq!(catalog.providers(), vec!["openai".to_string()]);
    assert_eq!(
        catalog.latest_model("openai", Some(ModelType::Chat)).as_deref(),
        Some("house-chat")
    );
    assert_close(
        catalog.calculate_model_cost("openai", "house-chat", 1000, 1000).unwrap(),
        1.5,
    );
    assert!(matches!(
        catalog.calculate_cost("anthropic", 10, 10),
        Err(LlmError::UnknownProvider(_))
    ));

    let exported = catalog.to_json_string().unwrap();
    let reloaded = PricingCatalog::from_json_str(&exported).unwrap();
    assert_eq!(reloaded.snapshot().unwrap(), catalog.snapshot().unwrap());
}

#[test]
fn malformed_pricing_file_is_a_configuration_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();

    let err = PricingCatalog::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, LlmError::ConfigurationError(_)));
}

#[tokio::test]
async fn tracker_totals_match_responses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(100, 50)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "ok"}],
            "usage": {"input_tokens": 30, "output_tokens": 20}
        })))
        .mount(&server)
        .await;

    let factory = factory(Arc::new(PricingCatalog::with_defaults()));
    let config = mock_config(&server);
    let openai = factory
        .from_config(&config, "openai", RequestKind::Chat, Some("gpt-4".into()))
        .unwrap();
    let claude = factory
        .from_config(&config, "anthropic", RequestKind::Chat, None)
        .unwrap();

    let mut tracker = TokenTracker::new();
    let mut expected_cost = 0.0;
    for adapter in [&openai, &claude, &openai] {
        let response = adapter.generate("Hello".into()).await.unwrap();
        expected_cost += response.cost();
        tracker.track_response(&response);
    }

    assert_eq!(tracker.total_tokens(), 350);
    assert_eq!(tracker.provider_tokens("openai"), 300);
    assert_eq!(tracker.provider_tokens("anthropic"), 50);
    assert_close(tracker.total_cost(), (expected_cost * 10_000.0).round() / 10_000.0);

    let log: &[TokenUsageEntry] = tracker.usage_log();
    assert_eq!(log.len(), 3);
    assert_eq!(log[1].provider, "anthropic");
    assert!(log[0].timestamp <= log[2].timestamp);
}

#[tokio::test]
async fn injected_counter_is_used_without_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "abcdefgh"}}]
        })))
        .mount(&server)
        .await;

    let chat = factory(Arc::new(PricingCatalog::with_defaults()))
        .with_token_counter(Arc::new(CharacterTokenCounter))
        .from_config(&mock_config(&server), "openai", RequestKind::Chat, None)
        .unwrap();
    let response = chat.generate("abcdefghijkl".into()).await.unwrap();

    assert_eq!(response.input_tokens(), 3);
    assert_eq!(response.output_tokens(), 2);
}

#[test]
fn factory_rejects_unknown_and_unsupported() {
    let factory = factory(Arc::new(PricingCatalog::with_defaults()));

    let err = factory
        .create("cohere", RequestKind::Chat, "key", None)
        .unwrap_err();
    assert!(matches!(err, LlmError::UnknownProvider(ref p) if p == "cohere"));

    let err = factory
        .create("anthropic", RequestKind::Embedding, "key", None)
        .unwrap_err();
    assert!(matches!(err, LlmError::UnsupportedOperation(_)));

    assert_eq!(
        ProviderFactory::supported_kinds("openai"),
        RequestKind::ALL.to_vec()
    );
}

#[tokio::test]
async fn missing_key_fails_at_call_time() {
    let chat = factory(Arc::new(PricingCatalog::with_defaults()))
        .create("openai", RequestKind::Chat, "", None)
        .unwrap();
    assert!(!chat.validate_api_key());

    let err = chat.generate("Hello".into()).await.unwrap_err();
    assert_eq!(err.generation_kind(), Some(GenerationErrorKind::Authentication));
}
