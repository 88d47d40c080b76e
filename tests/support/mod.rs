//! Helpers shared by the mock API tests.

#![allow(dead_code)]

use std::sync::Arc;

use costgate::prelude::*;
use serde_json::{Value, json};
use wiremock::MockServer;

/// A config whose endpoints point at `server`.
pub fn mock_config(server: &MockServer) -> GatewayConfig {
    GatewayConfig::default()
        .with_api_key(ProviderType::OpenAi, "test-api-key")
        .with_api_key(ProviderType::Anthropic, "test-anthropic-key")
        .with_base_url(ProviderType::OpenAi, server.uri())
        .with_base_url(ProviderType::Anthropic, server.uri())
}

pub fn factory(catalog: Arc<PricingCatalog>) -> ProviderFactory {
    ProviderFactory::new(catalog).with_http_client(reqwest::Client::new())
}

/// Adapter for `provider`/`kind` against `server` with the built-in catalog.
pub fn adapter(
    server: &MockServer,
    provider: &str,
    kind: RequestKind,
    model: Option<&str>,
) -> Box<dyn ModelProvider> {
    factory(Arc::new(PricingCatalog::with_defaults()))
        .from_config(&mock_config(server), provider, kind, model.map(str::to_string))
        .expect("adapter")
}

pub fn openai_error(error_type: &str, message: &str) -> Value {
    json!({
        "error": {
            "message": message,
            "type": error_type,
            "param": null,
            "code": null
        }
    })
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
