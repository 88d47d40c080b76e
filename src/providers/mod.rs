//! Provider adapters
//!
//! One [`ModelProvider`](crate::traits::ModelProvider) implementation per
//! provider and request kind. Every adapter shares a [`ProviderContext`]: the
//! pricing catalog, the HTTP client and the fallback token counter.

use std::future::Future;
use std::sync::Arc;
use tracing::Instrument;

use crate::error::LlmError;
use crate::pricing::{ModelType, PricingCatalog};
use crate::tokens::{TokenCounter, WhitespaceTokenCounter};
use crate::types::{ModelResponse, RequestKind, Usage};

#[cfg(feature = "anthropic")]
pub mod anthropic;
#[cfg(feature = "openai")]
pub mod openai;

/// State shared by adapters.
#[derive(Debug, Clone)]
pub struct ProviderContext {
    catalog: Arc<PricingCatalog>,
    http_client: reqwest::Client,
    token_counter: Arc<dyn TokenCounter>,
}

impl ProviderContext {
    /// A context using the whitespace token counter.
    pub fn new(catalog: Arc<PricingCatalog>, http_client: reqwest::Client) -> Self {
        Self {
            catalog,
            http_client,
            token_counter: Arc::new(WhitespaceTokenCounter),
        }
    }

    pub fn with_token_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.token_counter = counter;
        self
    }

    pub fn catalog(&self) -> &Arc<PricingCatalog> {
        &self.catalog
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    pub fn token_counter(&self) -> &dyn TokenCounter {
        self.token_counter.as_ref()
    }

    /// Pick the model for a new adapter: the explicit one, else the latest
    /// active catalog entry of `model_type`, else `fallback`.
    pub(crate) fn resolve_model(
        &self,
        explicit: Option<String>,
        provider: &str,
        model_type: ModelType,
        fallback: &str,
    ) -> String {
        explicit
            .filter(|m| !m.trim().is_empty())
            .or_else(|| self.catalog.latest_model(provider, Some(model_type)))
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Vendor-reported usage, or a local count of the input and output texts.
    pub(crate) fn usage_or_count(
        &self,
        reported: Option<Usage>,
        inputs: &[&str],
        outputs: &[&str],
    ) -> Usage {
        reported.unwrap_or_else(|| {
            tracing::debug!("no usage in response, counting tokens locally");
            Usage::new(
                self.token_counter.count_all(inputs),
                self.token_counter.count_all(outputs),
            )
        })
    }

    /// Token cost of a call; 0 when the catalog cannot price it.
    pub(crate) fn token_cost(
        &self,
        provider: &str,
        model: &str,
        input_tokens: u32,
        output_tokens: u32,
    ) -> f64 {
        self.catalog
            .estimate_cost(provider, model, input_tokens, output_tokens)
            .unwrap_or_else(|e| {
                tracing::warn!(provider, model, error = %e, "cost unavailable, recording 0");
                0.0
            })
    }

    /// Image cost of a call; 0 when the catalog cannot price it.
    pub(crate) fn image_cost(&self, provider: &str, model: &str, size: &str, count: u32) -> f64 {
        self.catalog
            .image_cost(provider, model, size, count)
            .unwrap_or_else(|e| {
                tracing::warn!(provider, model, error = %e, "cost unavailable, recording 0");
                0.0
            })
    }
}

/// Run one vendor call inside a `generate` span, wrapping its failure.
pub(crate) async fn instrumented<F>(
    provider: &'static str,
    kind: RequestKind,
    model: &str,
    call: F,
) -> Result<ModelResponse, LlmError>
where
    F: Future<Output = Result<ModelResponse, LlmError>>,
{
    let span = tracing::info_span!("generate", provider, kind = %kind, model);
    async move {
        match call.await {
            Ok(response) => {
                tracing::info!(
                    input_tokens = response.input_tokens(),
                    output_tokens = response.output_tokens(),
                    cost = response.cost(),
                    "generation complete"
                );
                Ok(response)
            }
            Err(err) => {
                let err = err.into_generation_error(provider);
                tracing::warn!(error = %err, kind = ?err.generation_kind(), "generation failed");
                Err(err)
            }
        }
    }
    .instrument(span)
    .await
}
