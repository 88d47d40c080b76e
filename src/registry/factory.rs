//! Adapter construction keyed by provider and request kind.

use std::sync::Arc;

use super::ProviderType;
use crate::config::GatewayConfig;
use crate::error::LlmError;
use crate::pricing::PricingCatalog;
use crate::providers::ProviderContext;
use crate::tokens::{TokenCounter, WhitespaceTokenCounter};
use crate::traits::ModelProvider;
use crate::types::{HttpConfig, RequestKind};
use crate::utils::build_http_client;

/// Builds [`ModelProvider`] adapters that share one pricing catalog.
///
/// ```rust,ignore
/// let catalog = Arc::new(PricingCatalog::with_defaults());
/// let factory = ProviderFactory::new(catalog);
/// let chat = factory.create("openai", RequestKind::Chat, api_key, None)?;
/// let response = chat.generate("Explain artificial intelligence".into()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProviderFactory {
    catalog: Arc<PricingCatalog>,
    http_client: Option<reqwest::Client>,
    http_config: HttpConfig,
    token_counter: Arc<dyn TokenCounter>,
}

impl ProviderFactory {
    pub fn new(catalog: Arc<PricingCatalog>) -> Self {
        Self {
            catalog,
            http_client: None,
            http_config: HttpConfig::default(),
            token_counter: Arc::new(WhitespaceTokenCounter),
        }
    }

    /// Use this client for every adapter instead of building one.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Settings for the client built when none was supplied.
    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.http_config = config;
        self
    }

    pub fn with_token_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.token_counter = counter;
        self
    }

    pub fn catalog(&self) -> &Arc<PricingCatalog> {
        &self.catalog
    }

    /// Request kinds served by `provider`; empty for an unknown provider.
    pub fn supported_kinds(provider: &str) -> Vec<RequestKind> {
        provider
            .parse::<ProviderType>()
            .map(ProviderType::supported_kinds)
            .unwrap_or_default()
    }

    /// Build the adapter for `provider` and `kind`.
    ///
    /// Without an explicit `model` the adapter picks the latest active model
    /// of the matching type from the catalog.
    pub fn create(
        &self,
        provider: &str,
        kind: RequestKind,
        api_key: impl Into<String>,
        model: Option<String>,
    ) -> Result<Box<dyn ModelProvider>, LlmError> {
        let provider: ProviderType = provider.parse()?;
        let context = self.context(&self.http_config)?;
        self.build(provider, kind, api_key.into(), None, model, context)
    }

    /// Build an adapter with the key and endpoint of `config`.
    pub fn from_config(
        &self,
        config: &GatewayConfig,
        provider: &str,
        kind: RequestKind,
        model: Option<String>,
    ) -> Result<Box<dyn ModelProvider>, LlmError> {
        let provider: ProviderType = provider.parse()?;
        let api_key = config.api_key(provider).ok_or_else(|| {
            LlmError::MissingApiKey(format!("No API key configured for {provider}"))
        })?;
        let context = self.context(&config.http)?;
        self.build(
            provider,
            kind,
            api_key.to_string(),
            Some(config.base_url(provider)),
            model,
            context,
        )
    }

    fn context(&self, http_config: &HttpConfig) -> Result<ProviderContext, LlmError> {
        let client = match &self.http_client {
            Some(client) => client.clone(),
            None => build_http_client(http_config)?,
        };
        Ok(ProviderContext::new(self.catalog.clone(), client)
            .with_token_counter(self.token_counter.clone()))
    }

    fn build(
        &self,
        provider: ProviderType,
        kind: RequestKind,
        api_key: String,
        base_url: Option<&str>,
        model: Option<String>,
        context: ProviderContext,
    ) -> Result<Box<dyn ModelProvider>, LlmError> {
        if !provider.supports(kind) {
            return Err(LlmError::UnsupportedOperation(format!(
                "{provider} does not support {kind} requests"
            )));
        }
        let adapter = match provider {
            ProviderType::OpenAi => build_openai(kind, api_key, base_url, model, context)?,
            ProviderType::Anthropic => build_anthropic(kind, api_key, base_url, model, context)?,
        };
        tracing::debug!(
            provider = %provider,
            kind = %kind,
            model = adapter.model(),
            "created adapter"
        );
        Ok(adapter)
    }
}

#[cfg(feature = "openai")]
fn build_openai(
    kind: RequestKind,
    api_key: String,
    base_url: Option<&str>,
    model: Option<String>,
    context: ProviderContext,
) -> Result<Box<dyn ModelProvider>, LlmError> {
    use crate::providers::openai::*;

    let mut config = OpenAiConfig::new(api_key);
    if let Some(url) = base_url {
        config = config.with_base_url(url);
    }
    config.model = model;

    Ok(match kind {
        RequestKind::Chat => Box::new(OpenAiChatProvider::new(config, context)),
        RequestKind::Completion => Box::new(OpenAiCompletionProvider::new(config, context)),
        RequestKind::Embedding => Box::new(OpenAiEmbeddingProvider::new(config, context)),
        RequestKind::Image => Box::new(OpenAiImageProvider::new(config, context)),
    })
}

#[cfg(not(feature = "openai"))]
fn build_openai(
    _kind: RequestKind,
    _api_key: String,
    _base_url: Option<&str>,
    _model: Option<String>,
    _context: ProviderContext,
) -> Result<Box<dyn ModelProvider>, LlmError> {
    Err(LlmError::UnsupportedOperation(
        "the `openai` feature is disabled".to_string(),
    ))
}

#[cfg(feature = "anthropic")]
fn build_anthropic(
    kind: RequestKind,
    api_key: String,
    base_url: Option<&str>,
    model: Option<String>,
    context: ProviderContext,
) -> Result<Box<dyn ModelProvider>, LlmError> {
    use crate::providers::anthropic::*;

    let mut config = AnthropicConfig::new(api_key);
    if let Some(url) = base_url {
        config = config.with_base_url(url);
    }
    config.model = model;

    Ok(Box::new(
        AnthropicChatProvider::new(config, context).with_request_kind(kind)?,
    ))
}

#[cfg(not(feature = "anthropic"))]
fn build_anthropic(
    _kind: RequestKind,
    _api_key: String,
    _base_url: Option<&str>,
    _model: Option<String>,
    _context: ProviderContext,
) -> Result<Box<dyn ModelProvider>, LlmError> {
    Err(LlmError::UnsupportedOperation(
        "the `anthropic` feature is disabled".to_string(),
    ))
}
