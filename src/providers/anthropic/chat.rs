//! Anthropic Messages API

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{Map, Value, json};

use super::PROVIDER;
use super::config::AnthropicConfig;
use crate::defaults;
use crate::error::LlmError;
use crate::executors::HttpJsonExecutor;
use crate::pricing::ModelType;
use crate::providers::{ProviderContext, instrumented};
use crate::traits::ModelProvider;
use crate::types::{
    GenerateRequest, MessageRole, ModelOutput, ModelResponse, PromptInput, RequestKind, Usage,
};
use crate::utils::ProviderHeaders;

/// `POST /v1/messages`
///
/// Serves both chat and plain-prompt completion requests; a text prompt is
/// sent as a single user message.
#[derive(Debug, Clone)]
pub struct AnthropicChatProvider {
    config: AnthropicConfig,
    executor: HttpJsonExecutor,
    context: ProviderContext,
    model: String,
    kind: RequestKind,
}

impl AnthropicChatProvider {
    pub fn new(config: AnthropicConfig, context: ProviderContext) -> Self {
        let model = context.resolve_model(
            config.model.clone(),
            PROVIDER,
            ModelType::Chat,
            defaults::models::ANTHROPIC_CHAT,
        );
        let executor = HttpJsonExecutor::new(PROVIDER, context.http_client().clone());
        Self {
            config,
            executor,
            context,
            model,
            kind: RequestKind::Chat,
        }
    }

    /// Report `kind` from [`ModelProvider::request_kind`].
    ///
    /// Only `Chat` and `Completion` are served by the Messages API.
    pub fn with_request_kind(mut self, kind: RequestKind) -> Result<Self, LlmError> {
        match kind {
            RequestKind::Chat | RequestKind::Completion => {
                self.kind = kind;
                Ok(self)
            }
            other => Err(LlmError::UnsupportedOperation(format!(
                "Anthropic does not support {other} requests"
            ))),
        }
    }

    fn build_body(model: &str, request: &GenerateRequest) -> Value {
        let messages = request.input.to_messages();
        let system = messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let conversation: Vec<Value> = messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| json!({"role": m.role, "content": m.content}))
            .collect();

        let options = &request.options;
        let mut body = Map::new();
        body.insert("model".into(), json!(model));
        body.insert(
            "max_tokens".into(),
            json!(options.max_tokens.unwrap_or(defaults::params::ANTHROPIC_MAX_TOKENS)),
        );
        body.insert("messages".into(), Value::Array(conversation));
        if !system.is_empty() {
            body.insert("system".into(), json!(system));
        }
        if let Some(t) = options.temperature {
            body.insert("temperature".into(), json!(t));
        }
        if let Some(p) = options.top_p {
            body.insert("top_p".into(), json!(p));
        }
        if let Some(stop) = &options.stop {
            body.insert("stop_sequences".into(), json!(stop));
        }
        if let Some(user) = &options.user {
            body.insert("metadata".into(), json!({"user_id": user}));
        }
        for (k, v) in &options.extra {
            body.insert(k.clone(), v.clone());
        }
        Value::Object(body)
    }

    /// Concatenated `text` blocks of `content[]`.
    fn parse_text(raw: &Value) -> Result<String, LlmError> {
        let blocks = raw
            .get("content")
            .and_then(Value::as_array)
            .ok_or_else(|| LlmError::ParseError("message response has no content".to_string()))?;
        Ok(blocks
            .iter()
            .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|b| b.get("text").and_then(Value::as_str))
            .collect())
    }

    /// The Messages API rejects a request whose only content is the system prompt.
    fn has_conversation(input: &PromptInput) -> bool {
        match input {
            PromptInput::Messages(messages) => {
                messages.iter().any(|m| m.role != MessageRole::System)
            }
            _ => true,
        }
    }

    async fn call(&self, model: &str, request: GenerateRequest) -> Result<ModelResponse, LlmError> {
        if request.input.is_empty() {
            return Err(LlmError::InvalidInput("message request is empty".to_string()));
        }
        if !Self::has_conversation(&request.input) {
            return Err(LlmError::InvalidInput(
                "message request needs at least one user or assistant message".to_string(),
            ));
        }
        if !self.config.has_api_key() {
            return Err(LlmError::MissingApiKey(
                "Anthropic API key not provided".to_string(),
            ));
        }
        let headers =
            ProviderHeaders::anthropic(self.config.api_key.expose_secret(), &self.config.headers)?;
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));
        let body = Self::build_body(model, &request);
        let raw = self.executor.post_json(&url, headers, &body).await?;
        let text = Self::parse_text(&raw)?;

        let usage = self.context.usage_or_count(
            Usage::from_anthropic(&raw),
            &request.input.texts(),
            &[text.as_str()],
        );
        let cost = self
            .context
            .token_cost(PROVIDER, model, usage.prompt_tokens, usage.completion_tokens);

        Ok(ModelResponse::builder(PROVIDER, model, ModelOutput::Text(text))
            .prompt(request.input.render())
            .tokens(usage.prompt_tokens, usage.completion_tokens)
            .cost(cost)
            .metadata(request.options.to_metadata())
            .raw_response(raw)
            .build())
    }
}

#[async_trait]
impl ModelProvider for AnthropicChatProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn request_kind(&self) -> RequestKind {
        self.kind
    }

    fn validate_api_key(&self) -> bool {
        self.config.has_api_key()
    }

    async fn generate(&self, request: GenerateRequest) -> Result<ModelResponse, LlmError> {
        let model = request.options.model.clone().unwrap_or_else(|| self.model.clone());
        instrumented(PROVIDER, self.kind, &model, self.call(&model, request)).await
    }
}
