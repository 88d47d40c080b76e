//! `OpenAI` chat completions

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use super::PROVIDER;
use super::client::{OpenAiClient, first_choice};
use super::config::OpenAiConfig;
use crate::defaults;
use crate::error::LlmError;
use crate::pricing::ModelType;
use crate::providers::{ProviderContext, instrumented};
use crate::traits::ModelProvider;
use crate::types::{GenerateRequest, ModelOutput, ModelResponse, RequestKind, Usage};

/// `POST /chat/completions`
#[derive(Debug, Clone)]
pub struct OpenAiChatProvider {
    client: OpenAiClient,
    model: String,
}

impl OpenAiChatProvider {
    pub fn new(config: OpenAiConfig, context: ProviderContext) -> Self {
        let model = context.resolve_model(
            config.model.clone(),
            PROVIDER,
            ModelType::Chat,
            defaults::models::OPENAI_CHAT,
        );
        Self {
            client: OpenAiClient::new(config, context),
            model,
        }
    }

    fn build_body(model: &str, request: &GenerateRequest) -> Value {
        let mut body = Map::new();
        body.insert("model".into(), json!(model));
        body.insert("messages".into(), json!(request.input.to_messages()));
        if let Some(n) = request.options.n {
            body.insert("n".into(), json!(n));
        }
        request.options.apply_to_body(&mut body);
        Value::Object(body)
    }

    async fn call(&self, model: &str, request: GenerateRequest) -> Result<ModelResponse, LlmError> {
        if request.input.is_empty() {
            return Err(LlmError::InvalidInput("chat request has no messages".to_string()));
        }
        let body = Self::build_body(model, &request);
        let raw = self.client.post("chat/completions", &body).await?;

        let text = first_choice(&raw)?
            .pointer("/message/content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let ctx = self.client.context();
        let usage = ctx.usage_or_count(
            Usage::from_openai(&raw),
            &request.input.texts(),
            &[text.as_str()],
        );
        let cost = ctx.token_cost(PROVIDER, model, usage.prompt_tokens, usage.completion_tokens);

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
impl ModelProvider for OpenAiChatProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn request_kind(&self) -> RequestKind {
        RequestKind::Chat
    }

    fn validate_api_key(&self) -> bool {
        self.client.config().has_api_key()
    }

    async fn generate(&self, request: GenerateRequest) -> Result<ModelResponse, LlmError> {
        let model = request.options.model.clone().unwrap_or_else(|| self.model.clone());
        instrumented(PROVIDER, RequestKind::Chat, &model, self.call(&model, request)).await
    }
}
