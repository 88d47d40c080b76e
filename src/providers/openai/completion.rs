//! `OpenAI` legacy text completions

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
use crate::types::{GenerateRequest, ModelOutput, ModelResponse, PromptInput, RequestKind, Usage};

/// `POST /completions`
#[derive(Debug, Clone)]
pub struct OpenAiCompletionProvider {
    client: OpenAiClient,
    model: String,
}

impl OpenAiCompletionProvider {
    pub fn new(config: OpenAiConfig, context: ProviderContext) -> Self {
        let model = context.resolve_model(
            config.model.clone(),
            PROVIDER,
            ModelType::Completion,
            defaults::models::OPENAI_COMPLETION,
        );
        Self {
            client: OpenAiClient::new(config, context),
            model,
        }
    }

    /// The prompt as sent to the endpoint: messages are joined line by line.
    fn prompt_text(input: &PromptInput) -> String {
        match input {
            PromptInput::Text(text) => text.clone(),
            other => other.texts().join("\n"),
        }
    }

    fn build_body(model: &str, prompt: &str, request: &GenerateRequest) -> Value {
        let mut body = Map::new();
        body.insert("model".into(), json!(model));
        body.insert("prompt".into(), json!(prompt));
        body.insert(
            "max_tokens".into(),
            json!(defaults::params::COMPLETION_MAX_TOKENS),
        );
        request.options.apply_to_body(&mut body);
        Value::Object(body)
    }

    async fn call(&self, model: &str, request: GenerateRequest) -> Result<ModelResponse, LlmError> {
        let prompt = Self::prompt_text(&request.input);
        if prompt.is_empty() {
            return Err(LlmError::InvalidInput("completion prompt is empty".to_string()));
        }
        let body = Self::build_body(model, &prompt, &request);
        let raw = self.client.post("completions", &body).await?;

        let text = first_choice(&raw)?
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string();

        let ctx = self.client.context();
        let usage = ctx.usage_or_count(Usage::from_openai(&raw), &[prompt.as_str()], &[text.as_str()]);
        let cost = ctx.token_cost(PROVIDER, model, usage.prompt_tokens, usage.completion_tokens);

        Ok(ModelResponse::builder(PROVIDER, model, ModelOutput::Text(text))
            .prompt(prompt)
            .tokens(usage.prompt_tokens, usage.completion_tokens)
            .cost(cost)
            .metadata(request.options.to_metadata())
            .raw_response(raw)
            .build())
    }
}

#[async_trait]
impl ModelProvider for OpenAiCompletionProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn request_kind(&self) -> RequestKind {
        RequestKind::Completion
    }

    fn validate_api_key(&self) -> bool {
        self.client.config().has_api_key()
    }

    async fn generate(&self, request: GenerateRequest) -> Result<ModelResponse, LlmError> {
        let model = request.options.model.clone().unwrap_or_else(|| self.model.clone());
        instrumented(PROVIDER, RequestKind::Completion, &model, self.call(&model, request)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatMessage, GenerateOptions};

    #[test]
    fn default_max_tokens_can_be_overridden() {
        let request = GenerateRequest::new("Write a haiku");
        let body = OpenAiCompletionProvider::build_body("m", "Write a haiku", &request);
        assert_eq!(body["max_tokens"], 100);

        let request = request.with_options(GenerateOptions::new().with_max_tokens(12));
        let body = OpenAiCompletionProvider::build_body("m", "Write a haiku", &request);
        assert_eq!(body["max_tokens"], 12);
    }

    #[test]
    fn messages_are_joined_into_one_prompt() {
        let input = PromptInput::from(vec![ChatMessage::system("Be brief"), ChatMessage::user("Hi")]);
        assert_eq!(OpenAiCompletionProvider::prompt_text(&input), "Be brief\nHi");
    }
}
