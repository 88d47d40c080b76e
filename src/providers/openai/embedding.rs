//! `OpenAI` embeddings

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use super::PROVIDER;
use super::client::OpenAiClient;
use super::config::OpenAiConfig;
use crate::defaults;
use crate::error::LlmError;
use crate::pricing::ModelType;
use crate::providers::{ProviderContext, instrumented};
use crate::traits::ModelProvider;
use crate::types::{GenerateRequest, ModelOutput, ModelResponse, PromptInput, RequestKind, Usage};

/// `POST /embeddings`
///
/// Embeddings produce no output tokens; the cost covers input tokens only.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingProvider {
    client: OpenAiClient,
    model: String,
}

impl OpenAiEmbeddingProvider {
    pub fn new(config: OpenAiConfig, context: ProviderContext) -> Self {
        let model = context.resolve_model(
            config.model.clone(),
            PROVIDER,
            ModelType::Embedding,
            defaults::models::OPENAI_EMBEDDING,
        );
        Self {
            client: OpenAiClient::new(config, context),
            model,
        }
    }

    fn build_body(model: &str, request: &GenerateRequest) -> Value {
        let input = match &request.input {
            PromptInput::Text(text) => json!(text),
            other => json!(other.texts()),
        };
        let mut body = Map::new();
        body.insert("model".into(), json!(model));
        body.insert("input".into(), input);
        if let Some(user) = &request.options.user {
            body.insert("user".into(), json!(user));
        }
        for (k, v) in &request.options.extra {
            body.insert(k.clone(), v.clone());
        }
        Value::Object(body)
    }

    /// Vectors of `data[]`, ordered by their `index`.
    fn parse_vectors(raw: &Value) -> Result<Vec<Vec<f32>>, LlmError> {
        let data = raw
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| LlmError::ParseError("embedding response has no data".to_string()))?;

        let mut indexed = data
            .iter()
            .enumerate()
            .map(|(pos, item)| -> Result<(u64, Vec<f32>), LlmError> {
                let index = item
                    .get("index")
                    .and_then(Value::as_u64)
                    .unwrap_or(pos as u64);
                let vector = item
                    .get("embedding")
                    .and_then(Value::as_array)
                    .ok_or_else(|| LlmError::ParseError("embedding item has no vector".to_string()))?
                    .iter()
                    .map(|x| x.as_f64().unwrap_or_default() as f32)
                    .collect::<Vec<f32>>();
                Ok((index, vector))
            })
            .collect::<Result<Vec<_>, _>>()?;

        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, v)| v).collect())
    }

    async fn call(&self, model: &str, request: GenerateRequest) -> Result<ModelResponse, LlmError> {
        if request.input.is_empty() {
            return Err(LlmError::InvalidInput("embedding input is empty".to_string()));
        }
        let body = Self::build_body(model, &request);
        let raw = self.client.post("embeddings", &body).await?;
        let vectors = Self::parse_vectors(&raw)?;

        let ctx = self.client.context();
        let usage = ctx.usage_or_count(Usage::from_openai(&raw), &request.input.texts(), &[]);
        let input_tokens = usage.prompt_tokens;
        let cost = ctx.token_cost(PROVIDER, model, input_tokens, 0);

        Ok(ModelResponse::builder(PROVIDER, model, ModelOutput::Embeddings(vectors))
            .prompt(request.input.render())
            .tokens(input_tokens, 0)
            .cost(cost)
            .metadata(request.options.to_metadata())
            .raw_response(raw)
            .build())
    }
}

#[async_trait]
impl ModelProvider for OpenAiEmbeddingProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn request_kind(&self) -> RequestKind {
        RequestKind::Embedding
    }

    fn validate_api_key(&self) -> bool {
        self.client.config().has_api_key()
    }

    async fn generate(&self, request: GenerateRequest) -> Result<ModelResponse, LlmError> {
        let model = request.options.model.clone().unwrap_or_else(|| self.model.clone());
        instrumented(PROVIDER, RequestKind::Embedding, &model, self.call(&model, request)).await
    }
}
