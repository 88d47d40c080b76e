//! `OpenAI` image generation

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
use crate::types::{GenerateRequest, ModelOutput, ModelResponse, PromptInput, RequestKind};

const DALL_E_3: &str = "dall-e-3";
const DALL_E_3_SIZES: [&str; 3] = ["1024x1024", "1792x1024", "1024x1792"];

/// `POST /images/generations`
///
/// Priced per image; token counts are always 0.
#[derive(Debug, Clone)]
pub struct OpenAiImageProvider {
    client: OpenAiClient,
    model: String,
}

/// Image count and size actually requested.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ImageParams {
    n: u32,
    size: String,
}

impl ImageParams {
    fn resolve(model: &str, request: &GenerateRequest) -> Self {
        let n = request.options.n.unwrap_or(1).max(1);
        let size = request
            .options
            .size
            .clone()
            .unwrap_or_else(|| defaults::params::IMAGE_SIZE.to_string());

        if model == DALL_E_3 {
            let size = if DALL_E_3_SIZES.contains(&size.as_str()) {
                size
            } else {
                defaults::params::IMAGE_SIZE.to_string()
            };
            return Self { n: 1, size };
        }
        Self { n, size }
    }
}

impl OpenAiImageProvider {
    pub fn new(config: OpenAiConfig, context: ProviderContext) -> Self {
        let model = context.resolve_model(
            config.model.clone(),
            PROVIDER,
            ModelType::Image,
            defaults::models::OPENAI_IMAGE,
        );
        Self {
            client: OpenAiClient::new(config, context),
            model,
        }
    }

    fn prompt_text(input: &PromptInput) -> String {
        match input {
            PromptInput::Text(text) => text.clone(),
            other => other.texts().join("\n"),
        }
    }

    fn build_body(model: &str, prompt: &str, params: &ImageParams, request: &GenerateRequest) -> Value {
        let mut body = Map::new();
        body.insert("model".into(), json!(model));
        body.insert("prompt".into(), json!(prompt));
        body.insert("n".into(), json!(params.n));
        body.insert("size".into(), json!(params.size));
        if let Some(user) = &request.options.user {
            body.insert("user".into(), json!(user));
        }
        for (k, v) in &request.options.extra {
            if k != "n" && k != "size" {
                body.insert(k.clone(), v.clone());
            }
        }
        Value::Object(body)
    }

    fn parse_urls(raw: &Value) -> Result<Vec<String>, LlmError> {
        let data = raw
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| LlmError::ParseError("image response has no data".to_string()))?;
        Ok(data
            .iter()
            .filter_map(|item| item.get("url").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }

    async fn call(&self, model: &str, request: GenerateRequest) -> Result<ModelResponse, LlmError> {
        let prompt = Self::prompt_text(&request.input);
        if prompt.is_empty() {
            return Err(LlmError::InvalidInput("image prompt is empty".to_string()));
        }
        let params = ImageParams::resolve(model, &request);
        let body = Self::build_body(model, &prompt, &params, &request);
        let raw = self.client.post("images/generations", &body).await?;
        let urls = Self::parse_urls(&raw)?;

        let cost = self
            .client
            .context()
            .image_cost(PROVIDER, model, &params.size, params.n);

        let mut metadata = request.options.to_metadata();
        metadata.insert("size".into(), json!(params.size));
        metadata.insert("num_images".into(), json!(params.n));

        Ok(ModelResponse::builder(PROVIDER, model, ModelOutput::Images(urls))
            .prompt(prompt)
            .cost(cost)
            .metadata(metadata)
            .raw_response(raw)
            .build())
    }
}

#[async_trait]
impl ModelProvider for OpenAiImageProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn request_kind(&self) -> RequestKind {
        RequestKind::Image
    }

    fn validate_api_key(&self) -> bool {
        self.client.config().has_api_key()
    }

    async fn generate(&self, request: GenerateRequest) -> Result<ModelResponse, LlmError> {
        let model = request.options.model.clone().unwrap_or_else(|| self.model.clone());
        instrumented(PROVIDER, RequestKind::Image, &model, self.call(&model, request)).await
    }
}
