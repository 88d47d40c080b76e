//! The uniform response envelope returned by every adapter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What the model produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ModelOutput {
    /// Generated text (chat / completion)
    Text(String),
    /// One vector per input text, in input order
    Embeddings(Vec<Vec<f32>>),
    /// Generated image URLs
    Images(Vec<String>),
}

impl ModelOutput {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The first embedding vector, for single-text requests.
    pub fn embedding(&self) -> Option<&[f32]> {
        match self {
            Self::Embeddings(vectors) => vectors.first().map(Vec::as_slice),
            _ => None,
        }
    }

    pub fn embeddings(&self) -> Option<&[Vec<f32>]> {
        match self {
            Self::Embeddings(vectors) => Some(vectors),
            _ => None,
        }
    }

    /// The first image URL, for single-image requests.
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Images(urls) => urls.first().map(String::as_str),
            _ => None,
        }
    }

    pub fn image_urls(&self) -> Option<&[String]> {
        match self {
            Self::Images(urls) => Some(urls),
            _ => None,
        }
    }
}

/// Comprehensive record of one model call.
///
/// Built once by an adapter and never mutated afterwards; fields are read
/// through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    provider: String,
    model: String,
    prompt: String,
    output: ModelOutput,
    input_tokens: u32,
    output_tokens: u32,
    total_tokens: u32,
    cost: f64,
    created_at: DateTime<Utc>,
    raw_response: Value,
    metadata: Map<String, Value>,
}

static_assertions::assert_impl_all!(ModelResponse: Send, Sync);

impl ModelResponse {
    pub(crate) fn builder(
        provider: impl Into<String>,
        model: impl Into<String>,
        output: ModelOutput,
    ) -> ModelResponseBuilder {
        ModelResponseBuilder {
            provider: provider.into(),
            model: model.into(),
            prompt: String::new(),
            output,
            input_tokens: 0,
            output_tokens: 0,
            cost: 0.0,
            raw_response: Value::Null,
            metadata: Map::new(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub const fn output(&self) -> &ModelOutput {
        &self.output
    }

    /// Shortcut for `output().text()`.
    pub fn text(&self) -> Option<&str> {
        self.output.text()
    }

    pub const fn input_tokens(&self) -> u32 {
        self.input_tokens
    }

    pub const fn output_tokens(&self) -> u32 {
        self.output_tokens
    }

    pub const fn total_tokens(&self) -> u32 {
        self.total_tokens
    }

    /// Estimated cost in USD, rounded to 4 decimals.
    pub const fn cost(&self) -> f64 {
        self.cost
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The provider payload as received.
    pub const fn raw_response(&self) -> &Value {
        &self.raw_response
    }

    /// The request options that were supplied.
    pub const fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
}

pub(crate) struct ModelResponseBuilder {
    provider: String,
    model: String,
    prompt: String,
    output: ModelOutput,
    input_tokens: u32,
    output_tokens: u32,
    cost: f64,
    raw_response: Value,
    metadata: Map<String, Value>,
}

impl ModelResponseBuilder {
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub const fn tokens(mut self, input: u32, output: u32) -> Self {
        self.input_tokens = input;
        self.output_tokens = output;
        self
    }

    pub const fn cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    pub fn raw_response(mut self, raw: Value) -> Self {
        self.raw_response = raw;
        self
    }

    pub fn metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn build(self) -> ModelResponse {
        ModelResponse {
            provider: self.provider,
            model: self.model,
            prompt: self.prompt,
            output: self.output,
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
            total_tokens: self.input_tokens.saturating_add(self.output_tokens),
            cost: self.cost,
            created_at: Utc::now(),
            raw_response: self.raw_response,
            metadata: self.metadata,
        }
    }
}
