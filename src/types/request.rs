//! Request types shared by every adapter.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The four request shapes the gateway normalizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Chat,
    Completion,
    Embedding,
    Image,
}

impl RequestKind {
    pub const ALL: [Self; 4] = [Self::Chat, Self::Completion, Self::Embedding, Self::Image];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Completion => "completion",
            Self::Embedding => "embedding",
            Self::Image => "image",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestKind {
    type Err = crate::error::LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chat" => Ok(Self::Chat),
            "completion" | "completions" => Ok(Self::Completion),
            "embedding" | "embeddings" => Ok(Self::Embedding),
            "image" | "images" => Ok(Self::Image),
            other => Err(crate::error::LlmError::InvalidInput(format!(
                "Unsupported request type: {other}"
            ))),
        }
    }
}

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// What the caller asks the model about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromptInput {
    /// A plain prompt.
    Text(String),
    /// A conversation.
    Messages(Vec<ChatMessage>),
    /// Several independent texts (embedding batches).
    Batch(Vec<String>),
}

impl PromptInput {
    /// Chat messages for this input; a plain prompt becomes one user message.
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        match self {
            Self::Text(text) => vec![ChatMessage::user(text.clone())],
            Self::Messages(messages) => messages.clone(),
            Self::Batch(texts) => texts.iter().cloned().map(ChatMessage::user).collect(),
        }
    }

    /// The individual texts carried by this input.
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Self::Text(text) => vec![text.as_str()],
            Self::Messages(messages) => messages.iter().map(|m| m.content.as_str()).collect(),
            Self::Batch(texts) => texts.iter().map(String::as_str).collect(),
        }
    }

    /// Render the input as the prompt string recorded on the response.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Messages(messages) => serde_json::to_string(messages).unwrap_or_default(),
            Self::Batch(texts) => serde_json::to_string(texts).unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Messages(messages) => messages.is_empty(),
            Self::Batch(texts) => texts.is_empty(),
        }
    }
}

impl From<&str> for PromptInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PromptInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<ChatMessage>> for PromptInput {
    fn from(value: Vec<ChatMessage>) -> Self {
        Self::Messages(value)
    }
}

impl From<Vec<String>> for PromptInput {
    fn from(value: Vec<String>) -> Self {
        Self::Batch(value)
    }
}

/// Options a caller may pass along with a prompt.
///
/// Only the options that are set end up in the vendor request body and in
/// the response metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Model override for this call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    /// Number of images to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    /// Image resolution, e.g. `1024x1024`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Provider-specific fields merged verbatim into the request body
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub const fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub const fn with_n(mut self, n: u32) -> Self {
        self.n = Some(n);
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// The supplied options as a JSON object.
    pub fn to_metadata(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Write the sampling options into a vendor request body.
    ///
    /// `model`, `n` and `size` are adapter-specific and are not written here.
    /// Extra fields come last so callers can override anything.
    pub(crate) fn apply_to_body(&self, body: &mut Map<String, Value>) {
        if let Some(t) = self.temperature {
            body.insert("temperature".into(), Value::from(t));
        }
        if let Some(max) = self.max_tokens {
            body.insert("max_tokens".into(), Value::from(max));
        }
        if let Some(p) = self.top_p {
            body.insert("top_p".into(), Value::from(p));
        }
        if let Some(stop) = &self.stop {
            body.insert("stop".into(), Value::from(stop.clone()));
        }
        if let Some(user) = &self.user {
            body.insert("user".into(), Value::from(user.clone()));
        }
        for (k, v) in &self.extra {
            body.insert(k.clone(), v.clone());
        }
    }
}

/// A single call to an adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub input: PromptInput,
    #[serde(default)]
    pub options: GenerateOptions,
}

impl GenerateRequest {
    pub fn new(input: impl Into<PromptInput>) -> Self {
        Self {
            input: input.into(),
            options: GenerateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }
}

impl From<PromptInput> for GenerateRequest {
    fn from(value: PromptInput) -> Self {
        Self::new(value)
    }
}

impl From<&str> for GenerateRequest {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for GenerateRequest {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Vec<ChatMessage>> for GenerateRequest {
    fn from(value: Vec<ChatMessage>) -> Self {
        Self::new(value)
    }
}
