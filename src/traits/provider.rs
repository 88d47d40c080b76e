//! The adapter trait every provider/modality pair implements.

use async_trait::async_trait;

use crate::error::LlmError;
use crate::types::{GenerateRequest, ModelResponse, RequestKind};

/// One vendor endpoint behind a uniform call.
///
/// Implementations perform exactly one HTTP request per `generate` call and
/// wrap any failure of it into [`LlmError::Generation`].
#[async_trait]
pub trait ModelProvider: Send + Sync + std::fmt::Debug {
    /// Provider name as used in the pricing catalog (`"openai"`, `"anthropic"`).
    fn provider_name(&self) -> &'static str;

    /// The model this adapter calls unless a request overrides it.
    fn model(&self) -> &str;

    fn request_kind(&self) -> RequestKind;

    /// Whether a non-empty API key is configured. No network call is made.
    fn validate_api_key(&self) -> bool;

    async fn generate(&self, request: GenerateRequest) -> Result<ModelResponse, LlmError>;
}
