//! Request plumbing shared by the `OpenAI` adapters.

use secrecy::ExposeSecret;
use serde_json::Value;

use super::PROVIDER;
use super::config::OpenAiConfig;
use crate::error::LlmError;
use crate::executors::HttpJsonExecutor;
use crate::providers::ProviderContext;
use crate::utils::ProviderHeaders;

#[derive(Debug, Clone)]
pub(crate) struct OpenAiClient {
    config: OpenAiConfig,
    executor: HttpJsonExecutor,
    context: ProviderContext,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig, context: ProviderContext) -> Self {
        let executor = HttpJsonExecutor::new(PROVIDER, context.http_client().clone());
        Self {
            config,
            executor,
            context,
        }
    }

    pub const fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    pub const fn context(&self) -> &ProviderContext {
        &self.context
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// POST `body` to `{base_url}/{path}`.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, LlmError> {
        if !self.config.has_api_key() {
            return Err(LlmError::MissingApiKey(
                "OpenAI API key not provided".to_string(),
            ));
        }
        let headers = ProviderHeaders::openai(
            self.config.api_key.expose_secret(),
            self.config.organization.as_deref(),
            self.config.project.as_deref(),
            &self.config.headers,
        )?;
        self.executor.post_json(&self.url(path), headers, body).await
    }
}

/// `choices[0]` of a completion-style response.
pub(crate) fn first_choice(raw: &Value) -> Result<&Value, LlmError> {
    raw.get("choices")
        .and_then(|c| c.get(0))
        .ok_or_else(|| LlmError::ParseError("response has no choices".to_string()))
}
