//! JSON-over-HTTP executor shared by all adapters.

use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::error::{LlmError, classify_http_error};

/// Posts a JSON body and returns the parsed JSON response.
///
/// Non-success statuses are classified from the provider's error envelope.
#[derive(Debug, Clone)]
pub struct HttpJsonExecutor {
    provider_id: &'static str,
    http_client: reqwest::Client,
}

impl HttpJsonExecutor {
    pub const fn new(provider_id: &'static str, http_client: reqwest::Client) -> Self {
        Self {
            provider_id,
            http_client,
        }
    }

    pub const fn provider_id(&self) -> &'static str {
        self.provider_id
    }

    pub async fn post_json(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &Value,
    ) -> Result<Value, LlmError> {
        tracing::debug!(provider = self.provider_id, url, "sending request");

        let resp = self
            .http_client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(classify_http_error(self.provider_id, status.as_u16(), &text));
        }

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            LlmError::ParseError(format!("Invalid JSON from {}: {e}", self.provider_id))
        })
    }
}
