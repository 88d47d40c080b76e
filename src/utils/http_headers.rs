//! HTTP Headers Utility
//!
//! Builds the per-request headers of each provider.

use crate::defaults::endpoints::ANTHROPIC_VERSION;
use crate::error::LlmError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

/// HTTP header builder for API requests
#[derive(Debug, Default)]
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add Bearer token authorization
    pub fn with_bearer_auth(mut self, token: &str) -> Result<Self, LlmError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            LlmError::ConfigurationError("Invalid API key format".to_string())
        })?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    /// Add a key-style authorization header (e.g. `x-api-key`)
    pub fn with_api_key_header(mut self, header_name: &str, key: &str) -> Result<Self, LlmError> {
        let name = parse_name(header_name)?;
        let mut value = HeaderValue::from_str(key).map_err(|_| {
            LlmError::ConfigurationError("Invalid API key format".to_string())
        })?;
        value.set_sensitive(true);
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn with_json_content_type(mut self) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self
    }

    /// Add a custom header
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, LlmError> {
        let header_name = parse_name(name)?;
        self.headers.insert(header_name, parse_value(value)?);
        Ok(self)
    }

    /// Add multiple custom headers
    pub fn with_custom_headers(
        mut self,
        custom_headers: &HashMap<String, String>,
    ) -> Result<Self, LlmError> {
        for (key, value) in custom_headers {
            self = self.with_header(key, value)?;
        }
        Ok(self)
    }

    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

fn parse_name(name: &str) -> Result<HeaderName, LlmError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| LlmError::ConfigurationError(format!("Invalid header name '{name}': {e}")))
}

fn parse_value(value: &str) -> Result<HeaderValue, LlmError> {
    HeaderValue::from_str(value)
        .map_err(|e| LlmError::ConfigurationError(format!("Invalid header value '{value}': {e}")))
}

/// Provider-specific header builders
pub struct ProviderHeaders;

impl ProviderHeaders {
    /// Headers for the OpenAI API
    pub fn openai(
        api_key: &str,
        organization: Option<&str>,
        project: Option<&str>,
        custom_headers: &HashMap<String, String>,
    ) -> Result<HeaderMap, LlmError> {
        let mut builder = HttpHeaderBuilder::new()
            .with_bearer_auth(api_key)?
            .with_json_content_type();

        if let Some(org) = organization {
            builder = builder.with_header("OpenAI-Organization", org)?;
        }
        if let Some(proj) = project {
            builder = builder.with_header("OpenAI-Project", proj)?;
        }

        Ok(builder.with_custom_headers(custom_headers)?.build())
    }

    /// Headers for the Anthropic Messages API
    pub fn anthropic(
        api_key: &str,
        custom_headers: &HashMap<String, String>,
    ) -> Result<HeaderMap, LlmError> {
        let builder = HttpHeaderBuilder::new()
            .with_api_key_header("x-api-key", api_key)?
            .with_json_content_type()
            .with_header("anthropic-version", ANTHROPIC_VERSION)?
            .with_custom_headers(custom_headers)?;
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_headers_carry_bearer_and_org() {
        let headers =
            ProviderHeaders::openai("sk-test", Some("org-1"), None, &HashMap::new()).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer sk-test");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
        assert_eq!(headers.get("OpenAI-Organization").unwrap(), "org-1");
        assert!(headers.get("OpenAI-Project").is_none());
    }

    #[test]
    fn anthropic_headers_use_api_key_and_version() {
        let custom = HashMap::from([("anthropic-beta".to_string(), "tools-2024".to_string())]);
        let headers = ProviderHeaders::anthropic("ak-test", &custom).unwrap();
        assert_eq!(headers.get("x-api-key").unwrap(), "ak-test");
        assert_eq!(headers.get("anthropic-version").unwrap(), "2023-06-01");
        assert_eq!(headers.get("anthropic-beta").unwrap(), "tools-2024");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn invalid_key_does_not_echo_secret() {
        let err = ProviderHeaders::openai("bad\nkey", None, None, &HashMap::new()).unwrap_err();
        assert!(!err.to_string().contains("bad"));
    }
}
