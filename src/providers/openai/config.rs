//! `OpenAI` configuration

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::defaults::endpoints::OPENAI_BASE_URL;
use crate::error::LlmError;

/// Credentials and endpoint settings for the `OpenAI` adapters.
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub organization: Option<String>,
    pub project: Option<String>,
    /// Model for the adapter; resolved from the pricing catalog when unset
    pub model: Option<String>,
    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: OPENAI_BASE_URL.to_string(),
            organization: None,
            project: None,
            model: None,
            headers: HashMap::new(),
        }
    }

    /// Configuration from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| LlmError::MissingApiKey("OpenAI API key not provided".to_string()))?;
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("base_url", &self.base_url)
            .field("has_organization", &self.organization.is_some())
            .field("has_project", &self.project.is_some())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_key() {
        let cfg = OpenAiConfig::new("sk-very-secret").with_organization("org-x");
        let printed = format!("{cfg:?}");
        assert!(!printed.contains("sk-very-secret"));
        assert!(!printed.contains("org-x"));
        assert!(cfg.has_api_key());
        assert!(!OpenAiConfig::new("").has_api_key());
    }
}
