//! Gateway configuration from the environment.
//!
//! | variable                 | meaning                                   |
//! |--------------------------|-------------------------------------------|
//! | `OPENAI_API_KEY`         | OpenAI API key                            |
//! | `ANTHROPIC_API_KEY`      | Anthropic API key                         |
//! | `OPENAI_BASE_URL`        | OpenAI endpoint override                  |
//! | `ANTHROPIC_BASE_URL`     | Anthropic endpoint override               |
//! | `COSTGATE_PRICING_FILE`  | JSON pricing table replacing the built-in |
//! | `COSTGATE_TIMEOUT_SECS`  | request timeout in seconds                |

use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use std::time::Duration;

use crate::defaults::endpoints;
use crate::error::LlmError;
use crate::pricing::PricingCatalog;
use crate::registry::ProviderType;
use crate::types::HttpConfig;

/// Keys, endpoints and HTTP settings for all providers.
#[derive(Clone, Default)]
pub struct GatewayConfig {
    pub openai_api_key: Option<SecretString>,
    pub anthropic_api_key: Option<SecretString>,
    pub openai_base_url: Option<String>,
    pub anthropic_base_url: Option<String>,
    pub pricing_file: Option<PathBuf>,
    pub http: HttpConfig,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |key: &Option<SecretString>| key.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("GatewayConfig")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("openai_base_url", &self.openai_base_url)
            .field("anthropic_base_url", &self.anthropic_base_url)
            .field("pricing_file", &self.pricing_file)
            .field("http", &self.http)
            .finish()
    }
}

impl GatewayConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut http = HttpConfig::default();
        if let Some(raw) = get("COSTGATE_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                LlmError::ConfigurationError(format!(
                    "COSTGATE_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ))
            })?;
            http.timeout = Some(Duration::from_secs(secs));
        }

        Ok(Self {
            openai_api_key: get("OPENAI_API_KEY").map(SecretString::from),
            anthropic_api_key: get("ANTHROPIC_API_KEY").map(SecretString::from),
            openai_base_url: get("OPENAI_BASE_URL"),
            anthropic_base_url: get("ANTHROPIC_BASE_URL"),
            pricing_file: get("COSTGATE_PRICING_FILE").map(PathBuf::from),
            http,
        })
    }

    pub fn with_api_key(mut self, provider: ProviderType, key: impl Into<String>) -> Self {
        let key = Some(SecretString::from(key.into()));
        match provider {
            ProviderType::OpenAi => self.openai_api_key = key,
            ProviderType::Anthropic => self.anthropic_api_key = key,
        }
        self
    }

    pub fn with_base_url(mut self, provider: ProviderType, url: impl Into<String>) -> Self {
        let url = Some(url.into());
        match provider {
            ProviderType::OpenAi => self.openai_base_url = url,
            ProviderType::Anthropic => self.anthropic_base_url = url,
        }
        self
    }

    pub fn with_http_config(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// The configured key of a provider, exposed for request signing.
    pub fn api_key(&self, provider: ProviderType) -> Option<&str> {
        let key = match provider {
            ProviderType::OpenAi => self.openai_api_key.as_ref(),
            ProviderType::Anthropic => self.anthropic_api_key.as_ref(),
        };
        key.map(|k| k.expose_secret())
    }

    /// The endpoint of a provider, configured or default.
    pub fn base_url(&self, provider: ProviderType) -> &str {
        match provider {
            ProviderType::OpenAi => self
                .openai_base_url
                .as_deref()
                .unwrap_or(endpoints::OPENAI_BASE_URL),
            ProviderType::Anthropic => self
                .anthropic_base_url
                .as_deref()
                .unwrap_or(endpoints::ANTHROPIC_BASE_URL),
        }
    }

    /// The pricing catalog: the configured file when set, else the built-in table.
    pub fn pricing_catalog(&self) -> Result<PricingCatalog, LlmError> {
        match &self.pricing_file {
            Some(path) => PricingCatalog::from_json_file(path),
            None => Ok(PricingCatalog::with_defaults()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let env: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |k| env.get(k).map(|v| v.to_string())
    }

    #[test]
    fn reads_keys_and_endpoints() {
        let cfg = GatewayConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-live"),
            ("ANTHROPIC_BASE_URL", "http://localhost:9000"),
            ("COSTGATE_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_key(ProviderType::OpenAi), Some("sk-live"));
        assert_eq!(cfg.api_key(ProviderType::Anthropic), None);
        assert_eq!(cfg.base_url(ProviderType::OpenAi), endpoints::OPENAI_BASE_URL);
        assert_eq!(cfg.base_url(ProviderType::Anthropic), "http://localhost:9000");
        assert_eq!(cfg.http.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn empty_values_are_unset() {
        let cfg = GatewayConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(cfg.openai_api_key.is_none());
    }

    #[test]
    fn bad_timeout_is_a_configuration_error() {
        let err = GatewayConfig::from_lookup(lookup(&[("COSTGATE_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, LlmError::ConfigurationError(_)));
    }

    #[test]
    fn debug_redacts_keys() {
        let cfg = GatewayConfig::default().with_api_key(ProviderType::Anthropic, "sk-ant-secret");
        let printed = format!("{cfg:?}");
        assert!(!printed.contains("sk-ant-secret"));
        assert!(printed.contains("[REDACTED]"));
    }

    #[test]
    fn missing_pricing_file_is_reported() {
        let cfg = GatewayConfig {
            pricing_file: Some(PathBuf::from("/nonexistent/pricing.json")),
            ..GatewayConfig::default()
        };
        assert!(matches!(
            cfg.pricing_catalog(),
            Err(LlmError::ConfigurationError(_))
        ));
        assert!(!GatewayConfig::default().pricing_catalog().unwrap().providers().is_empty());
    }
}
