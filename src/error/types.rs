//! Core error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed classification of a failed vendor call.
///
/// Lets callers tell retryable failures (`RateLimit`, `Transport`) apart from
/// fatal ones without parsing error strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationErrorKind {
    /// Bad or missing credentials, or a key without permission.
    Authentication,
    /// Rate limit or quota exhausted.
    RateLimit,
    /// The provider rejected the request shape or parameters.
    InvalidRequest,
    /// Connection failure, timeout or provider-side 5xx.
    Transport,
    /// Anything that could not be classified.
    Unknown,
}

impl GenerationErrorKind {
    /// Whether retrying the same request may succeed.
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::RateLimit | Self::Transport)
    }

    /// Map an HTTP status code to a kind.
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Authentication,
            429 => Self::RateLimit,
            400 | 404 | 409 | 413 | 415 | 422 => Self::InvalidRequest,
            408 | 500..=599 => Self::Transport,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Authentication => "authentication",
            Self::RateLimit => "rate-limit",
            Self::InvalidRequest => "invalid-request",
            Self::Transport => "transport",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Errors produced by the gateway.
///
/// Adapters never return the transport-level variants directly: every failure
/// of a vendor call is wrapped into [`LlmError::Generation`] via
/// [`LlmError::into_generation_error`].
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// A vendor call failed.
    #[error("{} generation error: {message}", display_provider(.provider))]
    Generation {
        provider: String,
        kind: GenerationErrorKind,
        message: String,
    },

    /// No pricing is registered for the provider.
    #[error("No pricing information for provider: {0}")]
    UnknownProvider(String),

    /// The provider is known but the model is not.
    #[error("No pricing information for model '{model}' of provider '{provider}'")]
    UnknownModel { provider: String, model: String },

    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    #[error("Timeout: {0}")]
    TimeoutError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

fn display_provider(provider: &str) -> &str {
    match provider {
        "openai" => "OpenAI",
        "anthropic" => "Anthropic",
        other => other,
    }
}

impl LlmError {
    /// Create an API error without details.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// HTTP status code carried by the error, if any.
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            Self::AuthenticationError(_) => Some(401),
            Self::RateLimitError(_) => Some(429),
            _ => None,
        }
    }

    /// Classify a transport-level error.
    pub fn kind(&self) -> GenerationErrorKind {
        match self {
            Self::Generation { kind, .. } => *kind,
            Self::AuthenticationError(_) | Self::MissingApiKey(_) => {
                GenerationErrorKind::Authentication
            }
            Self::RateLimitError(_) => GenerationErrorKind::RateLimit,
            Self::InvalidInput(_) | Self::UnsupportedOperation(_) => {
                GenerationErrorKind::InvalidRequest
            }
            Self::HttpError(_) | Self::TimeoutError(_) => GenerationErrorKind::Transport,
            Self::ApiError { code, .. } => GenerationErrorKind::from_status(*code),
            _ => GenerationErrorKind::Unknown,
        }
    }

    /// The kind of a wrapped generation error, `None` for other variants.
    pub const fn generation_kind(&self) -> Option<GenerationErrorKind> {
        match self {
            Self::Generation { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Generation { kind, .. } => kind.is_retryable(),
            Self::HttpError(_)
            | Self::TimeoutError(_)
            | Self::RateLimitError(_)
            | Self::ApiError { .. } => self.kind().is_retryable(),
            _ => false,
        }
    }

    /// Wrap a failure of a vendor call for `provider`.
    ///
    /// Errors that are already wrapped pass through unchanged.
    pub fn into_generation_error(self, provider: &str) -> Self {
        if let Self::Generation { .. } = self {
            return self;
        }
        let kind = self.kind();
        let message = match self {
            Self::ApiError { message, .. }
            | Self::HttpError(message)
            | Self::AuthenticationError(message)
            | Self::RateLimitError(message)
            | Self::TimeoutError(message)
            | Self::ParseError(message)
            | Self::JsonError(message)
            | Self::InvalidInput(message) => message,
            other => other.to_string(),
        };
        Self::Generation {
            provider: provider.to_string(),
            kind,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_error_display_matches_provider() {
        let err = LlmError::api_error(500, "boom").into_generation_error("openai");
        assert_eq!(err.to_string(), "OpenAI generation error: boom");

        let err = LlmError::HttpError("refused".into()).into_generation_error("anthropic");
        assert_eq!(err.to_string(), "Anthropic generation error: refused");
    }

    #[test]
    fn kinds_follow_status_codes() {
        assert_eq!(
            LlmError::api_error(401, "x").kind(),
            GenerationErrorKind::Authentication
        );
        assert_eq!(
            LlmError::api_error(429, "x").kind(),
            GenerationErrorKind::RateLimit
        );
        assert_eq!(
            LlmError::api_error(422, "x").kind(),
            GenerationErrorKind::InvalidRequest
        );
        assert_eq!(
            LlmError::api_error(503, "x").kind(),
            GenerationErrorKind::Transport
        );
        assert_eq!(
            LlmError::api_error(302, "x").kind(),
            GenerationErrorKind::Unknown
        );
    }

    #[test]
    fn retryable_only_for_rate_limit_and_transport() {
        assert!(LlmError::api_error(429, "x").into_generation_error("openai").is_retryable());
        assert!(LlmError::HttpError("x".into()).into_generation_error("openai").is_retryable());
        assert!(!LlmError::api_error(401, "x").into_generation_error("openai").is_retryable());
        assert!(!LlmError::UnknownProvider("x".into()).is_retryable());
    }

    #[test]
    fn wrapping_is_idempotent() {
        let once = LlmError::RateLimitError("slow down".into()).into_generation_error("openai");
        let twice = once.clone().into_generation_error("anthropic");
        match twice {
            LlmError::Generation { provider, kind, message } => {
                assert_eq!(provider, "openai");
                assert_eq!(kind, GenerationErrorKind::RateLimit);
                assert_eq!(message, "slow down");
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn unknown_provider_message() {
        let err = LlmError::UnknownProvider("mistral".into());
        assert_eq!(err.to_string(), "No pricing information for provider: mistral");
    }
}
