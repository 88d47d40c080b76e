//! Provider lookup
//!
//! Maps provider names to [`ProviderType`] and builds adapters through
//! [`ProviderFactory`].

mod factory;

pub use factory::ProviderFactory;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::types::RequestKind;

/// Providers the gateway has adapters for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    OpenAi,
    Anthropic,
}

impl ProviderType {
    pub const ALL: [Self; 2] = [Self::OpenAi, Self::Anthropic];

    /// Name used in the pricing catalog.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }

    /// Request kinds this provider serves.
    pub fn supported_kinds(self) -> Vec<RequestKind> {
        match self {
            Self::OpenAi => RequestKind::ALL.to_vec(),
            Self::Anthropic => vec![RequestKind::Chat, RequestKind::Completion],
        }
    }

    pub fn supports(self, kind: RequestKind) -> bool {
        self.supported_kinds().contains(&kind)
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderType {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            _ => Err(LlmError::UnknownProvider(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("OpenAI".parse::<ProviderType>().unwrap(), ProviderType::OpenAi);
        assert_eq!("claude".parse::<ProviderType>().unwrap(), ProviderType::Anthropic);
        let err = "cohere".parse::<ProviderType>().unwrap_err();
        assert!(matches!(err, LlmError::UnknownProvider(ref p) if p == "cohere"));
    }

    #[test]
    fn anthropic_serves_text_kinds_only() {
        assert!(ProviderType::Anthropic.supports(RequestKind::Completion));
        assert!(!ProviderType::Anthropic.supports(RequestKind::Embedding));
        assert_eq!(ProviderType::OpenAi.supported_kinds().len(), 4);
    }
}
