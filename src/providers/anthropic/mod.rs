//! Anthropic adapter (Messages API)

mod chat;
mod config;

pub use chat::AnthropicChatProvider;
pub use config::AnthropicConfig;

pub(crate) const PROVIDER: &str = "anthropic";
