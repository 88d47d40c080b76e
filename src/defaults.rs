//! Default Configuration Values
//!
//! This module centralizes the default values used throughout the gateway.

use std::time::Duration;

/// HTTP client default configurations
pub mod http {
    use super::*;

    /// Default request timeout for HTTP requests
    ///
    /// Large models may take 10-20 seconds to respond; image generation longer.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Default connection timeout for establishing HTTP connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default User-Agent string for HTTP requests
    pub const USER_AGENT: &str = concat!("costgate/", env!("CARGO_PKG_VERSION"));
}

/// Provider endpoints
pub mod endpoints {
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
    pub const ANTHROPIC_VERSION: &str = "2023-06-01";
}

/// Per-adapter fallback models, used when neither the caller nor the pricing
/// catalog names one.
pub mod models {
    pub const OPENAI_CHAT: &str = "gpt-4o-mini";
    pub const OPENAI_COMPLETION: &str = "gpt-3.5-turbo-instruct";
    pub const OPENAI_EMBEDDING: &str = "text-embedding-ada-002";
    pub const OPENAI_IMAGE: &str = "dall-e-3";
    pub const ANTHROPIC_CHAT: &str = "claude-3-5-sonnet-20241022";
}

/// Request parameter defaults
pub mod params {
    /// `max_tokens` sent to the completions endpoint when the caller sets none
    pub const COMPLETION_MAX_TOKENS: u32 = 100;

    /// `max_tokens` sent to the Anthropic Messages API (the field is required)
    pub const ANTHROPIC_MAX_TOKENS: u32 = 1024;

    /// Standard image resolution
    pub const IMAGE_SIZE: &str = "1024x1024";
}
