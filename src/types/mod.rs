//! Shared request/response types.

pub mod http;
pub mod request;
pub mod response;
pub mod usage;

pub use http::{HttpConfig, HttpConfigBuilder};
pub use request::{
    ChatMessage, GenerateOptions, GenerateRequest, MessageRole, PromptInput, RequestKind,
};
pub use response::{ModelOutput, ModelResponse};
pub use usage::Usage;
