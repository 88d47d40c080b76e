//! # Costgate - A Thin, Cost-Aware LLM Gateway
//!
//! Costgate puts chat, completion, embedding and image endpoints of several
//! providers behind one adapter trait and prices every call against a
//! pricing catalog.
//!
#![deny(unsafe_code)]

//! ## Features
//!
//! - **Uniform responses**: every adapter returns a [`ModelResponse`] with text,
//!   vectors or image URLs plus token counts and cost.
//! - **Injected pricing**: one [`PricingCatalog`] is shared by all adapters and
//!   can be extended at runtime or loaded from a JSON file.
//! - **Latest model selection**: adapters without an explicit model use the
//!   newest active catalog entry of their type.
//! - **Token tracking**: [`TokenTracker`] accumulates usage per provider.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use costgate::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = Arc::new(PricingCatalog::with_defaults());
//!     let factory = ProviderFactory::new(catalog);
//!     let chat = factory.create("openai", RequestKind::Chat, "your-api-key", None)?;
//!
//!     let response = chat.generate("Explain artificial intelligence".into()).await?;
//!     println!("{} ({} tokens, ${})", response.text().unwrap_or_default(),
//!         response.total_tokens(), response.cost());
//!
//!     let mut tracker = TokenTracker::new();
//!     tracker.track_response(&response);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod defaults;
pub mod error;
pub mod executors;
pub mod pricing;
pub mod providers;
pub mod registry;
pub mod telemetry;
pub mod tokens;
pub mod tracker;
pub mod traits;
pub mod types;
pub mod utils;

pub use config::GatewayConfig;
pub use error::{GenerationErrorKind, LlmError};
pub use pricing::{ModelPricing, ModelStatus, ModelType, PricingCatalog};
pub use registry::{ProviderFactory, ProviderType};
pub use tokens::{CharacterTokenCounter, TokenCounter, WhitespaceTokenCounter};
pub use tracker::{TokenTracker, TokenUsageEntry};
pub use traits::ModelProvider;
pub use types::{
    ChatMessage, GenerateOptions, GenerateRequest, ModelOutput, ModelResponse, PromptInput,
    RequestKind, Usage,
};

/// Common imports
pub mod prelude {
    pub use crate::config::GatewayConfig;
    pub use crate::error::{GenerationErrorKind, LlmError};
    pub use crate::pricing::{ModelPricing, ModelType, PricingCatalog};
    pub use crate::registry::{ProviderFactory, ProviderType};
    pub use crate::tracker::TokenTracker;
    pub use crate::traits::ModelProvider;
    pub use crate::types::{
        ChatMessage, GenerateOptions, GenerateRequest, ModelOutput, ModelResponse,
        PromptInput, RequestKind,
    };
}
