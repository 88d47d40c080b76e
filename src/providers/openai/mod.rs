//! `OpenAI` adapters
//!
//! Chat completions, legacy text completions, embeddings and image
//! generation, each behind [`ModelProvider`](crate::traits::ModelProvider).

mod chat;
mod client;
mod completion;
mod config;
mod embedding;
mod image;

pub use chat::OpenAiChatProvider;
pub use completion::OpenAiCompletionProvider;
pub use config::OpenAiConfig;
pub use embedding::OpenAiEmbeddingProvider;
pub use image::OpenAiImageProvider;

pub(crate) const PROVIDER: &str = "openai";
