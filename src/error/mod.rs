//! Error Handling Module
//!
//! This module provides error handling for the gateway, including:
//! - Core error type (`LlmError`) and the closed generation error kind enum
//! - Classification of provider HTTP errors
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust,ignore
//! use costgate::error::{GenerationErrorKind, LlmError};
//!
//! let error = LlmError::api_error(429, "Too many requests").into_generation_error("openai");
//! assert_eq!(error.generation_kind(), Some(GenerationErrorKind::RateLimit));
//! assert!(error.is_retryable());
//! ```

// Module declarations
pub mod classify;
mod conversions;
pub mod types;

// Re-exports for public API
pub use classify::classify_http_error;
pub use types::*;
