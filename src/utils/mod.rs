//! Utility modules

pub mod http_client;
pub mod http_headers;

pub use http_client::build_http_client;
pub use http_headers::{HttpHeaderBuilder, ProviderHeaders};
