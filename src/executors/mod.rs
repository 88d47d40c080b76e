//! HTTP execution of vendor calls.

pub mod http;

pub use http::HttpJsonExecutor;
