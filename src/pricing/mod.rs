//! Pricing catalog and cost computation.
//!
//! A [`PricingCatalog`] is constructed explicitly and shared as
//! `Arc<PricingCatalog>` between the adapters that need it. Registration of
//! providers and models is visible immediately to every holder.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use costgate::pricing::PricingCatalog;
//!
//! let catalog = Arc::new(PricingCatalog::with_defaults());
//! let cost = catalog.calculate_cost("openai", 1000, 1000)?;
//! assert_eq!(cost, 0.0035);
//! ```

mod catalog;
mod defaults;
mod model;

pub use catalog::PricingCatalog;
pub use defaults::default_table;
pub use model::{ModelPricing, ModelStatus, ModelType, PricingTable, ProviderPricing, TokenRates};

/// Round a USD amount to 4 decimals, half away from zero.
pub fn round_cost(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
