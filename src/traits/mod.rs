//! Capability traits

mod provider;

pub use provider::ModelProvider;
