//! In-memory accumulation of token usage and cost.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::ModelResponse;

/// One tracked call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenUsageEntry {
    pub provider: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u64,
    pub cost: f64,
    pub timestamp: DateTime<Utc>,
}

/// Running totals of tokens and cost, overall and per provider.
///
/// Not synchronized; wrap in a lock to share between tasks.
#[derive(Debug, Clone, Default)]
pub struct TokenTracker {
    total_tokens: u64,
    total_cost: f64,
    provider_tokens: BTreeMap<String, u64>,
    usage_log: Vec<TokenUsageEntry>,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a call without cost information.
    pub fn track(&mut self, provider: &str, input_tokens: u32, output_tokens: u32) {
        self.record(provider, input_tokens, output_tokens, 0.0);
    }

    /// Record the tokens and cost of a response.
    pub fn track_response(&mut self, response: &ModelResponse) {
        self.record(
            response.provider(),
            response.input_tokens(),
            response.output_tokens(),
            response.cost(),
        );
    }

    fn record(&mut self, provider: &str, input_tokens: u32, output_tokens: u32, cost: f64) {
        let total = u64::from(input_tokens) + u64::from(output_tokens);
        self.total_tokens += total;
        self.total_cost += cost;
        *self.provider_tokens.entry(provider.to_string()).or_insert(0) += total;
        self.usage_log.push(TokenUsageEntry {
            provider: provider.to_string(),
            input_tokens,
            output_tokens,
            total_tokens: total,
            cost,
            timestamp: Utc::now(),
        });
        tracing::trace!(provider, total, "tracked usage");
    }

    pub const fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    /// Tokens tracked for `provider`; 0 when none.
    pub fn provider_tokens(&self, provider: &str) -> u64 {
        self.provider_tokens.get(provider).copied().unwrap_or(0)
    }

    pub const fn all_provider_tokens(&self) -> &BTreeMap<String, u64> {
        &self.provider_tokens
    }

    /// Sum of the tracked costs, rounded to 4 decimals.
    pub fn total_cost(&self) -> f64 {
        crate::pricing::round_cost(self.total_cost)
    }

    /// Tracked calls in the order they were recorded.
    pub fn usage_log(&self) -> &[TokenUsageEntry] {
        &self.usage_log
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
