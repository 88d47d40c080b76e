//! Pricing table entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::RequestKind;

/// What a model is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Chat,
    Completion,
    Embedding,
    Image,
}

impl From<RequestKind> for ModelType {
    fn from(kind: RequestKind) -> Self {
        match kind {
            RequestKind::Chat => Self::Chat,
            RequestKind::Completion => Self::Completion,
            RequestKind::Embedding => Self::Embedding,
            RequestKind::Image => Self::Image,
        }
    }
}

/// Lifecycle status of a model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    #[default]
    Active,
    Deprecated,
}

/// Per-1000-token rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenRates {
    pub input_cost_per_1k: f64,
    pub output_cost_per_1k: f64,
}

impl TokenRates {
    pub const fn new(input_cost_per_1k: f64, output_cost_per_1k: f64) -> Self {
        Self {
            input_cost_per_1k,
            output_cost_per_1k,
        }
    }

    /// Unrounded cost of a call.
    pub fn raw_cost(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        (f64::from(input_tokens) / 1000.0) * self.input_cost_per_1k
            + (f64::from(output_tokens) / 1000.0) * self.output_cost_per_1k
    }
}

/// Pricing and metadata for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    #[serde(rename = "type")]
    pub model_type: ModelType,
    #[serde(default)]
    pub input_cost_per_1k: f64,
    #[serde(default)]
    pub output_cost_per_1k: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u32>,
    #[serde(default)]
    pub status: ModelStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    /// Flat per-image rate keyed by `WxH` resolution
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resolution_pricing: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommended_for: Vec<String>,
}

impl ModelPricing {
    /// A token-priced model.
    pub fn tokens(model_type: ModelType, input_cost_per_1k: f64, output_cost_per_1k: f64) -> Self {
        Self {
            model_type,
            input_cost_per_1k,
            output_cost_per_1k,
            context_window: None,
            status: ModelStatus::Active,
            release_date: None,
            resolution_pricing: BTreeMap::new(),
            recommended_for: Vec::new(),
        }
    }

    /// An image model priced per image.
    pub fn image<I, S>(resolutions: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut pricing = Self::tokens(ModelType::Image, 0.0, 0.0);
        pricing.resolution_pricing = resolutions
            .into_iter()
            .map(|(size, rate)| (size.into(), rate))
            .collect();
        pricing
    }

    pub const fn with_context_window(mut self, tokens: u32) -> Self {
        self.context_window = Some(tokens);
        self
    }

    pub const fn with_status(mut self, status: ModelStatus) -> Self {
        self.status = status;
        self
    }

    /// An invalid calendar date leaves the release date unset.
    pub fn released(mut self, year: i32, month: u32, day: u32) -> Self {
        self.release_date = NaiveDate::from_ymd_opt(year, month, day);
        self
    }

    pub const fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    pub fn recommended_for<I, S>(mut self, uses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommended_for = uses.into_iter().map(Into::into).collect();
        self
    }

    pub const fn rates(&self) -> TokenRates {
        TokenRates::new(self.input_cost_per_1k, self.output_cost_per_1k)
    }

    pub fn is_active(&self) -> bool {
        self.status == ModelStatus::Active
    }

    /// Per-image rate for `size`, falling back to `default_size` when `size`
    /// is not a supported resolution.
    pub fn resolution_rate(&self, size: &str, default_size: &str) -> Option<f64> {
        self.resolution_pricing
            .get(size)
            .or_else(|| self.resolution_pricing.get(default_size))
            .copied()
    }

    pub fn supports_resolution(&self, size: &str) -> bool {
        self.resolution_pricing.contains_key(size)
    }
}

/// Pricing for all models of one provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderPricing {
    /// Provider-wide fallback rates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_rates: Option<TokenRates>,
    #[serde(default)]
    pub models: BTreeMap<String, ModelPricing>,
}

/// Serializable form of a whole catalog, keyed by lower-cased provider name.
pub type PricingTable = BTreeMap<String, ProviderPricing>;
