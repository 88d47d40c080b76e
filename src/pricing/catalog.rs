use chrono::NaiveDate;
use std::collections::btree_map::Entry;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::defaults::default_table;
use super::model::{ModelPricing, ModelStatus, ModelType, PricingTable, TokenRates};
use super::round_cost;
use crate::defaults::params::IMAGE_SIZE;
use crate::error::LlmError;

/// Release date assumed for models that have none.
fn undated_release() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Per-provider pricing and model metadata.
///
/// Provider names are case-insensitive and stored lower-cased. The lock is
/// held only for the duration of a single lookup or registration.
#[derive(Debug, Default)]
pub struct PricingCatalog {
    table: RwLock<PricingTable>,
}

impl PricingCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding the built-in pricing table.
    pub fn with_defaults() -> Self {
        Self::from_table(default_table())
    }

    /// Provider keys are lower-cased; entries whose keys differ only in case
    /// are merged, model by model.
    pub fn from_table(table: PricingTable) -> Self {
        let mut merged = PricingTable::new();
        for (provider, pricing) in table {
            match merged.entry(normalize(&provider)) {
                Entry::Vacant(slot) => {
                    slot.insert(pricing);
                }
                Entry::Occupied(mut slot) => {
                    tracing::warn!(provider = %provider, "merging case-variant provider pricing");
                    let existing = slot.get_mut();
                    existing.default_rates = pricing.default_rates.or(existing.default_rates);
                    existing.models.extend(pricing.models);
                }
            }
        }
        Self {
            table: RwLock::new(merged),
        }
    }

    /// Load a table in the JSON shape produced by [`to_json_string`](Self::to_json_string).
    pub fn from_json_str(json: &str) -> Result<Self, LlmError> {
        let table: PricingTable = serde_json::from_str(json)
            .map_err(|e| LlmError::ConfigurationError(format!("Invalid pricing table: {e}")))?;
        Ok(Self::from_table(table))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LlmError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LlmError::ConfigurationError(format!(
                "Failed to read pricing file {}: {e}",
                path.display()
            ))
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), "loaded pricing table");
        Ok(catalog)
    }

    pub fn to_json_string(&self) -> Result<String, LlmError> {
        let table = self.read()?;
        Ok(serde_json::to_string_pretty(&*table)?)
    }

    /// A copy of the whole table.
    pub fn snapshot(&self) -> Result<PricingTable, LlmError> {
        Ok(self.read()?.clone())
    }

    // ---------------------------------------------------------------------
    // Cost computation
    // ---------------------------------------------------------------------

    /// Cost of a call at the provider's default rates.
    pub fn calculate_cost(
        &self,
        provider: &str,
        input_tokens: u32,
        output_tokens: u32,
    ) -> Result<f64, LlmError> {
        let rates = self.provider_rates(provider)?;
        Ok(round_cost(rates.raw_cost(input_tokens, output_tokens)))
    }

    /// Cost of a call at a specific model's rates.
    pub fn calculate_model_cost(
        &self,
        provider: &str,
        model: &str,
        input_tokens: u32,
        output_tokens: u32,
    ) -> Result<f64, LlmError> {
        let rates = self.model_rates(provider, model)?;
        Ok(round_cost(rates.raw_cost(input_tokens, output_tokens)))
    }

    /// Cost at the model's rates when the model is listed, otherwise at the
    /// provider's default rates.
    pub fn estimate_cost(
        &self,
        provider: &str,
        model: &str,
        input_tokens: u32,
        output_tokens: u32,
    ) -> Result<f64, LlmError> {
        match self.model_rates(provider, model) {
            Ok(rates) => Ok(round_cost(rates.raw_cost(input_tokens, output_tokens))),
            Err(err @ LlmError::UnknownModel { .. }) => match self.provider_rates(provider) {
                Ok(rates) => Ok(round_cost(rates.raw_cost(input_tokens, output_tokens))),
                Err(_) => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    /// Cost of `count` images of `size`.
    ///
    /// A size the model does not support is priced at the standard
    /// resolution.
    pub fn image_cost(
        &self,
        provider: &str,
        model: &str,
        size: &str,
        count: u32,
    ) -> Result<f64, LlmError> {
        let rate = self.with_model(provider, model, |pricing| {
            pricing.resolution_rate(size, IMAGE_SIZE)
        })?;
        let rate = rate.ok_or_else(|| unknown_model(provider, model))?;
        Ok(round_cost(rate * f64::from(count)))
    }

    // ---------------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------------

    /// Add or replace a provider's default rates.
    pub fn register_provider(
        &self,
        provider: &str,
        input_cost_per_1k: f64,
        output_cost_per_1k: f64,
    ) -> Result<(), LlmError> {
        let provider = normalize(provider);
        let mut table = self.write()?;
        table.entry(provider.clone()).or_default().default_rates =
            Some(TokenRates::new(input_cost_per_1k, output_cost_per_1k));
        tracing::debug!(
            provider = %provider,
            input_cost_per_1k,
            output_cost_per_1k,
            "registered provider pricing"
        );
        Ok(())
    }

    /// Add or replace a model entry.
    pub fn register_model(
        &self,
        provider: &str,
        model: impl Into<String>,
        pricing: ModelPricing,
    ) -> Result<(), LlmError> {
        let provider = normalize(provider);
        let model = model.into();
        let mut table = self.write()?;
        tracing::debug!(provider = %provider, model = %model, "registered model pricing");
        table
            .entry(provider)
            .or_default()
            .models
            .insert(model, pricing);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Model metadata
    // ---------------------------------------------------------------------

    /// Names of all providers with pricing.
    pub fn providers(&self) -> Vec<String> {
        self.read()
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Sorted model identifiers of a provider; empty for an unknown provider.
    pub fn list_models(&self, provider: &str) -> Vec<String> {
        self.filter_models(provider, None, None)
    }

    pub fn model_details(&self, provider: &str, model: &str) -> Option<ModelPricing> {
        self.with_model(provider, model, ModelPricing::clone).ok()
    }

    /// Model identifiers matching the given status and type, sorted.
    pub fn filter_models(
        &self,
        provider: &str,
        status: Option<ModelStatus>,
        model_type: Option<ModelType>,
    ) -> Vec<String> {
        let Ok(table) = self.read() else {
            return Vec::new();
        };
        let Some(pricing) = table.get(&normalize(provider)) else {
            return Vec::new();
        };
        pricing
            .models
            .iter()
            .filter(|(_, m)| status.is_none_or(|s| m.status == s))
            .filter(|(_, m)| model_type.is_none_or(|t| m.model_type == t))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// The most recently released active model, optionally of one type.
    ///
    /// A model without a release date counts as released on 2000-01-01. On
    /// equal dates the lexicographically smallest identifier wins.
    pub fn latest_model(&self, provider: &str, model_type: Option<ModelType>) -> Option<String> {
        let table = self.read().ok()?;
        let pricing = table.get(&normalize(provider))?;
        pricing
            .models
            .iter()
            .filter(|(_, m)| m.is_active())
            .filter(|(_, m)| model_type.is_none_or(|t| m.model_type == t))
            .map(|(name, m)| (m.release_date.unwrap_or_else(undated_release), name))
            // same date: the smaller name ranks higher
            .max_by(|(da, na), (db, nb)| da.cmp(db).then_with(|| nb.cmp(na)))
            .map(|(_, name)| name.clone())
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn read(&self) -> Result<RwLockReadGuard<'_, PricingTable>, LlmError> {
        self.table
            .read()
            .map_err(|_| LlmError::InternalError("pricing catalog lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, PricingTable>, LlmError> {
        self.table
            .write()
            .map_err(|_| LlmError::InternalError("pricing catalog lock poisoned".into()))
    }

    fn provider_rates(&self, provider: &str) -> Result<TokenRates, LlmError> {
        let table = self.read()?;
        table
            .get(&normalize(provider))
            .and_then(|p| p.default_rates)
            .ok_or_else(|| LlmError::UnknownProvider(provider.to_string()))
    }

    fn model_rates(&self, provider: &str, model: &str) -> Result<TokenRates, LlmError> {
        self.with_model(provider, model, ModelPricing::rates)
    }

    fn with_model<T>(
        &self,
        provider: &str,
        model: &str,
        f: impl FnOnce(&ModelPricing) -> T,
    ) -> Result<T, LlmError> {
        let table = self.read()?;
        let pricing = table
            .get(&normalize(provider))
            .ok_or_else(|| LlmError::UnknownProvider(provider.to_string()))?;
        pricing
            .models
            .get(model)
            .map(f)
            .ok_or_else(|| unknown_model(provider, model))
    }
}

fn normalize(provider: &str) -> String {
    provider.trim().to_lowercase()
}

fn unknown_model(provider: &str, model: &str) -> LlmError {
    LlmError::UnknownModel {
        provider: provider.to_string(),
        model: model.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_cost(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn case_variant_providers_are_merged() {
        let json = r#"{
            "OpenAI": {"models": {"house-chat": {"type": "chat", "input_cost_per_1k": 0.5}}},
            "openai": {
                "default_rates": {"input_cost_per_1k": 0.001, "output_cost_per_1k": 0.002},
                "models": {"house-embed": {"type": "embedding", "input_cost_per_1k": 0.1}}
            }
        }"#;
        let catalog = PricingCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.providers(), vec!["openai".to_string()]);
        assert_eq!(
            catalog.list_models("openai"),
            vec!["house-chat".to_string(), "house-embed".to_string()]
        );
        assert_cost(catalog.calculate_cost("OPENAI", 1000, 1000).unwrap(), 0.003);
    }

    #[test]
    fn provider_cost_at_1k_tokens_is_sum_of_rates() {
        let catalog = PricingCatalog::with_defaults();
        assert_cost(catalog.calculate_cost("openai", 1000, 1000).unwrap(), 0.0035);
        assert_cost(catalog.calculate_cost("anthropic", 1000, 1000).unwrap(), 0.007);
    }

    #[test]
    fn provider_names_are_case_insensitive() {
        let catalog = PricingCatalog::with_defaults();
        assert_cost(catalog.calculate_cost("OpenAI", 2000, 0).unwrap(), 0.003);
    }

    #[test]
    fn unknown_provider_fails() {
        let catalog = PricingCatalog::with_defaults();
        let err = catalog.calculate_cost("mistral", 10, 10).unwrap_err();
        assert_eq!(err.to_string(), "No pricing information for provider: mistral");
        assert!(matches!(
            catalog.calculate_model_cost("mistral", "x", 1, 1),
            Err(LlmError::UnknownProvider(_))
        ));
    }

    #[test]
    fn model_cost_uses_model_rates() {
        let catalog = PricingCatalog::with_defaults();
        // 500/1000 * 0.03 + 250/1000 * 0.06
        assert_cost(
            catalog.calculate_model_cost("openai", "gpt-4", 500, 250).unwrap(),
            0.03,
        );
        assert!(matches!(
            catalog.calculate_model_cost("openai", "gpt-5", 1, 1),
            Err(LlmError::UnknownModel { .. })
        ));
    }

    #[test]
    fn estimate_falls_back_to_provider_rates() {
        let catalog = PricingCatalog::with_defaults();
        assert_cost(
            catalog.estimate_cost("openai", "ft:gpt-custom", 1000, 1000).unwrap(),
            0.0035,
        );
        assert_cost(
            catalog.estimate_cost("openai", "gpt-4o", 1000, 1000).unwrap(),
            0.0125,
        );

        let bare = PricingCatalog::new();
        bare.register_model("local", "m", ModelPricing::tokens(ModelType::Chat, 0.1, 0.1))
            .unwrap();
        assert!(matches!(
            bare.estimate_cost("local", "other", 1, 1),
            Err(LlmError::UnknownModel { .. })
        ));
    }

    #[test]
    fn registration_is_visible_immediately() {
        let catalog = PricingCatalog::with_defaults();
        assert!(catalog.calculate_cost("mistral", 1000, 1000).is_err());
        catalog.register_provider("Mistral", 0.002, 0.006).unwrap();
        assert_cost(catalog.calculate_cost("mistral", 1000, 1000).unwrap(), 0.008);

        catalog.register_provider("openai", 0.01, 0.01).unwrap();
        assert_cost(catalog.calculate_cost("openai", 1000, 1000).unwrap(), 0.02);
    }

    #[test]
    fn image_cost_scales_with_count() {
        let catalog = PricingCatalog::with_defaults();
        let one = catalog.image_cost("openai", "dall-e-3", "1024x1792", 1).unwrap();
        for n in 1..=4 {
            let many = catalog.image_cost("openai", "dall-e-3", "1024x1792", n).unwrap();
            assert_cost(many, one * f64::from(n));
        }
        assert_cost(
            catalog.image_cost("openai", "dall-e-2", "333x333", 2).unwrap(),
            0.04,
        );
        assert!(matches!(
            catalog.image_cost("openai", "gpt-4", "1024x1024", 1),
            Err(LlmError::UnknownModel { .. })
        ));
    }

    #[test]
    fn latest_model_picks_newest_active() {
        let catalog = PricingCatalog::with_defaults();
        assert_eq!(
            catalog.latest_model("openai", Some(ModelType::Chat)).as_deref(),
            Some("gpt-4o-mini")
        );
        assert_eq!(
            catalog.latest_model("openai", Some(ModelType::Image)).as_deref(),
            Some("dall-e-3")
        );
        assert_eq!(
            catalog.latest_model("anthropic", None).as_deref(),
            Some("claude-3-5-sonnet-20241022")
        );
        assert_eq!(catalog.latest_model("nobody", None), None);
    }

    #[test]
    fn latest_model_ties_resolve_to_smallest_identifier() {
        let catalog = PricingCatalog::with_defaults();
        assert_eq!(
            catalog.latest_model("openai", Some(ModelType::Embedding)).as_deref(),
            Some("text-embedding-3-large")
        );

        let fixture = PricingCatalog::new();
        let dated = |y, m, d| ModelPricing::tokens(ModelType::Chat, 0.0, 0.0).released(y, m, d);
        fixture.register_model("p", "zeta", dated(2024, 6, 1)).unwrap();
        fixture.register_model("p", "alpha", dated(2024, 6, 1)).unwrap();
        fixture.register_model("p", "older", dated(2023, 1, 1)).unwrap();
        fixture
            .register_model(
                "p",
                "retired",
                dated(2025, 1, 1).with_status(ModelStatus::Deprecated),
            )
            .unwrap();
        fixture
            .register_model("p", "undated", ModelPricing::tokens(ModelType::Chat, 0.0, 0.0))
            .unwrap();
        assert_eq!(fixture.latest_model("p", None).as_deref(), Some("alpha"));
    }

    #[test]
    fn filter_by_status_and_type() {
        let catalog = PricingCatalog::with_defaults();
        assert_eq!(
            catalog.filter_models("anthropic", Some(ModelStatus::Deprecated), None),
            vec!["claude-2".to_string()]
        );
        let embeddings = catalog.filter_models("openai", None, Some(ModelType::Embedding));
        assert_eq!(embeddings.len(), 3);
        assert!(catalog.list_models("nobody").is_empty());
        assert_eq!(catalog.list_models("openai").len(), 13);
    }

    #[test]
    fn model_details_include_metadata() {
        let catalog = PricingCatalog::with_defaults();
        let details = catalog.model_details("openai", "gpt-4o").unwrap();
        assert_eq!(details.context_window, Some(128_000));
        assert!(details.recommended_for.iter().any(|r| r == "multimodal"));
        assert!(catalog.model_details("openai", "gpt-9").is_none());
    }

    #[test]
    fn json_export_round_trips() {
        let catalog = PricingCatalog::with_defaults();
        let json = catalog.to_json_string().unwrap();
        let loaded = PricingCatalog::from_json_str(&json).unwrap();
        assert_eq!(loaded.snapshot().unwrap(), catalog.snapshot().unwrap());
        assert!(matches!(
            PricingCatalog::from_json_str("{not json"),
            Err(LlmError::ConfigurationError(_))
        ));
    }
}
