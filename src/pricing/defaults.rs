//! Built-in pricing table.
//!
//! Rates are USD per 1000 tokens, image rates USD per image.

use std::collections::BTreeMap;

use super::model::{ModelPricing, ModelStatus, ModelType, PricingTable, ProviderPricing, TokenRates};

/// The pricing table shipped with the crate.
pub fn default_table() -> PricingTable {
    let mut table = PricingTable::new();
    table.insert("openai".to_string(), openai());
    table.insert("anthropic".to_string(), anthropic());
    table
}

fn chat(input: f64, output: f64) -> ModelPricing {
    ModelPricing::tokens(ModelType::Chat, input, output)
}

fn openai() -> ProviderPricing {
    let models: BTreeMap<String, ModelPricing> = [
        (
            "gpt-3.5-turbo",
            chat(0.0015, 0.002)
                .with_context_window(4096)
                .released(2023, 3, 1)
                .recommended_for(["general purpose", "cost-effective"]),
        ),
        (
            "gpt-3.5-turbo-16k",
            chat(0.003, 0.004)
                .with_context_window(16384)
                .released(2023, 6, 15)
                .recommended_for(["longer context", "detailed analysis"]),
        ),
        (
            "gpt-3.5-turbo-instruct",
            ModelPricing::tokens(ModelType::Completion, 0.0015, 0.002)
                .with_context_window(4096)
                .released(2023, 9, 18)
                .recommended_for(["text completion"]),
        ),
        (
            "gpt-4",
            chat(0.03, 0.06)
                .with_context_window(8192)
                .released(2023, 3, 14)
                .recommended_for(["complex tasks", "high-quality output"]),
        ),
        (
            "gpt-4-32k",
            chat(0.06, 0.12)
                .with_context_window(32768)
                .released(2023, 3, 14)
                .recommended_for(["very long context", "detailed analysis"]),
        ),
        (
            "gpt-4-turbo",
            chat(0.01, 0.03)
                .with_context_window(128_000)
                .released(2024, 2, 15)
                .recommended_for(["advanced reasoning", "large context"]),
        ),
        (
            "gpt-4o",
            chat(0.0025, 0.01)
                .with_context_window(128_000)
                .released(2024, 5, 13)
                .recommended_for(["multimodal", "high performance", "cost-effective"]),
        ),
        (
            "gpt-4o-mini",
            chat(0.00015, 0.0006)
                .with_context_window(128_000)
                .released(2024, 7, 1)
                .recommended_for(["lightweight tasks", "cost optimization"]),
        ),
        (
            "text-embedding-ada-002",
            ModelPricing::tokens(ModelType::Embedding, 0.0001, 0.0)
                .with_context_window(8191)
                .released(2022, 12, 15),
        ),
        (
            "text-embedding-3-small",
            ModelPricing::tokens(ModelType::Embedding, 0.00002, 0.0)
                .with_context_window(8191)
                .released(2024, 1, 25),
        ),
        (
            "text-embedding-3-large",
            ModelPricing::tokens(ModelType::Embedding, 0.00013, 0.0)
                .with_context_window(8191)
                .released(2024, 1, 25),
        ),
        (
            "dall-e-2",
            ModelPricing::image([("256x256", 0.016), ("512x512", 0.018), ("1024x1024", 0.020)])
                .released(2022, 7, 15)
                .recommended_for(["standard image generation"]),
        ),
        (
            "dall-e-3",
            ModelPricing::image([("1024x1024", 0.04), ("1024x1792", 0.08), ("1792x1024", 0.08)])
                .released(2023, 11, 6)
                .recommended_for(["high-quality image generation"]),
        ),
    ]
    .into_iter()
    .map(|(name, pricing)| (name.to_string(), pricing))
    .collect();

    ProviderPricing {
        default_rates: Some(TokenRates::new(0.0015, 0.002)),
        models,
    }
}

fn anthropic() -> ProviderPricing {
    let models: BTreeMap<String, ModelPricing> = [
        (
            "claude-2",
            chat(0.008, 0.024)
                .with_context_window(100_000)
                .released(2023, 7, 11)
                .with_status(ModelStatus::Deprecated),
        ),
        (
            "claude-3-haiku-20240307",
            chat(0.00025, 0.00125)
                .with_context_window(200_000)
                .released(2024, 3, 7)
                .recommended_for(["lightweight tasks", "low latency"]),
        ),
        (
            "claude-3-5-sonnet-20241022",
            chat(0.003, 0.015)
                .with_context_window(200_000)
                .released(2024, 10, 22)
                .recommended_for(["complex tasks", "coding"]),
        ),
    ]
    .into_iter()
    .map(|(name, pricing)| (name.to_string(), pricing))
    .collect();

    ProviderPricing {
        default_rates: Some(TokenRates::new(0.003, 0.004)),
        models,
    }
}
