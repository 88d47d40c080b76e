//! Vendor-reported token usage.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token usage as reported by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub const fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }

    /// Parse an OpenAI `usage` object (`prompt_tokens` / `completion_tokens`).
    pub fn from_openai(raw: &Value) -> Option<Self> {
        let usage = raw.get("usage")?;
        let prompt = read_u32(usage, "prompt_tokens")?;
        let completion = read_u32(usage, "completion_tokens").unwrap_or(0);
        Some(Self::new(prompt, completion))
    }

    /// Parse an Anthropic `usage` object (`input_tokens` / `output_tokens`).
    pub fn from_anthropic(raw: &Value) -> Option<Self> {
        let usage = raw.get("usage")?;
        let input = read_u32(usage, "input_tokens")?;
        let output = read_u32(usage, "output_tokens").unwrap_or(0);
        Some(Self::new(input, output))
    }
}

fn read_u32(obj: &Value, key: &str) -> Option<u32> {
    obj.get(key)
        .and_then(Value::as_u64)
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
}
