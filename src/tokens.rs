//! Local token counting.
//!
//! Adapters prefer the `usage` block a provider reports. A [`TokenCounter`]
//! is only consulted when a response carries no usage.

use std::fmt::Debug;

/// Counts tokens in a piece of text.
pub trait TokenCounter: Debug + Send + Sync {
    fn count(&self, text: &str) -> u32;

    /// Sum of the counts of several texts.
    fn count_all(&self, texts: &[&str]) -> u32 {
        texts
            .iter()
            .fold(0u32, |acc, text| acc.saturating_add(self.count(text)))
    }
}

/// One token per whitespace-separated word.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenCounter;

impl TokenCounter for WhitespaceTokenCounter {
    fn count(&self, text: &str) -> u32 {
        saturate(text.split_whitespace().count())
    }
}

/// Roughly one token per four characters, rounded up.
///
/// Closer to BPE tokenizers than a word count for English prose.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterTokenCounter;

impl TokenCounter for CharacterTokenCounter {
    fn count(&self, text: &str) -> u32 {
        saturate(text.chars().count().div_ceil(4))
    }
}

fn saturate(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
