//! Analytics Module
//!
//! Usage statistics aggregation and the token-count heuristic.

pub mod aggregator;

pub use aggregator::{UsageAggregator, UsageRecord, UsageStatistics, UsageSummary};

/// Approximate token count for a text (4 characters per token).
///
/// No real tokenizer is involved; this heuristic is part of the recorded
/// data format.
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() / 4) as u64
}
