//! Usage Aggregation
//!
//! Incrementally maintained usage statistics, shared across every session
//! and persisted after each recorded exchange.

use crate::error::Result;
use crate::store::StatsStore;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// One completed exchange, consumed immediately by the aggregator
#[derive(Debug, Clone)]
pub struct UsageRecord {
    pub user: String,
    pub model: String,
    pub latency: Duration,
    pub prompt_tokens: u64,
    pub response_tokens: u64,
}

impl UsageRecord {
    pub fn new(
        user: impl Into<String>,
        model: impl Into<String>,
        latency: Duration,
        prompt_tokens: u64,
        response_tokens: u64,
    ) -> Self {
        Self {
            user: user.into(),
            model: model.into(),
            latency,
            prompt_tokens,
            response_tokens,
        }
    }
}

/// Persistent aggregate statistics, singleton per deployment.
///
/// `avg_response_time` always equals the arithmetic mean of every latency
/// recorded so far, maintained incrementally. Counts only grow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStatistics {
    pub total_conversations: u64,
    pub total_tokens: u64,

    /// Mean latency in seconds
    pub avg_response_time: f64,

    #[serde(default)]
    pub model_usage: HashMap<String, u64>,

    #[serde(default)]
    pub user_activity: HashMap<String, u64>,
}

impl UsageStatistics {
    /// Fold one exchange into the running statistics.
    pub fn record(&mut self, record: &UsageRecord) {
        *self.model_usage.entry(record.model.clone()).or_insert(0) += 1;

        self.total_conversations += 1;
        self.total_tokens += record.prompt_tokens + record.response_tokens;

        // new_avg = (old_avg * (n-1) + latency) / n, with n post-increment
        let n = self.total_conversations as f64;
        self.avg_response_time =
            (self.avg_response_time * (n - 1.0) + record.latency.as_secs_f64()) / n;

        *self.user_activity.entry(record.user.clone()).or_insert(0) += 1;
    }
}

/// Ranked summary over the statistics
#[derive(Debug, Clone, Serialize)]
pub struct UsageSummary {
    pub total_conversations: u64,
    pub total_tokens: u64,

    /// Mean latency in seconds, rounded to two decimals
    pub avg_response_time: f64,

    pub top_models: Vec<(String, u64)>,
    pub top_users: Vec<(String, u64)>,
}

/// Process-wide aggregation service.
///
/// Shared across sessions; `apply` holds a single-writer lock for the
/// read-modify-write of both the in-memory statistics and the snapshot on
/// disk.
pub struct UsageAggregator {
    stats: Mutex<UsageStatistics>,
    store: StatsStore,
}

impl UsageAggregator {
    /// Bootstrap from the persisted snapshot; zeroed statistics when none
    /// exists.
    pub fn new(store: StatsStore) -> Self {
        let stats = store.load();
        Self {
            stats: Mutex::new(stats),
            store,
        }
    }

    /// Record one exchange and persist the updated snapshot.
    ///
    /// A persistence failure is returned to the caller, but the in-memory
    /// mutation stands: memory is the source of truth for the remainder of
    /// the process lifetime, and the on-disk copy may lag.
    pub fn apply(&self, record: &UsageRecord) -> Result<()> {
        let snapshot = {
            let mut stats = self.stats.lock();
            stats.record(record);
            stats.clone()
        };

        self.store.save(&snapshot)
    }

    /// Copy of the current statistics.
    pub fn snapshot(&self) -> UsageStatistics {
        self.stats.lock().clone()
    }

    /// Totals plus the top-`top_n` models and users by descending count.
    ///
    /// Ties are broken by ascending name, so the ranking is deterministic.
    pub fn summary(&self, top_n: usize) -> UsageSummary {
        let stats = self.stats.lock();

        UsageSummary {
            total_conversations: stats.total_conversations,
            total_tokens: stats.total_tokens,
            avg_response_time: (stats.avg_response_time * 100.0).round() / 100.0,
            top_models: top_entries(&stats.model_usage, top_n),
            top_users: top_entries(&stats.user_activity, top_n),
        }
    }
}

fn top_entries(counts: &HashMap<String, u64>, top_n: usize) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> =
        counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(top_n);
    entries
}
