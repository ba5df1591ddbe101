//! Statistics Snapshot Store
//!
//! Single JSON document holding the aggregate usage statistics. Saved by
//! overwriting the previous snapshot; a missing or corrupt snapshot loads
//! as zeroed statistics.

use crate::analytics::UsageStatistics;
use crate::error::{ChatError, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Durable store for the [`UsageStatistics`] singleton
#[derive(Debug, Clone)]
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the persisted snapshot.
    ///
    /// A missing file is the normal bootstrap case and yields zeroed
    /// statistics; an unreadable or malformed file is reported and also
    /// falls back to zeroed statistics.
    pub fn load(&self) -> UsageStatistics {
        if !self.path.exists() {
            return UsageStatistics::default();
        }

        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(stats) => stats,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "malformed statistics snapshot, starting from zero");
                    UsageStatistics::default()
                }
            },
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read statistics snapshot, starting from zero");
                UsageStatistics::default()
            }
        }
    }

    /// Overwrite the snapshot with the full statistics object.
    pub fn save(&self, stats: &UsageStatistics) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(stats)
            .map_err(|e| ChatError::Storage(format!("Failed to encode statistics: {}", e)))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::UsageRecord;
    use std::time::Duration;
    use tempfile::TempDir;

    fn record(user: &str, model: &str, secs: f64) -> UsageRecord {
        UsageRecord::new(user, model, Duration::from_secs_f64(secs), 100, 20)
    }

    #[test]
    fn test_load_missing_file_is_zeroed() {
        let dir = TempDir::new().unwrap();
        let store = StatsStore::new(dir.path().join("analytics_data.json"));

        let stats = store.load();
        assert_eq!(stats.total_conversations, 0);
        assert_eq!(stats.avg_response_time, 0.0);
        assert!(stats.model_usage.is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_zeroed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("analytics_data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let stats = StatsStore::new(&path).load();
        assert_eq!(stats.total_conversations, 0);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = StatsStore::new(dir.path().join("analytics_data.json"));

        let mut stats = UsageStatistics::default();
        stats.record(&record("alice", "deepseek/deepseek-chat", 1.5));
        stats.record(&record("bob", "qwen/qwen-2.5-72b-instruct", 2.5));

        store.save(&stats).unwrap();
        let loaded = store.load();

        assert_eq!(loaded, stats);
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = StatsStore::new(dir.path().join("analytics_data.json"));

        let mut stats = UsageStatistics::default();
        stats.record(&record("alice", "m", 1.0));
        store.save(&stats).unwrap();

        stats.record(&record("alice", "m", 3.0));
        store.save(&stats).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.total_conversations, 2);
        assert_eq!(loaded.avg_response_time, 2.0);
    }
}
