//! Conversation Record Store
//!
//! One JSON document per completed exchange, plus the on-demand export that
//! combines a user's records into a single document.

use crate::error::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

/// Durable record of one completed exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub username: String,

    /// Human-readable timestamp, `%Y-%m-%d %H:%M:%S`
    pub timestamp: String,

    pub prompt: String,
    pub response: String,
    pub model: String,

    /// Latency of the exchange in seconds
    pub response_time: f64,

    pub prompt_tokens: u64,
    pub response_tokens: u64,
    pub total_tokens: u64,
}

impl ConversationRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        username: impl Into<String>,
        prompt: impl Into<String>,
        response: impl Into<String>,
        model: impl Into<String>,
        response_time: f64,
        prompt_tokens: u64,
        response_tokens: u64,
    ) -> Self {
        Self {
            username: username.into(),
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            prompt: prompt.into(),
            response: response.into(),
            model: model.into(),
            response_time,
            prompt_tokens,
            response_tokens,
            total_tokens: prompt_tokens + response_tokens,
        }
    }
}

/// Combined export of every record belonging to one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub username: String,

    /// When the export was produced, `%Y-%m-%d %H:%M:%S`
    pub export_date: String,

    pub conversation_count: usize,
    pub conversations: Vec<ConversationRecord>,
}

impl ExportDocument {
    /// Serialize to pretty JSON bytes for download.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| ChatError::Storage(format!("Failed to encode export: {}", e)))
    }
}

/// Directory of per-exchange JSON records
#[derive(Debug, Clone)]
pub struct ConversationStore {
    dir: PathBuf,
}

impl ConversationStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Persist one record.
    ///
    /// Names are `{username}_{YYYYmmdd_HHMMSS}_{suffix}.json`; the random
    /// suffix keeps two exchanges by the same user within one second from
    /// overwriting each other.
    pub fn save(&self, record: &ConversationRecord) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;

        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let suffix = Uuid::new_v4().simple().to_string();
        let path = self
            .dir
            .join(format!("{}_{}_{}.json", record.username, stamp, &suffix[..8]));

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| ChatError::Storage(format!("Failed to encode record: {}", e)))?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    /// All records for a user, newest first. Malformed files are reported
    /// and skipped.
    pub fn list_for_user(&self, username: &str) -> Vec<ConversationRecord> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let prefix = format!("{}_", username);
        let mut records = Vec::new();

        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.starts_with(&prefix) || !name.ends_with(".json") {
                continue;
            }

            match std::fs::read_to_string(entry.path()) {
                Ok(content) => match serde_json::from_str::<ConversationRecord>(&content) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        warn!(file = %name, error = %e, "skipping malformed conversation record");
                    }
                },
                Err(e) => {
                    warn!(file = %name, error = %e, "failed to read conversation record");
                }
            }
        }

        // timestamp format sorts lexicographically
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }

    /// Combine every record for a user into one export document.
    ///
    /// Returns `None` when the user has no records.
    pub fn export_user(&self, username: &str) -> Option<ExportDocument> {
        let conversations = self.list_for_user(username);
        if conversations.is_empty() {
            return None;
        }

        Some(ExportDocument {
            username: username.to_string(),
            export_date: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            conversation_count: conversations.len(),
            conversations,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(username: &str, prompt: &str) -> ConversationRecord {
        ConversationRecord::new(
            username,
            prompt,
            "a response",
            "deepseek/deepseek-chat",
            1.25,
            40,
            60,
        )
    }

    #[test]
    fn test_record_totals_tokens() {
        let r = record("alice", "hi");
        assert_eq!(r.total_tokens, 100);
    }

    #[test]
    fn test_save_and_list() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::new(dir.path());

        store.save(&record("alice", "first")).unwrap();
        store.save(&record("alice", "second")).unwrap();
        store.save(&record("bob", "other user")).unwrap();

        let records = store.list_for_user("alice");
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.username == "alice"));
    }

    #[test]
    fn test_same_second_saves_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::new(dir.path());

        let a = store.save(&record("alice", "one")).unwrap();
        let b = store.save(&record("alice", "two")).unwrap();

        assert_ne!(a, b);
        assert_eq!(store.list_for_user("alice").len(), 2);
    }

    #[test]
    fn test_list_skips_malformed_files() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::new(dir.path());

        store.save(&record("alice", "good")).unwrap();
        std::fs::write(dir.path().join("alice_20240101_000000_deadbeef.json"), "nope").unwrap();

        let records = store.list_for_user("alice");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].prompt, "good");
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let store = ConversationStore::new("/nonexistent/promptdesk-history");
        assert!(store.list_for_user("alice").is_empty());
    }

    #[test]
    fn test_export_combines_records() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::new(dir.path());

        store.save(&record("alice", "one")).unwrap();
        store.save(&record("alice", "two")).unwrap();

        let export = store.export_user("alice").unwrap();
        assert_eq!(export.username, "alice");
        assert_eq!(export.conversation_count, 2);
        assert_eq!(export.conversations.len(), 2);

        let bytes = export.to_json_bytes().unwrap();
        let parsed: ExportDocument = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.conversation_count, 2);
    }

    #[test]
    fn test_export_none_without_records() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::new(dir.path());
        assert!(store.export_user("nobody").is_none());
    }
}
