//! Login Activity Log
//!
//! Append-only CSV with one row per successful login.

use crate::error::Result;
use crate::store::{format_row, parse_row};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

const HEADER: &str = "username,login_timestamp,session_id";

/// One successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginEntry {
    pub username: String,
    pub login_timestamp: String,
    pub session_id: String,
}

/// Aggregate view over the log
#[derive(Debug, Clone, Default)]
pub struct LoginStats {
    pub total_logins: usize,
    pub unique_users: usize,
    /// Last five entries, oldest first
    pub recent_logins: Vec<LoginEntry>,
}

/// CSV-backed login log
#[derive(Debug, Clone)]
pub struct LoginLog {
    path: PathBuf,
}

impl LoginLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn ensure_exists(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, format!("{}\n", HEADER))?;
        Ok(())
    }

    /// Append a login row and return it, including the fresh session id.
    pub fn record(&self, username: &str) -> Result<LoginEntry> {
        self.ensure_exists()?;

        let entry = LoginEntry {
            username: username.to_string(),
            login_timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            session_id: Uuid::new_v4().simple().to_string()[..8].to_string(),
        };

        let row = format_row(&[&entry.username, &entry.login_timestamp, &entry.session_id]);
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", row)?;

        Ok(entry)
    }

    /// Totals and the last five logins. Read failures are reported and
    /// yield an empty view.
    pub fn stats(&self) -> LoginStats {
        if !self.path.exists() {
            return LoginStats::default();
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read login log");
                return LoginStats::default();
            }
        };

        let entries: Vec<LoginEntry> = content
            .lines()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| {
                let fields = parse_row(line);
                if fields.len() >= 3 {
                    Some(LoginEntry {
                        username: fields[0].clone(),
                        login_timestamp: fields[1].clone(),
                        session_id: fields[2].clone(),
                    })
                } else {
                    None
                }
            })
            .collect();

        let unique_users = entries
            .iter()
            .map(|e| e.username.as_str())
            .collect::<HashSet<_>>()
            .len();

        let recent_start = entries.len().saturating_sub(5);
        LoginStats {
            total_logins: entries.len(),
            unique_users,
            recent_logins: entries[recent_start..].to_vec(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
