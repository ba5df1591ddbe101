//! User Credential Table
//!
//! Append-only CSV of registered users, merged over a fixed set of built-in
//! demo accounts. Passwords are stored and compared in plaintext.

use crate::error::Result;
use crate::store::{format_row, parse_row};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Built-in demo accounts, always present
pub const DEMO_USERS: [(&str, &str); 4] = [
    ("admin", "password123"),
    ("user", "user123"),
    ("demo", "demo123"),
    ("test", "test123"),
];

const HEADER: &str = "username,password,registration_date,email";

/// CSV-backed user table
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create the file with its header when missing.
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

    /// Username-to-password map: demo accounts first, CSV rows layered on
    /// top so a registered row overrides a demo account sharing a username.
    pub fn load(&self) -> HashMap<String, String> {
        let mut users: HashMap<String, String> = DEMO_USERS
            .iter()
            .map(|(u, p)| (u.to_string(), p.to_string()))
            .collect();

        if let Err(e) = self.ensure_exists() {
            warn!(path = %self.path.display(), error = %e, "failed to create user table");
            return users;
        }

        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                for line in content.lines().skip(1) {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let fields = parse_row(line);
                    if fields.len() >= 2 {
                        users.insert(fields[0].clone(), fields[1].clone());
                    }
                }
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read user table");
            }
        }

        users
    }

    /// Append a newly registered user.
    pub fn append(&self, username: &str, password: &str, email: &str) -> Result<()> {
        self.ensure_exists()?;

        let registration_date = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let row = format_row(&[username, password, &registration_date, email]);

        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", row)?;
        Ok(())
    }

    /// Whether a username is taken (demo or registered).
    pub fn exists(&self, username: &str) -> bool {
        self.load().contains_key(username)
    }

    /// Total number of known users.
    pub fn count(&self) -> usize {
        self.load().len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> UserStore {
        UserStore::new(dir.path().join("users.csv"))
    }

    #[test]
    fn test_demo_users_always_present() {
        let dir = TempDir::new().unwrap();
        let users = store(&dir).load();

        assert_eq!(users.get("admin").map(String::as_str), Some("password123"));
        assert_eq!(users.len(), DEMO_USERS.len());
    }

    #[test]
    fn test_registered_user_is_merged() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.append("alice", "hunter2!", "alice@example.com").unwrap();

        let users = store.load();
        assert_eq!(users.get("alice").map(String::as_str), Some("hunter2!"));
        assert_eq!(users.len(), DEMO_USERS.len() + 1);
    }

    #[test]
    fn test_csv_row_overrides_demo_account() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.append("demo", "replaced456", "").unwrap();

        let users = store.load();
        assert_eq!(users.get("demo").map(String::as_str), Some("replaced456"));
    }

    #[test]
    fn test_exists_and_count() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert!(store.exists("admin"));
        assert!(!store.exists("alice"));

        store.append("alice", "secret1", "").unwrap();
        assert!(store.exists("alice"));
        assert_eq!(store.count(), DEMO_USERS.len() + 1);
    }

    #[test]
    fn test_password_with_comma_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.append("alice", "a,b\"c", "").unwrap();
        assert_eq!(store.load().get("alice").map(String::as_str), Some("a,b\"c"));
    }
}
