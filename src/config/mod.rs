//! Configuration Module
//!
//! Runtime configuration: data directory, provider endpoint, and request
//! parameters, with environment-variable overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "PROMPTDESK_DATA_DIR";

/// Environment variable overriding the provider base URL
pub const BASE_URL_ENV: &str = "PROMPTDESK_BASE_URL";

/// Default provider endpoint
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default system directive applied to a new conversation
pub const DEFAULT_SYSTEM_DIRECTIVE: &str = "You are a helpful AI assistant.";

/// Runtime configuration for the chat core
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Root directory holding all flat-file stores
    pub data_dir: PathBuf,

    /// Provider base URL (no trailing slash required)
    pub base_url: String,

    /// Referer header sent with provider requests
    pub referer: String,

    /// Application title header sent with provider requests
    pub app_title: String,

    /// Upper bound on a single provider call
    pub request_timeout: Duration,

    /// Optional cap on retained conversation turns; `None` means unbounded
    pub max_context_turns: Option<usize>,
}

impl ChatConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Reads a `.env` file when present.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            config.base_url = url;
        }

        config
    }

    /// Configuration rooted at an explicit data directory.
    pub fn with_data_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Path of the aggregate statistics snapshot.
    pub fn stats_path(&self) -> PathBuf {
        self.data_dir.join("analytics_data.json")
    }

    /// Directory holding one document per completed exchange.
    pub fn history_dir(&self) -> PathBuf {
        self.data_dir.join("conversation_history")
    }

    /// Path of the user credential table.
    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join("users.csv")
    }

    /// Path of the login activity log.
    pub fn login_log_path(&self) -> PathBuf {
        self.data_dir.join("user_log.csv")
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: "https://promptdesk.app".to_string(),
            app_title: "Promptdesk".to_string(),
            request_timeout: Duration::from_secs(30),
            max_context_turns: None,
        }
    }
}

/// Platform data directory, falling back to the working directory.
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("promptdesk"))
        .unwrap_or_else(|| PathBuf::from("."))
}
