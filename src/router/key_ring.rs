//! Credential Key Ring
//!
//! Loads API credentials from numbered environment variables and selects
//! one at random when the caller does not specify a credential.

use crate::error::{ChatError, Result};

/// Prefix every well-formed credential must carry
pub const CREDENTIAL_PREFIX: &str = "sk-or-v1-";

/// Environment variable name prefix; slots are numbered 1..=MAX_KEY_SLOTS
pub const KEY_ENV_PREFIX: &str = "OPENROUTER_API_KEY_";

/// Number of credential slots
pub const MAX_KEY_SLOTS: usize = 4;

/// Ordered set of API credentials.
///
/// Slot order is significant: each position maps to one model in
/// [`crate::router::ModelBindings`].
#[derive(Debug, Clone)]
pub struct KeyRing {
    keys: Vec<String>,
}

impl KeyRing {
    /// Build a ring from explicit credentials.
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    /// Load credentials from `OPENROUTER_API_KEY_1..=4`.
    ///
    /// Absent or empty slots are skipped, yielding a shorter ring.
    pub fn from_env() -> Self {
        let keys = (1..=MAX_KEY_SLOTS)
            .filter_map(|i| std::env::var(format!("{}{}", KEY_ENV_PREFIX, i)).ok())
            .filter(|key| !key.is_empty())
            .collect();

        Self { keys }
    }

    /// Reject an empty ring and any credential missing the expected prefix.
    pub fn validate(&self) -> Result<()> {
        if self.keys.is_empty() {
            return Err(ChatError::Credentials(format!(
                "no API keys configured; set {}1..{}",
                KEY_ENV_PREFIX, MAX_KEY_SLOTS
            )));
        }

        for (i, key) in self.keys.iter().enumerate() {
            if !key.starts_with(CREDENTIAL_PREFIX) {
                return Err(ChatError::Credentials(format!(
                    "key in slot {} does not start with '{}'",
                    i + 1,
                    CREDENTIAL_PREFIX
                )));
            }
        }

        Ok(())
    }

    /// Uniformly random credential, or `None` when the ring is empty.
    pub fn random_key(&self) -> Option<&str> {
        use std::collections::hash_map::RandomState;
        use std::hash::{BuildHasher, Hasher};

        if self.keys.is_empty() {
            return None;
        }

        let hasher = RandomState::new().build_hasher();
        let idx = hasher.finish() as usize % self.keys.len();
        Some(&self.keys[idx])
    }

    /// Slot of a credential within the ring.
    pub fn position(&self, credential: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == credential)
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Redact a credential down to its trailing characters for display.
pub fn mask(key: &str) -> String {
    // counted in chars, so arbitrary caller-supplied credentials never split
    // a multibyte character
    let skip = key.chars().count().saturating_sub(8);
    let tail: String = key.chars().skip(skip).collect();
    format!("...{}", tail)
}
