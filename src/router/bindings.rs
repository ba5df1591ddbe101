//! Credential-to-Model Bindings
//!
//! Fixed positional pairing of credential slots to model identifiers.

use crate::router::KeyRing;

/// Models bound to credential slots 1..=4, in order
pub const DEFAULT_MODELS: [&str; 4] = [
    "deepseek/deepseek-chat",
    "google/gemini-2.0-flash-exp:free",
    "01-ai/yi-large",
    "qwen/qwen-2.5-72b-instruct",
];

/// Ordered model table resolved against a [`KeyRing`] by position.
///
/// Read-only at runtime. Resolution is a total function: an unknown
/// credential, an empty ring, or a slot past the table all fall back to the
/// first model rather than failing, because callers have no "no model" path.
#[derive(Debug, Clone)]
pub struct ModelBindings {
    models: Vec<String>,
}

impl ModelBindings {
    /// Bindings over a custom model table. An empty table falls back to the
    /// built-in one so the default branch always exists.
    pub fn new(models: Vec<String>) -> Self {
        if models.is_empty() {
            return Self::default();
        }
        Self { models }
    }

    /// The designated fallback model (first entry).
    pub fn default_model(&self) -> &str {
        &self.models[0]
    }

    /// Model bound to the slot of `credential` within `keys`.
    ///
    /// Falls back to [`Self::default_model`] when the credential is absent
    /// from the ring or its slot exceeds the table.
    pub fn resolve<'a>(&'a self, keys: &KeyRing, credential: &str) -> &'a str {
        match keys.position(credential) {
            Some(idx) if idx < self.models.len() => &self.models[idx],
            _ => self.default_model(),
        }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }
}

impl Default for ModelBindings {
    fn default() -> Self {
        Self {
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// User-friendly display name for a model identifier.
pub fn display_name(model: &str) -> &str {
    match model {
        "deepseek/deepseek-chat" => "DeepSeek Chat",
        "google/gemini-2.0-flash-exp:free" => "Gemini 2.0 Flash",
        "01-ai/yi-large" => "Yi Large",
        "qwen/qwen-2.5-72b-instruct" => "Qwen 2.5 72B",
        other => other,
    }
}
