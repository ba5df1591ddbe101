//! Router Module
//!
//! Credential management and credential-to-model binding.

pub mod bindings;
pub mod key_ring;

pub use bindings::{display_name, ModelBindings, DEFAULT_MODELS};
pub use key_ring::{mask, KeyRing, CREDENTIAL_PREFIX, KEY_ENV_PREFIX, MAX_KEY_SLOTS};
