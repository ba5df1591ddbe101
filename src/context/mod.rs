//! Conversation Context
//!
//! Session-scoped message history giving the provider memory of prior
//! exchanges.

use crate::api::{ChatMessage, Role};
use crate::config::DEFAULT_SYSTEM_DIRECTIVE;

/// Ordered message log plus a system directive for one active session.
///
/// The directive, when set, is always the first element of the payload sent
/// to the provider but is never stored inside the message sequence itself.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    /// Turn history in insertion order
    messages: Vec<ChatMessage>,

    /// System directive prepended to provider payloads
    directive: Option<String>,

    /// Optional cap on retained turns; oldest entries are evicted first
    max_turns: Option<usize>,
}

impl ConversationContext {
    /// Create an empty context with the default directive.
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            directive: Some(DEFAULT_SYSTEM_DIRECTIVE.to_string()),
            max_turns: None,
        }
    }

    /// Create an empty context with a custom directive.
    pub fn with_directive(directive: impl Into<String>) -> Self {
        Self {
            directive: Some(directive.into()),
            ..Self::new()
        }
    }

    /// Cap the retained history. Growth past the cap evicts oldest-first.
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    /// Append a message to the history.
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage::new(role, content));

        if let Some(cap) = self.max_turns {
            if self.messages.len() > cap {
                let excess = self.messages.len() - cap;
                self.messages.drain(..excess);
            }
        }
    }

    /// Build the message payload for a provider request.
    ///
    /// The caller appends the new user turn before calling this, so the most
    /// recent entry is the outgoing prompt. With `include_history` the
    /// payload is the directive (if set), every prior turn, then the new
    /// prompt; the prompt is never duplicated inside the history slice.
    /// Without history the payload is the new prompt alone, with no
    /// directive.
    pub fn build_request_messages(&self, include_history: bool) -> Vec<ChatMessage> {
        let Some((latest, history)) = self.messages.split_last() else {
            return Vec::new();
        };

        if !include_history {
            return vec![latest.clone()];
        }

        let mut payload = Vec::with_capacity(self.messages.len() + 1);
        if let Some(directive) = &self.directive {
            payload.push(ChatMessage::system(directive.clone()));
        }
        payload.extend(history.iter().cloned());
        payload.push(latest.clone());
        payload
    }

    /// Clear the message history. The directive is preserved.
    pub fn reset(&mut self) {
        self.messages.clear();
    }

    /// Replace the system directive.
    pub fn set_directive(&mut self, directive: impl Into<String>) {
        self.directive = Some(directive.into());
    }

    /// Remove the system directive.
    pub fn clear_directive(&mut self) {
        self.directive = None;
    }

    /// Current directive, if any.
    pub fn directive(&self) -> Option<&str> {
        self.directive.as_deref()
    }

    /// Turn history in insertion order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_with_history() {
        let mut ctx = ConversationContext::with_directive("Be terse.");
        ctx.append(Role::User, "u1");
        ctx.append(Role::Assistant, "a1");
        ctx.append(Role::User, "u2");

        let payload = ctx.build_request_messages(true);
        let contents: Vec<&str> = payload.iter().map(|m| m.content.as_str()).collect();

        assert_eq!(contents, vec!["Be terse.", "u1", "a1", "u2"]);
        assert_eq!(payload[0].role, Role::System);
        // the outgoing prompt appears exactly once
        assert_eq!(contents.iter().filter(|c| **c == "u2").count(), 1);
    }

    #[test]
    fn test_payload_without_history_drops_directive() {
        let mut ctx = ConversationContext::new();
        ctx.append(Role::User, "u1");
        ctx.append(Role::Assistant, "a1");
        ctx.append(Role::User, "u2");

        let payload = ctx.build_request_messages(false);
        assert_eq!(payload.len(), 1);
        assert_eq!(payload[0].content, "u2");
        assert_eq!(payload[0].role, Role::User);
    }

    #[test]
    fn test_payload_on_empty_context() {
        let ctx = ConversationContext::new();
        assert!(ctx.build_request_messages(true).is_empty());
        assert!(ctx.build_request_messages(false).is_empty());
    }

    #[test]
    fn test_reset_preserves_directive() {
        let mut ctx = ConversationContext::with_directive("Stay in character.");
        ctx.append(Role::User, "hello");
        ctx.reset();

        assert!(ctx.is_empty());
        assert_eq!(ctx.directive(), Some("Stay in character."));
    }

    #[test]
    fn test_unbounded_growth_by_default() {
        let mut ctx = ConversationContext::new();
        for i in 0..500 {
            ctx.append(Role::User, format!("m{}", i));
        }
        assert_eq!(ctx.len(), 500);
    }

    #[test]
    fn test_max_turns_evicts_oldest_first() {
        let mut ctx = ConversationContext::new().with_max_turns(3);
        ctx.append(Role::User, "u1");
        ctx.append(Role::Assistant, "a1");
        ctx.append(Role::User, "u2");
        ctx.append(Role::Assistant, "a2");

        let contents: Vec<&str> = ctx.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["a1", "u2", "a2"]);
    }
}
