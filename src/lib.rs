//! Promptdesk - Multi-Model Chat Core
//!
//! Conversation context, credential-to-model routing, and usage analytics
//! for a chat front-end. Each prompt is routed to a provider model selected
//! by the credential in use; completed exchanges are persisted per user and
//! folded into process-wide usage statistics.

use std::path::PathBuf;
use std::time::Instant;

use tracing::warn;

pub mod analytics;
pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod router;
pub mod store;

pub use analytics::{estimate_tokens, UsageAggregator, UsageRecord, UsageStatistics, UsageSummary};
pub use api::{ChatMessage, CompletionRequest, CompletionResponse, Role};
pub use auth::{Authenticator, Session};
pub use client::ProviderClient;
pub use config::ChatConfig;
pub use context::ConversationContext;
pub use error::{ChatError, ErrorHint, Result};
pub use router::{KeyRing, ModelBindings};
pub use store::{ConversationRecord, ConversationStore, ExportDocument, StatsStore};

use store::{LoginLog, UserStore};

/// Options for one prompt submission
#[derive(Debug, Clone)]
pub struct PromptOptions {
    /// Explicit credential; a random one is drawn when absent
    pub credential: Option<String>,

    /// Replay prior turns (and the directive) to the provider
    pub include_history: bool,
}

impl PromptOptions {
    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            credential: Some(credential.into()),
            ..Self::default()
        }
    }

    pub fn without_history() -> Self {
        Self {
            include_history: false,
            ..Self::default()
        }
    }
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            credential: None,
            include_history: true,
        }
    }
}

/// A successful exchange, ready for presentation
#[derive(Debug, Clone)]
pub struct Exchange {
    pub content: String,
    pub model: String,

    /// Redacted credential used for the call
    pub key_suffix: String,

    /// Latency in seconds
    pub response_time: f64,

    pub prompt_tokens: u64,
    pub response_tokens: u64,

    /// Where the conversation record landed; `None` when persisting failed
    pub record_path: Option<PathBuf>,
}

/// Outcome of one model in a comparison run
#[derive(Debug)]
pub struct ModelRun {
    pub model: String,

    /// Latency in seconds; zero when the call failed
    pub response_time: f64,

    pub prompt_tokens: u64,
    pub response_tokens: u64,

    pub outcome: Result<String>,
}

/// The main chat service.
///
/// Owns the key ring, model bindings, provider client, and the shared usage
/// aggregator. Conversation contexts are per session and passed in by the
/// caller; everything else is process-wide.
pub struct ChatService {
    config: ChatConfig,
    keys: KeyRing,
    bindings: ModelBindings,
    client: ProviderClient,
    aggregator: UsageAggregator,
    conversations: ConversationStore,
}

impl ChatService {
    /// Create a service with credentials from the environment.
    pub fn new(config: ChatConfig) -> Result<Self> {
        let keys = KeyRing::from_env();
        Self::with_key_ring(config, keys)
    }

    /// Create a service with an explicit key ring.
    pub fn with_key_ring(config: ChatConfig, keys: KeyRing) -> Result<Self> {
        keys.validate()?;

        let client = ProviderClient::new(&config)?;
        let aggregator = UsageAggregator::new(StatsStore::new(config.stats_path()));
        let conversations = ConversationStore::new(config.history_dir());

        Ok(Self {
            config,
            keys,
            bindings: ModelBindings::default(),
            client,
            aggregator,
            conversations,
        })
    }

    /// Fresh conversation context honoring the configured history cap.
    pub fn new_context(&self) -> ConversationContext {
        match self.config.max_context_turns {
            Some(cap) => ConversationContext::new().with_max_turns(cap),
            None => ConversationContext::new(),
        }
    }

    /// Authenticator over this service's user table and login log.
    pub fn authenticator(&self) -> Authenticator {
        Authenticator::new(
            UserStore::new(self.config.users_path()),
            LoginLog::new(self.config.login_log_path()),
        )
    }

    /// Submit a prompt within a session context.
    ///
    /// Resolves the credential and model, appends the user turn, calls the
    /// provider, and on success appends the assistant turn, persists the
    /// conversation record, and folds the exchange into the usage
    /// statistics. Storage failures after a successful exchange are
    /// reported but do not fail the call; the user turn stays in the
    /// context even when the provider call fails.
    pub async fn send_prompt(
        &self,
        ctx: &mut ConversationContext,
        username: &str,
        prompt: &str,
        options: PromptOptions,
    ) -> Result<Exchange> {
        let credential = match options.credential {
            Some(credential) => credential,
            None => self
                .keys
                .random_key()
                .ok_or_else(|| ChatError::Credentials("No API keys available".to_string()))?
                .to_string(),
        };
        let model = self.bindings.resolve(&self.keys, &credential).to_string();

        ctx.append(Role::User, prompt);
        let messages = ctx.build_request_messages(options.include_history);
        let request = CompletionRequest::new(model.clone(), messages);

        let start = Instant::now();
        let response = self.call_provider(&credential, &request).await?;
        let elapsed = start.elapsed();

        let content = response.content().unwrap_or_default().to_string();
        ctx.append(Role::Assistant, content.clone());

        let prompt_tokens = estimate_tokens(prompt);
        let response_tokens = estimate_tokens(&content);

        let record = ConversationRecord::new(
            username,
            prompt,
            &content,
            &model,
            elapsed.as_secs_f64(),
            prompt_tokens,
            response_tokens,
        );
        let record_path = match self.conversations.save(&record) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "failed to persist conversation record");
                None
            }
        };

        let usage = UsageRecord::new(username, &model, elapsed, prompt_tokens, response_tokens);
        if let Err(e) = self.aggregator.apply(&usage) {
            warn!(error = %e, "failed to persist usage statistics");
        }

        Ok(Exchange {
            content,
            model,
            key_suffix: router::mask(&credential),
            response_time: elapsed.as_secs_f64(),
            prompt_tokens,
            response_tokens,
            record_path,
        })
    }

    /// Run the same prompt against every bound credential, without history.
    pub async fn compare_models(&self, prompt: &str) -> Vec<ModelRun> {
        let prompt_tokens = estimate_tokens(prompt);

        let runs = self.keys.keys().iter().map(|credential| {
            let model = self.bindings.resolve(&self.keys, credential).to_string();
            let request =
                CompletionRequest::new(model.clone(), vec![ChatMessage::user(prompt)]);

            async move {
                let start = Instant::now();
                match self.call_provider(credential, &request).await {
                    Ok(response) => {
                        let content = response.content().unwrap_or_default().to_string();
                        ModelRun {
                            model,
                            response_time: start.elapsed().as_secs_f64(),
                            prompt_tokens,
                            response_tokens: estimate_tokens(&content),
                            outcome: Ok(content),
                        }
                    }
                    Err(e) => ModelRun {
                        model,
                        response_time: 0.0,
                        prompt_tokens,
                        response_tokens: 0,
                        outcome: Err(e),
                    },
                }
            }
        });

        futures::future::join_all(runs).await
    }

    /// Probe a credential with a canned prompt.
    pub async fn test_connection(&self, credential: &str) -> bool {
        let model = self.bindings.resolve(&self.keys, credential).to_string();
        let request = CompletionRequest::new(
            model,
            vec![ChatMessage::user(
                "Hello, please respond with 'API connection successful'",
            )],
        );
        self.call_provider(credential, &request).await.is_ok()
    }

    /// Provider call under the configured upper bound. The bound is
    /// enforced here as well as inside the HTTP client so a stalled call
    /// can never outlive it.
    async fn call_provider(
        &self,
        credential: &str,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse> {
        tokio::time::timeout(
            self.config.request_timeout,
            self.client.complete(credential, request),
        )
        .await
        .map_err(|_| {
            ChatError::Timeout(format!(
                "provider call exceeded {}s",
                self.config.request_timeout.as_secs()
            ))
        })?
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn keys(&self) -> &KeyRing {
        &self.keys
    }

    pub fn bindings(&self) -> &ModelBindings {
        &self.bindings
    }

    pub fn aggregator(&self) -> &UsageAggregator {
        &self.aggregator
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }
}
