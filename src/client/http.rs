//! Provider HTTP Client
//!
//! Single-shot chat completion calls over HTTPS JSON. No automatic retry:
//! a transport error, non-2xx status, or malformed body surfaces as one
//! structured failure.

use crate::api::{CompletionRequest, CompletionResponse};
use crate::config::ChatConfig;
use crate::error::{ChatError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// HTTP client for the chat completions endpoint
pub struct ProviderClient {
    /// Inner reqwest client
    client: Client,

    /// Provider base URL
    base_url: String,

    /// Static headers sent with every request
    extra_headers: HeaderMap,
}

impl ProviderClient {
    /// Create a client from the runtime configuration.
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| ChatError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let mut extra_headers = HeaderMap::new();
        for (name, value) in [
            ("http-referer", config.referer.as_str()),
            ("x-title", config.app_title.as_str()),
        ] {
            let name = HeaderName::try_from(name)
                .map_err(|e| ChatError::Config(format!("Invalid header name: {}", e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ChatError::Config(format!("Invalid header value: {}", e)))?;
            extra_headers.insert(name, value);
        }

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            extra_headers,
        })
    }

    /// Make one completion call with a bearer credential.
    pub async fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse> {
        let url = format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        );

        let mut headers = self.extra_headers.clone();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| ChatError::Config(format!("Invalid API key format: {}", e)))?,
        );

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(ChatError::Auth(format!("{}: {}", status.as_u16(), body)));
            }
            return Err(ChatError::Provider {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: CompletionResponse = serde_json::from_str(&body).map_err(|e| {
            ChatError::Response(format!(
                "Failed to parse response: {}. Body: {}",
                e,
                truncate_on_boundary(&body, 500)
            ))
        })?;

        if parsed.content().is_none() {
            return Err(ChatError::Response(
                "No response content received".to_string(),
            ));
        }

        Ok(parsed)
    }
}

/// Cut a string to at most `max` bytes without splitting a character.
fn truncate_on_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
