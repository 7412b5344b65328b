//! # Arbitration Providers
//!
//! One [`Provider`] wraps a `reqwest::Client` for a single OpenAI-compatible
//! chat-completions endpoint, with the provider's bearer token baked into
//! default headers and a per-request timeout. Providers are built once at
//! startup and shared; credentials live here and nowhere else.
//!
//! Generation parameters favor determinism: temperature 0.3 and a JSON
//! response format, matching what the dispute-analysis task needs from
//! every backend.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ArbiterError;

/// Sampling temperature for dispute analysis.
const TEMPERATURE: f32 = 0.3;

/// Configuration for one provider in the fallback chain.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Name used in logs and failure reports (e.g. `"fastrouter"`).
    pub name: String,
    /// Base URL of the OpenAI-compatible API (e.g.
    /// `https://api.openai.com/v1`).
    pub base_url: String,
    /// Bearer token for the provider.
    pub api_key: String,
    /// Model identifier to request.
    pub model: String,
    /// Per-request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Create a configuration with the default timeout.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            timeout_secs: 30,
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// A ready-to-call arbitration backend.
#[derive(Debug)]
pub struct Provider {
    name: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl Provider {
    /// Build a provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ArbiterError::NotConfigured`] if the API key contains
    /// characters invalid in a header or the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, ArbiterError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                        .map_err(|_| ArbiterError::NotConfigured {
                            reason: format!("provider {}: invalid API key characters", config.name),
                        })?,
                );
                headers.insert(
                    reqwest::header::CONTENT_TYPE,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .map_err(|e| ArbiterError::NotConfigured {
                reason: format!("provider {}: failed to build HTTP client: {e}", config.name),
            })?;

        Ok(Self {
            name: config.name,
            model: config.model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// The provider's configured name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run one chat completion and return the raw message content.
    ///
    /// Any failure (transport error, timeout, non-2xx status, missing
    /// choices) comes back as a plain reason string; the router turns those
    /// into fallback advancement, never retries against the same provider.
    pub(crate) async fn complete(&self, prompt: &str) -> Result<String, String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: "You are a legal dispute analysis AI. Return ONLY valid JSON \
                              with no markdown formatting.",
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    format!("transport error: {e}")
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(format!("HTTP {status}: {body}"));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| format!("response deserialization failed: {e}"))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| "response contained no choices".to_string())?;
        Ok(content)
    }
}
