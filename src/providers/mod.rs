/*!
 * Provider implementations for the completion oracle.
 *
 * This module contains client implementations for various LLM providers:
 * - OpenAI: OpenAI API integration (also serves LM Studio)
 * - Anthropic: Anthropic API integration
 * - Ollama: Local LLM server
 * - Mock: scripted oracle for tests
 *
 * Retries with exponential backoff live here, never in the reconciliation loop.
 */

use async_trait::async_trait;
use log::{error, warn};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the oracle service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Extract the completion text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

/// Retry and pacing settings shared by the HTTP clients
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first try
    pub max_retries: u32,
    /// Base backoff time in milliseconds, doubled on each retry
    pub backoff_base_ms: u64,
    /// Optional rate limit in requests per minute
    pub rate_limit: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base_ms: 1000,
            rate_limit: None,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let backoff = self.backoff_base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(16));
        let pacing = match self.rate_limit {
            Some(per_minute) if per_minute > 0 => 60_000 / per_minute as u64,
            _ => 0,
        };
        Duration::from_millis(backoff.max(pacing))
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error or retries run out
    pub async fn run<T, F, Fut>(&self, provider_name: &str, mut operation: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.delay_for(attempt);
                    warn!(
                        "{} request failed: {} - attempt {}/{}, retrying in {:?}",
                        provider_name, e, attempt, self.max_retries + 1, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Map a reqwest send failure to a provider error
pub(crate) fn send_error(provider_name: &str, error: reqwest::Error) -> ProviderError {
    if error.is_builder() {
        ProviderError::RequestFailed(format!("Invalid request to {}: {}", provider_name, error))
    } else {
        ProviderError::ConnectionError(format!("Failed to send request to {}: {}", provider_name, error))
    }
}

/// Read a response body, turning non-success statuses into typed errors
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider_name: &str,
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    let body = response.text().await
        .map_err(|e| ProviderError::ConnectionError(format!("Failed to read {} response: {}", provider_name, e)))?;

    if !status.is_success() {
        error!("{} API error ({}): {}", provider_name, status, body);
        return Err(ProviderError::from_status(status.as_u16(), body));
    }

    serde_json::from_str(&body)
        .map_err(|e| ProviderError::ParseError(format!("{} response: {}", provider_name, e)))
}

pub mod anthropic;
pub mod mock;
pub mod ollama;
pub mod openai;
