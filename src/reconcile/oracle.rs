/*!
 * The completion oracle seam.
 *
 * The engine only sees `Oracle::complete`: a rendered prompt plus a response
 * schema in, parsed JSON or a typed `ProviderError` out. `OracleService`
 * implements it on top of the HTTP provider clients chosen by configuration.
 */

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use url::Url;

use crate::app_config::{OracleConfig, OracleProvider};
use crate::errors::ProviderError;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::ollama::{ChatMessage, ChatRequest, Ollama};
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::{Provider, RetryPolicy};

use super::prompts::ResponseSchema;

/// External text-completion service invoked once per window
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Complete `prompt`, constraining the answer to `schema`
    async fn complete(&self, prompt: &str, schema: &ResponseSchema) -> Result<Value, ProviderError>;
}

/// Parse a completion text into JSON, tolerating a Markdown code fence
pub fn parse_completion(text: &str) -> Result<Value, ProviderError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(ProviderError::InvalidCompletion("oracle returned an empty completion".to_string()));
    }
    serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidCompletion(e.to_string()))
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) up to the first newline
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Validate a provider endpoint and normalize it without a trailing slash
fn validate_endpoint(endpoint: &str) -> Result<String> {
    let url = Url::parse(endpoint)
        .map_err(|e| anyhow!("Invalid endpoint '{}': {}", endpoint, e))?;
    match url.scheme() {
        "http" | "https" => Ok(endpoint.trim_end_matches('/').to_string()),
        scheme => Err(anyhow!("Unsupported endpoint scheme '{}' in {}", scheme, endpoint)),
    }
}

/// Oracle backend variants
enum OracleBackend {
    /// OpenAI API service
    OpenAI {
        client: OpenAI,
    },

    /// LM Studio local server (OpenAI-compatible)
    LMStudio {
        client: OpenAI,
    },

    /// Anthropic API service
    Anthropic {
        client: Anthropic,
    },

    /// Ollama LLM service
    Ollama {
        client: Ollama,
    },
}

/// Oracle backed by one of the configured LLM providers
pub struct OracleService {
    backend: OracleBackend,
    provider: OracleProvider,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OracleService {
    /// Create the oracle for the active provider of `config`
    pub fn new(config: &OracleConfig) -> Result<Self> {
        let endpoint = validate_endpoint(&config.get_endpoint())?;
        let timeout_secs = config.get_timeout_secs();
        let retry = RetryPolicy {
            max_retries: config.common.retry_count,
            backoff_base_ms: config.common.retry_backoff_ms,
            rate_limit: config.get_rate_limit(),
        };

        let backend = match config.provider {
            OracleProvider::OpenAI => OracleBackend::OpenAI {
                client: OpenAI::new_with_config(config.get_api_key(), endpoint, timeout_secs, retry),
            },
            OracleProvider::LMStudio => {
                // LM Studio accepts any key
                let api_key = {
                    let key = config.get_api_key();
                    if key.is_empty() { "lm-studio".to_string() } else { key }
                };
                OracleBackend::LMStudio {
                    client: OpenAI::new_with_config(api_key, endpoint, timeout_secs, retry),
                }
            }
            OracleProvider::Anthropic => OracleBackend::Anthropic {
                client: Anthropic::new_with_config(config.get_api_key(), endpoint, timeout_secs, retry),
            },
            OracleProvider::Ollama => OracleBackend::Ollama {
                client: Ollama::new_with_config(endpoint, timeout_secs, retry),
            },
        };

        Ok(Self {
            backend,
            provider: config.provider.clone(),
            model: config.get_model(),
            temperature: config.common.temperature,
            max_tokens: config.common.max_tokens,
        })
    }

    pub fn provider(&self) -> &OracleProvider {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Oracle for OracleService {
    async fn complete(&self, prompt: &str, schema: &ResponseSchema) -> Result<Value, ProviderError> {
        let text = match &self.backend {
            OracleBackend::OpenAI { client } | OracleBackend::LMStudio { client } => {
                let request = OpenAIRequest::new(&self.model)
                    .add_message("user", prompt)
                    .temperature(self.temperature)
                    .max_tokens(self.max_tokens)
                    .response_format(schema.openai_response_format());
                let response = client.complete(request).await?;
                if let Some(usage) = &response.usage {
                    debug!(
                        "{} tokens: {} prompt, {} completion",
                        self.provider.display_name(), usage.prompt_tokens, usage.completion_tokens
                    );
                }
                OpenAI::extract_text(&response)
            }
            OracleBackend::Anthropic { client } => {
                let request = AnthropicRequest::new(&self.model, self.max_tokens)
                    .system(schema.instruction())
                    .add_message("user", prompt)
                    .temperature(self.temperature);
                let response = client.complete(request).await?;
                debug!(
                    "Anthropic tokens: {} input, {} output",
                    response.usage.input_tokens, response.usage.output_tokens
                );
                Anthropic::extract_text(&response)
            }
            OracleBackend::Ollama { client } => {
                let messages = vec![ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                }];
                let request = ChatRequest::new(&self.model, messages)
                    .format(schema.json_schema())
                    .temperature(self.temperature)
                    .num_predict(self.max_tokens);
                let response = client.complete(request).await?;
                Ollama::extract_text(&response)
            }
        };

        debug!("{} v{} completion: {} chars", schema.name(), schema.version(), text.len());
        parse_completion(&text)
    }
}
