use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::reconcile::window::WindowConfig;
use crate::subtitle_processor::resolve_encoding;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Oracle (LLM provider) settings
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Window settings of the alignment mode
    #[serde(default)]
    pub alignment: AlignmentConfig,

    /// Window settings of the translation mode
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Subtitle file handling
    #[serde(default)]
    pub subtitles: SubtitleConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Oracle provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OracleProvider {
    // @provider: OpenAI
    #[default]
    OpenAI,
    // @provider: Anthropic
    Anthropic,
    // @provider: Ollama
    Ollama,
    // @provider: LM Studio (OpenAI-compatible local server)
    LMStudio,
}

impl OracleProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Ollama => "Ollama",
            Self::LMStudio => "LM Studio",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::LMStudio => "lmstudio".to_string(),
        }
    }

    /// Hosted providers refuse requests without an API key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAI | Self::Anthropic)
    }
}

impl std::fmt::Display for OracleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for OracleProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            "lmstudio" => Ok(Self::LMStudio),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Rate limit (requests per minute)
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: OracleProvider) -> Self {
        Self {
            provider_type: provider_type.to_lowercase_string(),
            model: default_model(&provider_type),
            api_key: String::new(),
            endpoint: default_endpoint(&provider_type),
            timeout_secs: default_timeout_secs(),
            rate_limit: default_rate_limit(&provider_type),
        }
    }
}

/// Oracle settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OracleConfig {
    /// Provider to use
    #[serde(default)]
    pub provider: OracleProvider,

    /// Available providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Settings applicable to all providers
    #[serde(default)]
    pub common: OracleCommonConfig,
}

/// Common oracle settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OracleCommonConfig {
    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff base for retries (in milliseconds), doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens the oracle may generate per window
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for OracleCommonConfig {
    fn default() -> Self {
        Self {
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Alignment mode settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AlignmentConfig {
    /// Cues per list and round
    #[serde(default = "default_alignment_window_size")]
    pub window_size: usize,

    /// Trailing matches re-shown in the next round
    #[serde(default = "default_alignment_overlap")]
    pub overlap: usize,

    /// Inserted before `.srt` in the derived output file name
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            window_size: default_alignment_window_size(),
            overlap: default_alignment_overlap(),
            output_suffix: default_output_suffix(),
        }
    }
}

impl AlignmentConfig {
    pub fn window(&self) -> Result<WindowConfig> {
        WindowConfig::new(self.window_size, self.overlap)
            .map_err(|e| anyhow!("alignment: {}", e))
    }
}

/// Translation mode settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Cues per round
    #[serde(default = "default_translation_window_size")]
    pub window_size: usize,

    /// Cues re-translated at the start of the next round
    #[serde(default)]
    pub overlap: usize,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            window_size: default_translation_window_size(),
            overlap: 0,
        }
    }
}

impl TranslationConfig {
    pub fn window(&self) -> Result<WindowConfig> {
        WindowConfig::new(self.window_size, self.overlap)
            .map_err(|e| anyhow!("translation: {}", e))
    }
}

/// Configuration for subtitle file handling
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubtitleConfig {
    /// Encoding tried when a file is not valid UTF-8
    #[serde(default = "default_fallback_encoding")]
    pub fallback_encoding: String,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            fallback_encoding: default_fallback_encoding(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_temperature() -> f32 {
    0.0
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_alignment_window_size() -> usize {
    20
}

fn default_alignment_overlap() -> usize {
    2
}

fn default_translation_window_size() -> usize {
    50
}

fn default_output_suffix() -> String {
    "autofixed".to_string()
}

fn default_fallback_encoding() -> String {
    "windows-1251".to_string()
}

fn default_model(provider: &OracleProvider) -> String {
    match provider {
        OracleProvider::OpenAI => "gpt-4o".to_string(),
        OracleProvider::Anthropic => "claude-3-5-sonnet-latest".to_string(),
        OracleProvider::Ollama => "llama3.1".to_string(),
        // Placeholder; users should set the model loaded in LM Studio
        OracleProvider::LMStudio => "local-model".to_string(),
    }
}

fn default_endpoint(provider: &OracleProvider) -> String {
    match provider {
        OracleProvider::OpenAI => "https://api.openai.com/v1".to_string(),
        OracleProvider::Anthropic => "https://api.anthropic.com".to_string(),
        OracleProvider::Ollama => "http://localhost:11434".to_string(),
        OracleProvider::LMStudio => "http://localhost:1234/v1".to_string(),
    }
}

fn default_rate_limit(provider: &OracleProvider) -> Option<u32> {
    match provider {
        OracleProvider::OpenAI => Some(60),
        OracleProvider::Anthropic => Some(45),
        OracleProvider::Ollama | OracleProvider::LMStudio => None,
    }
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.alignment.window()?;
        self.translation.window()?;
        resolve_encoding(&self.subtitles.fallback_encoding)?;

        if self.alignment.output_suffix.trim().is_empty() {
            return Err(anyhow!("alignment.output_suffix must not be empty"));
        }

        if self.oracle.provider.requires_api_key() && self.oracle.get_api_key().is_empty() {
            return Err(anyhow!(
                "An API key is required for the {} provider",
                self.oracle.provider.display_name()
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            oracle: OracleConfig::default(),
            alignment: AlignmentConfig::default(),
            translation: TranslationConfig::default(),
            subtitles: SubtitleConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl OracleConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &OracleProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Active provider configuration, created with defaults if missing
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        if let Some(position) = self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            return &mut self.available_providers[position];
        }
        self.available_providers.push(ProviderConfig::new(self.provider.clone()));
        let last = self.available_providers.len() - 1;
        &mut self.available_providers[last]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.model.clone())
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| default_model(&self.provider))
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.endpoint.clone())
            .filter(|endpoint| !endpoint.is_empty())
            .unwrap_or_else(|| default_endpoint(&self.provider))
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or_else(default_timeout_secs)
    }

    /// Get the rate limit for the active provider
    pub fn get_rate_limit(&self) -> Option<u32> {
        match self.get_active_provider_config() {
            Some(provider_config) => provider_config.rate_limit,
            None => default_rate_limit(&self.provider),
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            provider: OracleProvider::default(),
            available_providers: vec![
                ProviderConfig::new(OracleProvider::OpenAI),
                ProviderConfig::new(OracleProvider::Anthropic),
                ProviderConfig::new(OracleProvider::Ollama),
                ProviderConfig::new(OracleProvider::LMStudio),
            ],
            common: OracleCommonConfig::default(),
        }
    }
}
