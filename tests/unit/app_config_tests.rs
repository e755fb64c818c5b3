/*!
 * Tests for application configuration functionality
 */

use yasrai::app_config::{Config, LogLevel, OracleProvider, ProviderConfig};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.oracle.provider, OracleProvider::OpenAI);
    assert_eq!(config.oracle.get_model(), "gpt-4o");
    assert_eq!(config.oracle.get_endpoint(), "https://api.openai.com/v1");

    assert_eq!(config.alignment.window_size, 20);
    assert_eq!(config.alignment.overlap, 2);
    assert_eq!(config.alignment.output_suffix, "autofixed");
    assert_eq!(config.translation.window_size, 50);
    assert_eq!(config.translation.overlap, 0);
    assert_eq!(config.subtitles.fallback_encoding, "windows-1251");

    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    // OpenAI needs a key
    assert!(config.validate().is_err());
    config.oracle.active_provider_config_mut().api_key = "sk-test".to_string();
    assert!(config.validate().is_ok());

    // Overlap must stay below the window size
    config.alignment.overlap = 20;
    assert!(config.validate().is_err());
    config.alignment.overlap = 2;

    config.translation.window_size = 0;
    assert!(config.validate().is_err());
    config.translation.window_size = 50;

    config.subtitles.fallback_encoding = "not-an-encoding".to_string();
    assert!(config.validate().is_err());
    config.subtitles.fallback_encoding = "cp1251".to_string();
    assert!(config.validate().is_ok());

    // Local providers work without a key
    config.oracle.provider = OracleProvider::Ollama;
    assert!(config.validate().is_ok());
}

/// Partial JSON is completed with defaults
#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() {
    let json = r#"{
        "oracle": {
            "provider": "lmstudio",
            "available_providers": [
                { "type": "lmstudio", "model": "qwen2.5-7b-instruct", "endpoint": "http://localhost:1234/v1" }
            ]
        },
        "alignment": { "window_size": 30 },
        "log_level": "debug"
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.oracle.provider, OracleProvider::LMStudio);
    assert_eq!(config.oracle.get_model(), "qwen2.5-7b-instruct");
    assert_eq!(config.oracle.get_timeout_secs(), 120);
    assert_eq!(config.oracle.common.retry_count, 3);
    assert_eq!(config.alignment.window_size, 30);
    assert_eq!(config.alignment.overlap, 2);
    assert_eq!(config.translation.window_size, 50);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());
}

/// CLI overrides create a provider entry when the file lacks one
#[test]
fn test_activeProviderConfigMut_withMissingEntry_shouldCreateDefaults() {
    let mut config = Config::default();
    config.oracle.available_providers.clear();
    config.oracle.provider = OracleProvider::Anthropic;

    config.oracle.active_provider_config_mut().api_key = "key".to_string();

    assert_eq!(config.oracle.available_providers.len(), 1);
    assert_eq!(config.oracle.get_api_key(), "key");
    assert_eq!(config.oracle.get_rate_limit(), Some(45));
}

#[test]
fn test_oracleProvider_fromStr_shouldAcceptLowercaseNames() {
    assert_eq!("OpenAI".parse::<OracleProvider>().unwrap(), OracleProvider::OpenAI);
    assert_eq!("lmstudio".parse::<OracleProvider>().unwrap(), OracleProvider::LMStudio);
    assert!("gemini".parse::<OracleProvider>().is_err());
    assert_eq!(OracleProvider::Ollama.to_string(), "ollama");
}

#[test]
fn test_providerConfig_new_shouldUseProviderDefaults() {
    let ollama = ProviderConfig::new(OracleProvider::Ollama);
    assert_eq!(ollama.provider_type, "ollama");
    assert_eq!(ollama.endpoint, "http://localhost:11434");
    assert_eq!(ollama.rate_limit, None);
}
