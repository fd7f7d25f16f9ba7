/*!
 * Tests for application configuration functionality
 */

use transguard::app_config::{Config, LogLevel, ProviderConfig, TranslationProvider, MAX_TRANSPORT_RETRIES};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.log_level, LogLevel::Info);

    let ollama_config = config.translation.get_provider_config(&TranslationProvider::Ollama)
        .expect("Ollama provider config should exist");
    assert_eq!(ollama_config.concurrent_requests, 4);
    assert_eq!(ollama_config.timeout_secs, 120);
    assert_eq!(ollama_config.endpoint, "http://localhost:11434");

    let common = &config.translation.common;
    assert_eq!(common.max_retry_count, 2);
    assert_eq!(common.classify_temperature, 0.0);
    assert_eq!(common.translate_temperature, 0.3);
    assert_eq!(common.quality_temperature, 0.0);
    assert_eq!(common.retry_temperature, 0.3);
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path).unwrap();

    assert!(path.exists());
    let reloaded = Config::from_file(&path).unwrap();
    assert_eq!(reloaded.translation.provider, config.translation.provider);
    assert_eq!(reloaded.translation.available_providers.len(), 2);
}

#[test]
fn test_fromFile_withCustomValues_shouldApplyThem() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::write_config(dir.path(), r#"{
        "log_level": "debug",
        "translation": {
            "provider": "anthropic",
            "available_providers": [
                { "type": "anthropic", "model": "claude-3-5-haiku-latest", "api_key": "sk-test", "concurrent_requests": 8 }
            ],
            "common": { "max_retry_count": 0, "retry_temperature": 0.9 }
        }
    }"#).unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.translation.provider, TranslationProvider::Anthropic);
    assert_eq!(config.translation.get_model(), "claude-3-5-haiku-latest");
    assert_eq!(config.translation.get_endpoint(), "https://api.anthropic.com");
    assert_eq!(config.translation.optimal_concurrent_requests(), 8);
    assert_eq!(config.translation.common.max_retry_count, 0);
    assert_eq!(config.translation.common.retry_temperature, 0.9);
    assert!(config.validate().is_ok());
}

#[test]
fn test_fromFile_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::write_config(dir.path(), "{ not json").unwrap();

    let error = Config::from_file(&path).unwrap_err();
    assert!(error.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_validate_withBadEndpoint_shouldFail() {
    let mut config = Config::default();
    config.translation.get_active_provider_config_mut().unwrap().endpoint = "not a url".to_string();

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroConcurrency_shouldFail() {
    let mut config = Config::default();
    config.translation.get_active_provider_config_mut().unwrap().concurrent_requests = 0;

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withNegativeTemperature_shouldFail() {
    let mut config = Config::default();
    config.translation.common.classify_temperature = -0.1;

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withTooManyTransportRetries_shouldFail() {
    let mut config = Config::default();
    config.translation.common.transport_retries = MAX_TRANSPORT_RETRIES;
    assert!(config.validate().is_ok());

    config.translation.common.transport_retries = u32::MAX;
    assert!(config.validate().is_err());
}

#[test]
fn test_providerConfig_new_shouldUseProviderDefaults() {
    let anthropic = ProviderConfig::new(TranslationProvider::Anthropic);

    assert_eq!(anthropic.provider_type, "anthropic");
    assert_eq!(anthropic.endpoint, "https://api.anthropic.com");
    assert!(anthropic.api_key.is_empty());
}

#[test]
fn test_logLevel_toLevelFilter_shouldMatch() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
