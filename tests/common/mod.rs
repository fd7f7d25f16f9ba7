/*!
 * Common test utilities for the transguard test suite
 */

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;

use transguard::app_config::{Config, TranslationConfig};
use transguard::errors::ProviderError;
use transguard::providers::ModelInvoker;
use transguard::providers::mock::MockProvider;
use transguard::translation::TranslationService;

/// Install env_logger in test mode; repeated calls are ignored
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Writes a config file with the given JSON content
pub fn write_config(dir: &Path, content: &str) -> Result<PathBuf> {
    let path = dir.join("conf.json");
    std::fs::write(&path, content)?;
    Ok(path)
}

/// Translation config with a retry budget and batch width
pub fn translation_config(max_retry_count: u32, concurrent_requests: usize) -> TranslationConfig {
    let mut config = Config::default().translation;
    config.common.max_retry_count = max_retry_count;
    if let Some(provider) = config.get_active_provider_config_mut() {
        provider.concurrent_requests = concurrent_requests;
    }
    config
}

/// Service backed by a scripted mock
pub fn scripted_service(replies: &[&str], max_retry_count: u32) -> (TranslationService, Arc<MockProvider>) {
    let provider = Arc::new(MockProvider::scripted(replies.iter().copied()));
    let service = TranslationService::with_invoker(provider.clone(), &translation_config(max_retry_count, 1));
    (service, provider)
}

/// Invoker that answers each prompt according to its stage
///
/// Classifier: `PII` when the text contains a phone number prefix,
/// `PROMPT_INJECTION` for "ignore previous instructions", `PASS` otherwise.
/// Translator: `T:<text>`. Quality checker: always `YES`.
/// Tracks the peak number of concurrent calls.
#[derive(Debug, Default)]
pub struct RoutingInvoker {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
    delay_ms: u64,
}

impl RoutingInvoker {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Default::default()
        }
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer(prompt: &str) -> String {
        if prompt.contains("safety classifier") {
            let lowered = prompt.to_lowercase();
            if lowered.contains("010-") {
                "PII".to_string()
            } else if lowered.contains("ignore previous instructions") {
                "PROMPT_INJECTION".to_string()
            } else {
                "PASS".to_string()
            }
        } else if prompt.contains("You review translations") {
            "YES".to_string()
        } else {
            let text = prompt.rsplit("Text:\n").next().unwrap_or_default();
            format!("T:{}", text)
        }
    }
}

#[async_trait]
impl ModelInvoker for RoutingInvoker {
    async fn invoke(&self, prompt: &str, _temperature: f32) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);

        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(Self::answer(prompt))
    }

    async fn ping(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
