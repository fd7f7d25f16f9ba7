/*!
 * Translation service.
 *
 * This module contains the `TranslationService`, which builds the model
 * backend from configuration, creates the per-request state and drives it
 * through the pipeline.
 */

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use log::{debug, info};
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::providers::anthropic::Anthropic;
use crate::providers::ollama::Ollama;
use crate::providers::ModelInvoker;

use super::nodes::TranslationOutcome;
use super::pipeline::{PipelineConfig, TranslationPipeline};
use super::state::{TranslationRequest, TranslationState};

/// Normalize an endpoint string into a base URL without a trailing slash
fn parse_endpoint(endpoint: &str) -> Result<String, TranslationError> {
    if endpoint.trim().is_empty() {
        return Err(TranslationError::Config("Endpoint cannot be empty".to_string()));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)
    } else {
        Url::parse(&format!("http://{}", endpoint))
    }
    .map_err(|e| TranslationError::Config(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

    if url.host_str().is_none() {
        return Err(TranslationError::Config(format!("Invalid host in endpoint: {}", endpoint)));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Build the model backend selected in the configuration
fn build_invoker(config: &TranslationConfig) -> Result<Arc<dyn ModelInvoker>, TranslationError> {
    let endpoint = parse_endpoint(&config.get_endpoint())?;
    let model = config.get_model();
    let timeout_secs = config.get_timeout_secs();

    let invoker: Arc<dyn ModelInvoker> = match config.provider {
        TranslationProvider::Ollama => Arc::new(Ollama::new_with_config(
            endpoint,
            model,
            timeout_secs,
            config.common.transport_retries,
            config.common.transport_backoff_ms,
        )),
        TranslationProvider::Anthropic => {
            let api_key = config.get_api_key();
            if api_key.is_empty() {
                return Err(TranslationError::Config(
                    "Translation API key is required for Anthropic provider".to_string(),
                ));
            }
            Arc::new(Anthropic::new_with_config(api_key, endpoint, model, timeout_secs))
        }
    };
    Ok(invoker)
}

/// Main translation service
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Shared model backend
    invoker: Arc<dyn ModelInvoker>,

    /// Stage graph
    pipeline: TranslationPipeline,

    /// Retry budget given to every request
    max_retry_count: u32,

    /// Upper bound on requests in flight during a batch
    max_concurrent_requests: usize,
}

impl TranslationService {
    /// Create a new translation service with the backend named in the configuration
    pub fn new(config: &TranslationConfig) -> Result<Self, TranslationError> {
        let invoker = build_invoker(config)?;
        info!(
            "Using {} with model {}",
            config.provider.display_name(),
            config.get_model()
        );
        Ok(Self::with_invoker(invoker, config))
    }

    /// Create a service around an existing invoker
    pub fn with_invoker(invoker: Arc<dyn ModelInvoker>, config: &TranslationConfig) -> Self {
        let pipeline = TranslationPipeline::new(
            Arc::clone(&invoker),
            PipelineConfig::from_common(&config.common),
        );
        Self {
            invoker,
            pipeline,
            max_retry_count: config.common.max_retry_count,
            max_concurrent_requests: config.optimal_concurrent_requests(),
        }
    }

    pub fn max_retry_count(&self) -> u32 {
        self.max_retry_count
    }

    pub fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }

    /// Translate a single request
    pub async fn translate(&self, request: TranslationRequest) -> Result<TranslationOutcome, TranslationError> {
        let state = TranslationState::new(request, self.max_retry_count);
        debug!(
            "{} Accepted request {} -> {} ({} chars)",
            state.log_tag(),
            state.source_language,
            state.target_language,
            state.text().chars().count()
        );

        let state = self.pipeline.run(state).await?;
        TranslationOutcome::from_state(&state)
    }

    /// Translate independent requests concurrently; results keep the input order
    pub async fn translate_batch(
        &self,
        requests: Vec<TranslationRequest>,
    ) -> Vec<Result<TranslationOutcome, TranslationError>> {
        let total = requests.len();
        debug!("Translating batch of {} requests, {} at a time", total, self.max_concurrent_requests);

        stream::iter(requests)
            .map(|request| self.translate(request))
            .buffered(self.max_concurrent_requests.max(1))
            .collect()
            .await
    }

    /// Check that the model backend is reachable
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        self.invoker.ping().await
    }
}
