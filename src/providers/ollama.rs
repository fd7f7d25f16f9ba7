use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Ollama client for interacting with Ollama API
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Model used for every generation
    model: String,
    /// Maximum number of retry attempts on transient failures
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl GenerationRequest {
    /// Create a new generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            options: None,
            stream: Some(false),
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }
}

/// Exponential backoff for the given 1-based retry attempt, saturating at `u64::MAX`
pub fn backoff_delay_ms(base_ms: u64, attempt: u32) -> u64 {
    match 1u64.checked_shl(attempt.saturating_sub(1)) {
        Some(factor) => base_ms.saturating_mul(factor),
        None if base_ms == 0 => 0,
        None => u64::MAX,
    }
}

impl Ollama {
    /// Create a new Ollama client with configuration
    ///
    /// Uses connection pooling for better performance with concurrent requests.
    /// Note: Ollama typically uses HTTP/1.1, so we don't force HTTP/2.
    pub fn new_with_config(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                // Force HTTP/1.1 - Ollama uses HTTP/1.1
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .pool_max_idle_per_host(20)
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            model: model.into(),
            max_retries,
            backoff_base_ms,
        }
    }

    /// Create a client for the given URL and model with default settings
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new_with_config(base_url, model, 120, 0, 1000)
    }

    /// Generate text from the Ollama API with retry logic
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);

        let mut attempt = 0;
        loop {
            match self.send_generate(&url, request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let backoff_ms = backoff_delay_ms(self.backoff_base_ms, attempt);
                    warn!(
                        "Ollama request failed: {} - retrying in {}ms (attempt {}/{})",
                        e, backoff_ms, attempt + 1, self.max_retries + 1
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
                Err(e) => {
                    error!("Ollama request failed: {}", e);
                    return Err(e);
                }
            }
        }
    }

    async fn send_generate(&self, url: &str, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let response = self.client.post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to send request to Ollama API: {}", e)))?;

        let status = response.status();
        let response_text = response.text().await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to read Ollama API response: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::from_status(status.as_u16(), response_text));
        }

        parse_generation_body(&response_text)
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response: serde_json::Value = self.client.get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to connect to Ollama: {}", e)))?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Ollama version response: {}", e)))?;

        response["version"].as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))
    }
}

/// Parse a generate body, accepting both a single object and streamed JSONL
pub fn parse_generation_body(body: &str) -> Result<GenerationResponse, ProviderError> {
    match serde_json::from_str::<GenerationResponse>(body) {
        Ok(response) => Ok(response),
        Err(e) => {
            debug!("Ollama response is not a single object ({}), trying JSONL", e);

            let mut full_response = String::new();
            let mut last: Option<serde_json::Value> = None;
            for line in body.lines().filter(|l| !l.trim().is_empty()) {
                let value: serde_json::Value = serde_json::from_str(line).map_err(|_| {
                    let preview: String = body.chars().take(500).collect();
                    ProviderError::ParseError(format!(
                        "Failed to parse Ollama API response: {}. Raw response (first 500 chars): {}",
                        e, preview
                    ))
                })?;
                if let Some(part) = value.get("response").and_then(|v| v.as_str()) {
                    full_response.push_str(part);
                }
                last = Some(value);
            }

            let last = last.ok_or_else(|| ProviderError::ParseError("Empty response from Ollama API".to_string()))?;
            Ok(GenerationResponse {
                model: last.get("model").and_then(|v| v.as_str()).unwrap_or("unknown").to_string(),
                response: full_response,
                done: last.get("done").and_then(|v| v.as_bool()).unwrap_or(true),
                prompt_eval_count: last.get("prompt_eval_count").and_then(|v| v.as_u64()),
                eval_count: last.get("eval_count").and_then(|v| v.as_u64()),
            })
        }
    }
}

#[async_trait]
impl Provider for Ollama {
    type Request = GenerationRequest;
    type Response = GenerationResponse;

    fn build_request(&self, prompt: &str, temperature: f32) -> Self::Request {
        GenerationRequest::new(&self.model, prompt).temperature(temperature)
    }

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.generate(&request).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let version = self.version().await?;
        debug!("Connected to Ollama {}", version);
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.response.clone()
    }
}
