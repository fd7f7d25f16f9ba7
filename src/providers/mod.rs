/*!
 * Provider implementations for the model backends.
 *
 * This module contains client implementations for the supported LLM providers:
 * - Ollama: Local LLM server
 * - Anthropic: Anthropic API integration
 * - Mock: Deterministic provider for tests and dry runs
 *
 * The pipeline itself only sees the narrow [`ModelInvoker`] capability.
 * Every [`Provider`] is a `ModelInvoker`.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably behind the model invoker.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Build a single-turn request for a rendered prompt
    fn build_request(&self, prompt: &str, temperature: f32) -> Self::Request;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    ///
    /// # Arguments
    /// * `response` - The response from the provider
    ///
    /// # Returns
    /// * `String` - The extracted text
    fn extract_text(response: &Self::Response) -> String;
}

/// Generate text from a prompt at a given sampling temperature
///
/// This is the only source of non-determinism in the pipeline. Implementations
/// must be safe to call concurrently for independent requests.
#[async_trait]
pub trait ModelInvoker: Send + Sync + Debug {
    /// Invoke the model and return the generated text
    async fn invoke(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError>;

    /// Check that the backend is reachable
    async fn ping(&self) -> Result<(), ProviderError>;
}

#[async_trait]
impl<P: Provider> ModelInvoker for P {
    async fn invoke(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError> {
        let request = self.build_request(prompt, temperature);
        let response = self.complete(request).await?;
        Ok(P::extract_text(&response))
    }

    async fn ping(&self) -> Result<(), ProviderError> {
        self.test_connection().await
    }
}

pub mod ollama;
pub mod anthropic;
pub mod mock;
