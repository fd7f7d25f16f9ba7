/*!
 * Error types for the transguard application.
 *
 * This module contains custom error types for the model backends, the
 * translation pipeline and the command-line application, using the
 * thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

use crate::translation::pipeline::Stage;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Map a non-success HTTP status to the matching error variant
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }

    /// Whether a transport-level retry could help
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::RequestFailed(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

/// Errors that terminate a translation request
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The model backend failed while a stage was running
    #[error("Model call failed during {stage}: {source}")]
    Model {
        /// Stage that issued the call
        stage: Stage,
        /// Underlying backend error
        #[source]
        source: ProviderError,
    },

    /// A stage found a field that an earlier stage should have populated
    #[error("State field '{field}' missing at {stage}")]
    MissingField {
        /// Stage that required the field
        stage: Stage,
        /// Name of the missing field
        field: &'static str,
    },

    /// Invalid service configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TranslationError {
    /// Wrap a provider error with the stage it happened in
    pub fn model(stage: Stage, source: ProviderError) -> Self {
        Self::Model { stage, source }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the configuration file or overrides
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
