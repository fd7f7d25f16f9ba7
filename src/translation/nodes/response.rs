use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::TranslationError;
use crate::translation::pipeline::Stage;
use crate::translation::state::{QcVerdict, SafeguardLabel, TranslationState};

use super::PipelineNode;

/// Externally visible result of one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TranslationOutcome {
    /// The safeguard refused the input
    Rejected {
        safeguard_label: SafeguardLabel,
        error_message: String,
    },

    /// The input was translated
    Translated {
        source_language: String,
        target_language: String,
        translated_text: String,
        retry_count: u32,
        /// False when the retry budget ran out before a YES verdict
        quality_verified: bool,
    },
}

impl TranslationOutcome {
    /// Build the outcome from a state that has reached the terminal stage
    pub fn from_state(state: &TranslationState) -> Result<Self, TranslationError> {
        let label = state.require_label(Stage::Response)?;

        if !label.is_pass() {
            let error_message = state
                .error_message
                .clone()
                .ok_or(TranslationError::MissingField { stage: Stage::Response, field: "error_message" })?;
            return Ok(Self::Rejected { safeguard_label: label, error_message });
        }

        let translated_text = state.require_translated_text(Stage::Response)?.to_string();
        Ok(Self::Translated {
            source_language: state.source_language.clone(),
            target_language: state.target_language.clone(),
            translated_text,
            retry_count: state.retry_count,
            quality_verified: state.qc_passed == Some(QcVerdict::Yes) && !state.qc_forced,
        })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Translated text, if any
    pub fn translated_text(&self) -> Option<&str> {
        match self {
            Self::Translated { translated_text, .. } => Some(translated_text),
            Self::Rejected { .. } => None,
        }
    }

    /// Rejection message, if any
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { error_message, .. } => Some(error_message),
            Self::Translated { .. } => None,
        }
    }
}

/// Terminal stage; the outcome itself is assembled by the caller
#[derive(Debug, Default, Clone)]
pub struct ResponseNode;

impl ResponseNode {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PipelineNode for ResponseNode {
    fn stage(&self) -> Stage {
        Stage::Response
    }

    async fn run(&self, state: &mut TranslationState) -> Result<(), TranslationError> {
        match state.safeguard_label {
            Some(label) if !label.is_pass() => {
                info!("{} Finished: rejected ({})", state.log_tag(), label);
            }
            _ => {
                info!(
                    "{} Finished: translated {} -> {} after {} retries{}",
                    state.log_tag(),
                    state.source_language,
                    state.target_language,
                    state.retry_count,
                    if state.qc_forced { " (unverified)" } else { "" }
                );
            }
        }
        Ok(())
    }
}
