/*!
 * Safety classification, routing decision and rejection handling.
 */

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::errors::TranslationError;
use crate::providers::ModelInvoker;
use crate::translation::pipeline::Stage;
use crate::translation::prompts::PromptTemplate;
use crate::translation::state::{SafeguardLabel, TranslationState};

use super::PipelineNode;

/// Message used when a rejection reaches the fail-response stage without one
pub const GENERIC_REJECTION_MESSAGE: &str = "The request was blocked by the safety policy.";

/// User-facing message for a rejected label
pub fn rejection_message(label: SafeguardLabel) -> Option<&'static str> {
    match label {
        SafeguardLabel::Pass => None,
        SafeguardLabel::Pii => Some(
            "The text appears to contain personal information and cannot be translated. Remove the personal data and try again.",
        ),
        SafeguardLabel::Harmful => Some(
            "The text was classified as harmful content and cannot be translated.",
        ),
        SafeguardLabel::PromptInjection => Some(
            "The text contains instructions aimed at the translation system and cannot be translated.",
        ),
    }
}

/// Classifies the normalized text into a safety label
#[derive(Debug, Clone)]
pub struct SafeguardClassifyNode {
    invoker: Arc<dyn ModelInvoker>,
    template: PromptTemplate,
    temperature: f32,
}

impl SafeguardClassifyNode {
    pub fn new(invoker: Arc<dyn ModelInvoker>, temperature: f32) -> Self {
        Self {
            invoker,
            template: PromptTemplate::safeguard(),
            temperature,
        }
    }
}

#[async_trait]
impl PipelineNode for SafeguardClassifyNode {
    fn stage(&self) -> Stage {
        Stage::SafeguardClassify
    }

    async fn run(&self, state: &mut TranslationState) -> Result<(), TranslationError> {
        let text = state.require_normalized_text(self.stage())?;
        let prompt = self.template.render(&[("user_input", text)]);

        let raw = self.invoker
            .invoke(&prompt, self.temperature)
            .await
            .map_err(|e| TranslationError::model(self.stage(), e))?;

        let label = SafeguardLabel::parse_fail_closed(&raw);
        if label == SafeguardLabel::Harmful && raw.trim().to_uppercase() != "HARMFUL" {
            warn!(
                "{} Unrecognized classifier output '{}', treating as {}",
                state.log_tag(),
                raw.trim(),
                label
            );
        }
        debug!("{} Safeguard label: {}", state.log_tag(), label);

        state.safeguard_label = Some(label);
        Ok(())
    }
}

/// Routes on the safety label and attaches the rejection message
#[derive(Debug, Default, Clone)]
pub struct SafeguardDecisionNode;

impl SafeguardDecisionNode {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PipelineNode for SafeguardDecisionNode {
    fn stage(&self) -> Stage {
        Stage::SafeguardDecision
    }

    async fn run(&self, state: &mut TranslationState) -> Result<(), TranslationError> {
        let Some(label) = state.safeguard_label else {
            warn!("{} No safeguard label, routing to rejection", state.log_tag());
            state.error_message = None;
            return Ok(());
        };
        state.error_message = rejection_message(label).map(str::to_string);

        if !label.is_pass() {
            info!("{} Request rejected by safeguard: {}", state.log_tag(), label);
        }
        Ok(())
    }
}

/// Finalizes a rejected request before the response stage
#[derive(Debug, Default, Clone)]
pub struct SafeguardFailResponseNode;

impl SafeguardFailResponseNode {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PipelineNode for SafeguardFailResponseNode {
    fn stage(&self) -> Stage {
        Stage::SafeguardFailResponse
    }

    async fn run(&self, state: &mut TranslationState) -> Result<(), TranslationError> {
        state.safeguard_label.get_or_insert(SafeguardLabel::Harmful);

        let needs_message = state
            .error_message
            .as_deref()
            .is_none_or(|m| m.trim().is_empty());
        if needs_message {
            state.error_message = Some(GENERIC_REJECTION_MESSAGE.to_string());
        }
        state.translated_text = None;
        state.qc_passed = None;
        Ok(())
    }
}
