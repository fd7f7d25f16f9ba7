use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use crate::errors::TranslationError;
use crate::providers::ModelInvoker;
use crate::translation::pipeline::Stage;
use crate::translation::prompts::PromptTemplate;
use crate::translation::state::{QcVerdict, TranslationState};

use super::PipelineNode;

/// Asks the model whether the current translation is acceptable
#[derive(Debug, Clone)]
pub struct QualityCheckNode {
    invoker: Arc<dyn ModelInvoker>,
    template: PromptTemplate,
    temperature: f32,
}

impl QualityCheckNode {
    pub fn new(invoker: Arc<dyn ModelInvoker>, temperature: f32) -> Self {
        Self {
            invoker,
            template: PromptTemplate::quality_check(),
            temperature,
        }
    }
}

#[async_trait]
impl PipelineNode for QualityCheckNode {
    fn stage(&self) -> Stage {
        Stage::QualityCheck
    }

    async fn run(&self, state: &mut TranslationState) -> Result<(), TranslationError> {
        let source_text = state.require_normalized_text(self.stage())?;
        let translated = state.require_translated_text(self.stage())?;
        let prompt = self.template.render(&[
            ("source_text", source_text),
            ("translated_text", translated),
        ]);

        let raw = self.invoker
            .invoke(&prompt, self.temperature)
            .await
            .map_err(|e| TranslationError::model(self.stage(), e))?;

        if !QcVerdict::is_recognized(&raw) {
            warn!("{} Unrecognized quality check output '{}', treating as NO", state.log_tag(), raw.trim());
        }
        let verdict = QcVerdict::parse_fail_closed(&raw);
        debug!("{} Quality check verdict: {} (retry {}/{})",
            state.log_tag(), verdict, state.retry_count, state.max_retry_count());

        state.qc_passed = Some(verdict);
        Ok(())
    }
}

/// Decides between another retry and termination
///
/// A failed check with budget left is passed on unchanged so the pipeline
/// loops through the retry translator. A failed check with no budget left is
/// forced to YES and flagged as unverified.
#[derive(Debug, Default, Clone)]
pub struct RetryGateNode;

impl RetryGateNode {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PipelineNode for RetryGateNode {
    fn stage(&self) -> Stage {
        Stage::RetryGate
    }

    async fn run(&self, state: &mut TranslationState) -> Result<(), TranslationError> {
        let verdict = state
            .qc_passed
            .ok_or(TranslationError::MissingField { stage: self.stage(), field: "qc_passed" })?;

        if verdict == QcVerdict::No && !state.has_retry_budget() {
            warn!(
                "{} Retry budget of {} exhausted, accepting unverified translation",
                state.log_tag(),
                state.max_retry_count()
            );
            state.qc_passed = Some(QcVerdict::Yes);
            state.qc_forced = true;
        }
        Ok(())
    }
}
