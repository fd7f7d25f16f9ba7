/*!
 * Pipeline orchestrator.
 *
 * Owns one node per stage and drives a request from `Normalize` to
 * `Response`. Routing lives entirely in [`TranslationPipeline::next_stage`],
 * a pure function of the current stage and state.
 */

use std::sync::Arc;
use std::time::Instant;

use log::{debug, error};

use crate::app_config::TranslationCommonConfig;
use crate::errors::TranslationError;
use crate::providers::ModelInvoker;
use crate::translation::nodes::{
    NormalizeInputNode, PipelineNode, QualityCheckNode, ResponseNode, RetryGateNode,
    RetryTranslateNode, SafeguardClassifyNode, SafeguardDecisionNode, SafeguardFailResponseNode,
    TranslateNode,
};
use crate::translation::state::{QcVerdict, TranslationState};

use super::Stage;

/// Sampling temperatures for the model-calling stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Temperature for the safety classifier
    pub classify_temperature: f32,

    /// Temperature for the first translation
    pub translate_temperature: f32,

    /// Temperature for the quality checker
    pub quality_temperature: f32,

    /// Temperature for re-translation
    pub retry_temperature: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            classify_temperature: 0.0,
            translate_temperature: 0.3,
            quality_temperature: 0.0,
            retry_temperature: 0.3,
        }
    }
}

impl PipelineConfig {
    /// Take the stage temperatures from the common translation settings.
    pub fn from_common(common: &TranslationCommonConfig) -> Self {
        Self {
            classify_temperature: common.classify_temperature,
            translate_temperature: common.translate_temperature,
            quality_temperature: common.quality_temperature,
            retry_temperature: common.retry_temperature,
        }
    }
}

/// The main translation pipeline orchestrator.
#[derive(Debug, Clone)]
pub struct TranslationPipeline {
    normalize: NormalizeInputNode,
    classify: SafeguardClassifyNode,
    decision: SafeguardDecisionNode,
    fail_response: SafeguardFailResponseNode,
    translate: TranslateNode,
    quality_check: QualityCheckNode,
    retry_gate: RetryGateNode,
    retry_translate: RetryTranslateNode,
    response: ResponseNode,
}

impl TranslationPipeline {
    /// Create a new pipeline sharing one invoker across all model stages.
    pub fn new(invoker: Arc<dyn ModelInvoker>, config: PipelineConfig) -> Self {
        Self {
            normalize: NormalizeInputNode::new(),
            classify: SafeguardClassifyNode::new(Arc::clone(&invoker), config.classify_temperature),
            decision: SafeguardDecisionNode::new(),
            fail_response: SafeguardFailResponseNode::new(),
            translate: TranslateNode::new(Arc::clone(&invoker), config.translate_temperature),
            quality_check: QualityCheckNode::new(Arc::clone(&invoker), config.quality_temperature),
            retry_gate: RetryGateNode::new(),
            retry_translate: RetryTranslateNode::new(invoker, config.retry_temperature),
            response: ResponseNode::new(),
        }
    }

    fn node(&self, stage: Stage) -> &dyn PipelineNode {
        match stage {
            Stage::Normalize => &self.normalize,
            Stage::SafeguardClassify => &self.classify,
            Stage::SafeguardDecision => &self.decision,
            Stage::SafeguardFailResponse => &self.fail_response,
            Stage::Translate => &self.translate,
            Stage::QualityCheck => &self.quality_check,
            Stage::RetryGate => &self.retry_gate,
            Stage::RetryTranslate => &self.retry_translate,
            Stage::Response => &self.response,
        }
    }

    /// Stage to run after `stage`, or `None` once the response stage is done.
    ///
    /// A missing safety label routes to the rejection branch.
    pub fn next_stage(stage: Stage, state: &TranslationState) -> Option<Stage> {
        let next = match stage {
            Stage::Normalize => Stage::SafeguardClassify,
            Stage::SafeguardClassify => Stage::SafeguardDecision,
            Stage::SafeguardDecision => match state.safeguard_label {
                Some(label) if label.is_pass() => Stage::Translate,
                _ => Stage::SafeguardFailResponse,
            },
            Stage::SafeguardFailResponse => Stage::Response,
            Stage::Translate => Stage::QualityCheck,
            Stage::QualityCheck => Stage::RetryGate,
            Stage::RetryGate => {
                if state.qc_passed != Some(QcVerdict::Yes) && state.has_retry_budget() {
                    Stage::RetryTranslate
                } else {
                    Stage::Response
                }
            }
            Stage::RetryTranslate => Stage::QualityCheck,
            Stage::Response => return None,
        };
        Some(next)
    }

    /// Run a request to completion.
    pub async fn run(&self, state: TranslationState) -> Result<TranslationState, TranslationError> {
        self.run_traced(state).await.map(|(state, _)| state)
    }

    /// Run a request to completion, also returning the stages in execution order.
    pub async fn run_traced(
        &self,
        mut state: TranslationState,
    ) -> Result<(TranslationState, Vec<Stage>), TranslationError> {
        let pipeline_start = Instant::now();
        let mut trace = Vec::new();
        let mut stage = Stage::Normalize;

        loop {
            let stage_start = Instant::now();
            if let Err(e) = self.node(stage).run(&mut state).await {
                error!("{} Stage {} failed: {}", state.log_tag(), stage, e);
                return Err(e);
            }
            debug!("{} Stage {} completed in {:?}", state.log_tag(), stage, stage_start.elapsed());
            trace.push(stage);

            match Self::next_stage(stage, &state) {
                Some(next) => stage = next,
                None => break,
            }
        }

        debug!(
            "{} Pipeline finished in {:?} after {} stages",
            state.log_tag(),
            pipeline_start.elapsed(),
            trace.len()
        );
        Ok((state, trace))
    }
}
