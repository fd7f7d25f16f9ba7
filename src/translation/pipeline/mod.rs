/*!
 * Guarded translation pipeline.
 *
 * The pipeline is a finite-state machine over [`Stage`]:
 * 1. **Normalize**: canonical language codes, bounded text
 * 2. **Safeguard**: classify, decide, and on rejection build the failure
 * 3. **Translate**: first translation of the normalized text
 * 4. **Quality loop**: quality check, retry gate, re-translation, bounded by
 *    the retry budget
 * 5. **Response**: terminal stage
 */

use std::fmt;

pub mod orchestrator;

pub use orchestrator::{PipelineConfig, TranslationPipeline};

/// A node of the pipeline graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Normalize,
    SafeguardClassify,
    SafeguardDecision,
    SafeguardFailResponse,
    Translate,
    QualityCheck,
    RetryGate,
    RetryTranslate,
    Response,
}

impl Stage {
    /// Name used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normalize => "normalize",
            Self::SafeguardClassify => "safeguard_classify",
            Self::SafeguardDecision => "safeguard_decision",
            Self::SafeguardFailResponse => "safeguard_fail_response",
            Self::Translate => "translate",
            Self::QualityCheck => "quality_check",
            Self::RetryGate => "retry_gate",
            Self::RetryTranslate => "retry_translate",
            Self::Response => "response",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
