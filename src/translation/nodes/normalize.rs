use async_trait::async_trait;
use log::{debug, warn};

use crate::errors::TranslationError;
use crate::language_utils::{is_known_language, normalize_language, normalize_text};
use crate::translation::pipeline::Stage;
use crate::translation::state::TranslationState;

use super::PipelineNode;

/// Canonicalizes language codes and bounds the input text
#[derive(Debug, Default, Clone)]
pub struct NormalizeInputNode;

impl NormalizeInputNode {
    pub fn new() -> Self {
        Self
    }

    /// Apply normalization to the state; never fails
    pub fn normalize(&self, state: &mut TranslationState) {
        state.source_language = normalize_language(&state.source_language);
        state.target_language = normalize_language(&state.target_language);

        for code in [&state.source_language, &state.target_language] {
            if !code.is_empty() && !is_known_language(code) {
                warn!("{} Unrecognized language code '{}'", state.log_tag(), code);
            }
        }

        if state.normalized_text.is_none() {
            let normalized = normalize_text(state.text());
            if normalized.chars().count() != state.text().chars().count() {
                debug!(
                    "{} Input truncated from {} to {} characters",
                    state.log_tag(),
                    state.text().chars().count(),
                    normalized.chars().count()
                );
            }
            state.normalized_text = Some(normalized);
        }
    }
}

#[async_trait]
impl PipelineNode for NormalizeInputNode {
    fn stage(&self) -> Stage {
        Stage::Normalize
    }

    async fn run(&self, state: &mut TranslationState) -> Result<(), TranslationError> {
        self.normalize(state);
        Ok(())
    }
}
