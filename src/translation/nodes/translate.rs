use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TranslationError;
use crate::language_utils::language_display_name;
use crate::providers::ModelInvoker;
use crate::translation::pipeline::Stage;
use crate::translation::prompts::PromptTemplate;
use crate::translation::state::TranslationState;

use super::PipelineNode;

/// A reply wrapped entirely in a markdown code fence
static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A```[A-Za-z0-9_-]*[ \t]*\r?\n(.*?)\r?\n?```\z").expect("valid code fence regex")
});

/// Trim model output and unwrap a surrounding code fence
pub fn clean_model_output(raw: &str) -> String {
    let trimmed = raw.trim();
    match CODE_FENCE.captures(trimmed) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()).trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// Produces the first translation of the normalized text
#[derive(Debug, Clone)]
pub struct TranslateNode {
    invoker: Arc<dyn ModelInvoker>,
    template: PromptTemplate,
    temperature: f32,
}

impl TranslateNode {
    pub fn new(invoker: Arc<dyn ModelInvoker>, temperature: f32) -> Self {
        Self {
            invoker,
            template: PromptTemplate::translation(),
            temperature,
        }
    }
}

#[async_trait]
impl PipelineNode for TranslateNode {
    fn stage(&self) -> Stage {
        Stage::Translate
    }

    async fn run(&self, state: &mut TranslationState) -> Result<(), TranslationError> {
        let text = state.require_normalized_text(self.stage())?;
        let source = language_display_name(&state.source_language);
        let target = language_display_name(&state.target_language);
        let prompt = self.template.render(&[
            ("source_language", source.as_str()),
            ("target_language", target.as_str()),
            ("text", text),
        ]);

        let raw = self.invoker
            .invoke(&prompt, self.temperature)
            .await
            .map_err(|e| TranslationError::model(self.stage(), e))?;

        let translated = clean_model_output(&raw);
        debug!("{} Translated {} -> {} ({} chars)",
            state.log_tag(), state.source_language, state.target_language, translated.chars().count());

        state.translated_text = Some(translated);
        Ok(())
    }
}

/// Re-translates after a failed quality check, using the rejected output as context
#[derive(Debug, Clone)]
pub struct RetryTranslateNode {
    invoker: Arc<dyn ModelInvoker>,
    template: PromptTemplate,
    temperature: f32,
}

impl RetryTranslateNode {
    pub fn new(invoker: Arc<dyn ModelInvoker>, temperature: f32) -> Self {
        Self {
            invoker,
            template: PromptTemplate::retry_translation(),
            temperature,
        }
    }
}

#[async_trait]
impl PipelineNode for RetryTranslateNode {
    fn stage(&self) -> Stage {
        Stage::RetryTranslate
    }

    async fn run(&self, state: &mut TranslationState) -> Result<(), TranslationError> {
        let source_text = state.require_normalized_text(self.stage())?;
        let failed = state.require_translated_text(self.stage())?;
        let source = language_display_name(&state.source_language);
        let target = language_display_name(&state.target_language);
        let prompt = self.template.render(&[
            ("source_language", source.as_str()),
            ("target_language", target.as_str()),
            ("source_text", source_text),
            ("failed_translation", failed),
        ]);

        let raw = self.invoker
            .invoke(&prompt, self.temperature)
            .await
            .map_err(|e| TranslationError::model(self.stage(), e))?;

        state.translated_text = Some(clean_model_output(&raw));
        state.retry_count += 1;
        info!("{} Retry translation {}/{}", state.log_tag(), state.retry_count, state.max_retry_count());
        Ok(())
    }
}
