/*!
 * Request state threaded through the translation pipeline.
 *
 * One `TranslationState` is created per request at intake, handed to each
 * stage by exclusive reference, and dropped once the outcome is built.
 */

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TranslationError;
use crate::translation::pipeline::Stage;

/// Safety classification of the input text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafeguardLabel {
    /// Safe to translate
    Pass,
    /// Contains personal data
    Pii,
    /// Harmful content, also the fail-closed default
    Harmful,
    /// Attempts to override the translator's instructions
    PromptInjection,
}

impl SafeguardLabel {
    /// All labels the classifier may produce
    pub const ALL: [SafeguardLabel; 4] = [
        Self::Pass,
        Self::Pii,
        Self::Harmful,
        Self::PromptInjection,
    ];

    /// Wire representation of the label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Pii => "PII",
            Self::Harmful => "HARMFUL",
            Self::PromptInjection => "PROMPT_INJECTION",
        }
    }

    /// Parse raw classifier output, coercing anything unexpected to `Harmful`
    pub fn parse_fail_closed(raw: &str) -> Self {
        raw.trim().to_uppercase().parse().unwrap_or(Self::Harmful)
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl fmt::Display for SafeguardLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SafeguardLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| format!("Unknown safeguard label: {}", s))
    }
}

/// Verdict of the translation quality check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QcVerdict {
    Yes,
    No,
}

impl QcVerdict {
    /// Parse raw quality-check output; only an explicit YES passes
    pub fn parse_fail_closed(raw: &str) -> Self {
        let cleaned = raw
            .trim()
            .trim_end_matches(['.', '!'])
            .to_uppercase();
        if cleaned == "YES" { Self::Yes } else { Self::No }
    }

    /// Whether the raw output was a recognizable verdict at all
    pub fn is_recognized(raw: &str) -> bool {
        let cleaned = raw
            .trim()
            .trim_end_matches(['.', '!'])
            .to_uppercase();
        cleaned == "YES" || cleaned == "NO"
    }
}

impl fmt::Display for QcVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => write!(f, "YES"),
            Self::No => write!(f, "NO"),
        }
    }
}

/// Incoming translation request as received from a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Source language code, in any casing or region form
    #[serde(default)]
    pub source_language: String,

    /// Target language code, in any casing or region form
    #[serde(default)]
    pub target_language: String,

    /// Text to translate
    #[serde(default)]
    pub text: String,
}

impl TranslationRequest {
    pub fn new(
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            source_language: source_language.into(),
            target_language: target_language.into(),
            text: text.into(),
        }
    }
}

/// Mutable record shared by every pipeline stage
#[derive(Debug, Clone)]
pub struct TranslationState {
    /// Correlation id for log lines of this request
    pub request_id: Uuid,

    pub source_language: String,

    pub target_language: String,

    /// Raw input text, never modified after intake
    text: String,

    /// Text bounded by the normalizer
    pub normalized_text: Option<String>,

    pub safeguard_label: Option<SafeguardLabel>,

    /// Rejection message, present iff the label is not PASS
    pub error_message: Option<String>,

    pub translated_text: Option<String>,

    pub qc_passed: Option<QcVerdict>,

    /// Whether the retry gate forced acceptance after exhausting the budget
    pub qc_forced: bool,

    /// Number of quality-driven re-translations performed so far
    pub retry_count: u32,

    /// Retry budget, constant for the lifetime of the request
    max_retry_count: u32,
}

impl TranslationState {
    /// Create the state for a fresh request
    pub fn new(request: TranslationRequest, max_retry_count: u32) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            source_language: request.source_language,
            target_language: request.target_language,
            text: request.text,
            normalized_text: None,
            safeguard_label: None,
            error_message: None,
            translated_text: None,
            qc_passed: None,
            qc_forced: false,
            retry_count: 0,
            max_retry_count,
        }
    }

    /// Raw input text as received at intake
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn max_retry_count(&self) -> u32 {
        self.max_retry_count
    }

    /// Whether another quality-driven retry fits in the budget
    pub fn has_retry_budget(&self) -> bool {
        self.retry_count < self.max_retry_count
    }

    /// Short prefix for log lines
    pub fn log_tag(&self) -> String {
        let id = self.request_id.simple().to_string();
        format!("[{}]", &id[..8])
    }

    pub fn require_normalized_text(&self, stage: Stage) -> Result<&str, TranslationError> {
        self.normalized_text
            .as_deref()
            .ok_or(TranslationError::MissingField { stage, field: "normalized_text" })
    }

    pub fn require_translated_text(&self, stage: Stage) -> Result<&str, TranslationError> {
        self.translated_text
            .as_deref()
            .ok_or(TranslationError::MissingField { stage, field: "translated_text" })
    }

    pub fn require_label(&self, stage: Stage) -> Result<SafeguardLabel, TranslationError> {
        self.safeguard_label
            .ok_or(TranslationError::MissingField { stage, field: "safeguard_label" })
    }
}
