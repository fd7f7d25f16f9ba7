/*!
 * Pipeline stages.
 *
 * Each node is stateless apart from its injected dependencies and works
 * only on the `TranslationState` it is handed:
 * - `normalize`: language code and text normalization
 * - `safeguard`: safety classification, routing decision, rejection
 * - `translate`: first translation and quality-driven re-translation
 * - `quality`: quality check and the retry gate
 * - `response`: terminal stage and outcome assembly
 */

use async_trait::async_trait;

use crate::errors::TranslationError;
use crate::translation::pipeline::Stage;
use crate::translation::state::TranslationState;

pub mod normalize;
pub mod quality;
pub mod response;
pub mod safeguard;
pub mod translate;

pub use normalize::NormalizeInputNode;
pub use quality::{QualityCheckNode, RetryGateNode};
pub use response::{ResponseNode, TranslationOutcome};
pub use safeguard::{SafeguardClassifyNode, SafeguardDecisionNode, SafeguardFailResponseNode};
pub use translate::{RetryTranslateNode, TranslateNode};

/// A single stage of the translation pipeline
#[async_trait]
pub trait PipelineNode: Send + Sync {
    /// Stage this node implements
    fn stage(&self) -> Stage;

    /// Run the stage, leaving every field it touches fully populated
    async fn run(&self, state: &mut TranslationState) -> Result<(), TranslationError>;
}
