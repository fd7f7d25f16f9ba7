/*!
 * Guarded translation for single texts using AI providers.
 *
 * This module contains the translation pipeline and the service that runs it.
 * It is split into several submodules:
 *
 * - `state`: Request, per-request state and the label/verdict enums
 * - `prompts`: Prompt templates for the model-calling stages
 * - `nodes`: One node per pipeline stage
 * - `pipeline`: Stage graph and orchestrator
 * - `service`: Backend construction, single and batch translation
 */

// Re-export main types for easier usage
pub use self::nodes::TranslationOutcome;
pub use self::pipeline::{PipelineConfig, Stage, TranslationPipeline};
pub use self::prompts::PromptTemplate;
pub use self::service::TranslationService;
pub use self::state::{QcVerdict, SafeguardLabel, TranslationRequest, TranslationState};

// Submodules
pub mod nodes;
pub mod pipeline;
pub mod prompts;
pub mod service;
pub mod state;
