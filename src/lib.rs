/*!
 * # transguard - guarded machine translation with AI
 *
 * A Rust library that translates short texts with an LLM while screening
 * the input for unsafe content and checking the output quality.
 *
 * ## Features
 *
 * - Safety screening (PII, harmful content, prompt injection) before any
 *   translation is attempted, failing closed on unexpected model output
 * - Quality check of every translation with a bounded retry loop
 * - Model backends:
 *   - Ollama (local LLM)
 *   - Anthropic API
 *   - Mock provider for tests
 * - ISO 639-1 and ISO 639-2 language code normalization
 * - Bounded-concurrency batch translation
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: The guarded pipeline:
 *   - `translation::state`: Request state shared by all stages
 *   - `translation::nodes`: One node per stage
 *   - `translation::pipeline`: Stage graph and orchestrator
 *   - `translation::service`: Entry point for callers
 * - `language_utils`: Language code and text normalization
 * - `providers`: Client implementations for the LLM backends:
 *   - `providers::ollama`: Ollama API client
 *   - `providers::anthropic`: Anthropic API client
 *   - `providers::mock`: Scriptable mock
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ProviderError, TranslationError};
pub use language_utils::{normalize_language, normalize_text};
pub use translation::{TranslationOutcome, TranslationRequest, TranslationService};
