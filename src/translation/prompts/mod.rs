/*!
 * Prompt engineering for guarded translation.
 *
 * This module provides the templates used by the safety classifier, the
 * translator, the quality checker and the retry translator.
 */

pub mod templates;

// Re-export main types
pub use templates::PromptTemplate;
