//! Large-language-model completions.
//!
//! The summarisation stage depends only on [`CompletionService`]; the
//! OpenAI-compatible client is the production implementation.

pub mod completion;
pub mod openai;

pub use completion::{CompletionRequest, CompletionService, complete_or_error_text};
pub use openai::{OpenAiCompletionService, OpenAiConfig};
