use crate::error::Result;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

pub mod gemini;
pub mod prompt;

pub use gemini::GeminiTranslator;
pub use prompt::{build_translation_prompt, language_code_to_name, Emotionality, Liveliness, PromptOptions};

/// Ordered sequence of text fragments from a streaming translation call.
/// Concatenating the fragments in arrival order yields the full response.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

#[async_trait]
pub trait Translator: Send + Sync {
    /// Submit a prompt and receive the response as a fragment stream.
    async fn submit(&self, prompt: &str) -> Result<FragmentStream>;

    fn name(&self) -> &'static str;
}
