//! Generative-language-model client

use async_trait::async_trait;

use crate::error::Result;

pub mod gemini;
#[cfg(test)]
pub mod mock;

pub use gemini::GeminiClient;
#[cfg(test)]
#[allow(unused_imports)]
pub use mock::MockGenerator;

/// Single-turn text generation trait.
///
/// The pipeline owns the generation deadline and races it against this
/// call, so implementations only need to perform the request itself.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text from a prompt. An empty model response is an error.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
