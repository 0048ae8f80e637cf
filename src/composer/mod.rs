pub mod openai;
pub mod prompt;

use anyhow::Result;
use async_trait::async_trait;

pub use openai::OpenAiComposer;
pub use prompt::{build_prompt, ComposerPrompt};

/// Generative text backend. Treated as unreliable: calls may fail or
/// return text that parses to nothing.
#[async_trait]
pub trait Composer: Send + Sync {
    async fn compose(&self, prompt: &ComposerPrompt) -> Result<String>;
}
