use crate::model::GenerationError;

/// External text generation: one prompt in, generated text out.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
