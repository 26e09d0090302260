use crate::{error::AnnadataError, generation::Generation, prompt::Prompt};
use async_trait::async_trait;

/// Hosted generative model provider.
///
/// Every backend (Gemini, OpenAI-compatible endpoints) implements this
/// trait so advisory variants stay independent of the transport.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Whether this provider requires an API key to function.
    fn requires_api_key(&self) -> bool;

    /// Send a prompt and return the raw model output.
    async fn generate(&self, prompt: &Prompt) -> Result<Generation, AnnadataError>;

    /// Check if the provider is reachable and configured.
    async fn is_available(&self) -> bool;
}
