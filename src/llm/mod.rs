pub mod gemini;

use anyhow::Result;
use async_trait::async_trait;

/// Content-generation service boundary. `Ok(None)` means the service
/// produced no usable text, which callers treat as an ordinary failure
/// rather than an error.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Option<String>>;
}
