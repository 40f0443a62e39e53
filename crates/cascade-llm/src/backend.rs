use async_trait::async_trait;
use thiserror::Error;

use cascade_core::Persona;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("authentication error: {0}")]
    Auth(String),
}

pub type Result<T> = std::result::Result<T, BackendError>;

/// A text generation backend, invoked once per pipeline stage.
///
/// Implementations send the stage's persona framing alongside the built
/// prompt and return the complete generated text. Retries, if any, live
/// behind this trait; the pipeline itself never retries a stage.
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Generate one completion for `prompt`, framed by `persona`.
    async fn generate(&self, persona: &Persona, prompt: &str) -> Result<String>;
}
