pub mod backend;
pub mod config;
pub mod openai;

pub use backend::{BackendError, Result, TextBackend};
pub use config::BackendConfig;
pub use openai::OpenAiBackend;
