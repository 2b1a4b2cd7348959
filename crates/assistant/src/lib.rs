//! Clinic chat assistant: a pluggable completion backend wrapped so callers
//! always get a displayable reply.

use std::sync::Arc;

use async_trait::async_trait;
use shared::domain::{ChatMessage, Language};
use thiserror::Error;
use tracing::{debug, warn};

mod conversation;
pub mod gemini;
pub mod prompts;

pub use conversation::Conversation;
pub use gemini::{GeminiBackend, GeminiConfig};

/// Only the most recent messages are sent upstream.
pub const HISTORY_WINDOW: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub history: Vec<ChatMessage>,
    pub message: String,
    pub language: Language,
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("assistant backend is not configured")]
    NotConfigured,
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed completion response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Returns the model's text, possibly empty.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

/// Used when no API key is available; every request fails.
pub struct MissingBackend;

#[async_trait]
impl CompletionBackend for MissingBackend {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, CompletionError> {
        Err(CompletionError::NotConfigured)
    }
}

#[derive(Clone)]
pub struct Assistant {
    backend: Arc<dyn CompletionBackend>,
}

impl Assistant {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    pub fn unconfigured() -> Self {
        Self::new(Arc::new(MissingBackend))
    }

    /// Never fails: backend errors become the localized apology and empty
    /// answers become the localized rephrase prompt. No retries.
    pub async fn reply(&self, history: &[ChatMessage], message: &str, language: Language) -> String {
        let recent = &history[history.len().saturating_sub(HISTORY_WINDOW)..];
        let request = CompletionRequest {
            history: recent.to_vec(),
            message: message.to_string(),
            language,
        };

        match self.backend.complete(request).await {
            Ok(text) if text.trim().is_empty() => {
                debug!(%language, "assistant returned an empty reply");
                prompts::rephrase(language).to_string()
            }
            Ok(text) => text,
            Err(error) => {
                warn!(%error, %language, "assistant backend failed");
                prompts::apology(language).to_string()
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
