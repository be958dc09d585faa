//! Seams to the external services the relay talks to.
//!
//! The handler only sees these traits, so the binary injects the real HTTP
//! clients once at startup and tests inject in-memory fakes.

use async_trait::async_trait;

use crate::ai::prompt::CompletionRequest;
use crate::errors::RelayError;

#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Raw completion text for `request`.
    ///
    /// Transport failures map to [`RelayError::BackendUnavailable`].
    async fn complete(&self, request: &CompletionRequest) -> Result<String, RelayError>;
}

#[async_trait]
pub trait ReplyTransport: Send + Sync {
    /// Sends one text message through a single-use reply token.
    ///
    /// Failures map to [`RelayError::Delivery`].
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), RelayError>;
}

pub use crate::ai::client::LlmClient;
pub use crate::line::client::LineClient;
