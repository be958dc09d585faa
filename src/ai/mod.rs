//! All AI/LLM functionality

pub mod client;
pub mod extract;
pub mod prompt;

// Re-export main types for convenience
pub use client::{LlmClient, request_completion};
pub use extract::extract_structured_reply;
pub use prompt::{CompletionRequest, SYSTEM_INSTRUCTION};
