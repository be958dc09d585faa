//! Webhook API: signature check, event routing and the Lambda entrypoint

pub mod event_router;
pub mod handler;
pub mod helpers;
pub mod parsing;
pub mod signature;

// Re-export the main handler for convenience
pub use event_router::{BatchReport, EventOutcome, EventRouter};
pub use handler::{WebhookHandler, WebhookResponse, function_handler};
