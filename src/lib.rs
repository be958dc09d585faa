/// Kotoba - a LINE bot that proofreads and translates between Japanese and English.
///
/// The crate implements a single webhook Lambda:
/// 1. LINE posts message events to `POST /webhook`, signed with the channel secret
/// 2. Each text message is sent to `OpenAI` with a fixed proofreading instruction
/// 3. The JSON object in the completion is formatted and sent back via the reply token
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda (`lambda_runtime`) to host the webhook
/// - reqwest for the LINE Messaging API and the `OpenAI` Responses API
/// - hmac/sha2/base64 for `X-Line-Signature` verification
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use kotoba::api::WebhookHandler;
/// use kotoba::core::config::AppConfig;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     kotoba::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let handler = WebhookHandler::from_config(&config)?;
///
///     let body = br#"{"destination":"U0","events":[]}"#;
///     let signature = kotoba::api::signature::compute_signature(body, &config.line_channel_secret);
///     let response = handler.handle(body, Some(&signature)).await;
///     assert_eq!(response.status_code, 200);
///     Ok(())
/// }
/// ```
pub mod ai;
pub mod api;
pub mod clients;
pub mod core;
pub mod errors;
pub mod line;

pub use errors::RelayError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Log level comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// kotoba::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
