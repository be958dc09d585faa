//! Webhook handler and its Lambda entrypoint.
//!
//! [`WebhookHandler::handle`] owns the request lifecycle:
//! - verify `X-Line-Signature` over the raw body, rejecting with 401
//! - parse the envelope and run every event through the [`EventRouter`]
//! - acknowledge with 200 once all events settled, whatever their outcome
//!
//! [`function_handler`] adapts API Gateway / function URL proxy events to it.

use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::event_router::{BatchReport, EventRouter};
use super::{helpers, parsing, signature};
use crate::ai::LlmClient;
use crate::clients::{CompletionBackend, ReplyTransport};
use crate::core::config::AppConfig;
use crate::core::models::WebhookEnvelope;
use crate::errors::RelayError;
use crate::line::LineClient;

pub const SIGNATURE_HEADER: &str = "X-Line-Signature";
pub const WEBHOOK_PATH: &str = "/webhook";

/// Outcome of one webhook request.
#[derive(Debug)]
pub struct WebhookResponse {
    pub status_code: u16,
    pub body: Value,
    /// Per-event results; `None` when no event was dispatched.
    pub report: Option<BatchReport>,
}

impl WebhookResponse {
    fn acknowledged(report: BatchReport) -> Self {
        Self {
            status_code: 200,
            body: helpers::ok_body(),
            report: Some(report),
        }
    }

    fn error(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            body: helpers::error_body(message),
            report: None,
        }
    }

    #[must_use]
    pub fn to_proxy_response(&self) -> Value {
        helpers::proxy_response(self.status_code, &self.body)
    }
}

pub struct WebhookHandler {
    channel_secret: String,
    router: EventRouter,
}

impl WebhookHandler {
    pub fn new(
        channel_secret: impl Into<String>,
        backend: Arc<dyn CompletionBackend>,
        transport: Arc<dyn ReplyTransport>,
    ) -> Self {
        Self {
            channel_secret: channel_secret.into(),
            router: EventRouter::new(backend, transport),
        }
    }

    /// Builds the handler with the real `OpenAI` and LINE clients.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Configuration`] if either HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, RelayError> {
        let backend: Arc<dyn CompletionBackend> = Arc::new(LlmClient::new(config)?);
        let transport: Arc<dyn ReplyTransport> = Arc::new(LineClient::new(config)?);
        Ok(Self::new(
            config.line_channel_secret.clone(),
            backend,
            transport,
        ))
    }

    /// Handles one webhook delivery.
    ///
    /// `body` must be the raw request bytes; `signature` is the
    /// `X-Line-Signature` header value if present.
    #[tracing::instrument(
        level = "info",
        skip_all,
        fields(request_id = %Uuid::new_v4(), body_len = body.len())
    )]
    pub async fn handle(&self, body: &[u8], signature: Option<&str>) -> WebhookResponse {
        if let Err(e) = self.authenticate(body, signature) {
            warn!("Rejecting webhook: {}", e);
            return WebhookResponse::error(401, "Invalid signature");
        }

        let envelope: WebhookEnvelope = match serde_json::from_slice(body) {
            Ok(envelope) => envelope,
            Err(e) => {
                let e = RelayError::InvalidPayload(e.to_string());
                error!("{}", e);
                return WebhookResponse::error(500, &e.to_string());
            }
        };

        let events = envelope.inbound_events();
        info!(
            destination = envelope.destination.as_deref().unwrap_or(""),
            event_count = events.len(),
            "LINE signature verified, dispatching events"
        );

        let report = self.router.dispatch(&events).await;
        info!(
            replied = report.replied_count(),
            failed = report.failed_count(),
            ignored = report.ignored_count(),
            "Webhook processed"
        );

        WebhookResponse::acknowledged(report)
    }

    fn authenticate(&self, body: &[u8], claimed: Option<&str>) -> Result<(), RelayError> {
        let Some(claimed) = claimed.filter(|s| !s.trim().is_empty()) else {
            return Err(RelayError::Authentication(format!(
                "missing {SIGNATURE_HEADER} header"
            )));
        };

        if signature::verify_line_signature(body, claimed, &self.channel_secret) {
            Ok(())
        } else {
            Err(RelayError::Authentication("signature mismatch".to_string()))
        }
    }
}

/// Lambda handler for the webhook entrypoint.
///
/// Only `POST /webhook` reaches [`WebhookHandler::handle`]; anything else gets
/// a 404 or 405 without touching the signature.
///
/// # Errors
///
/// Never returns `Err`; every failure is reported as an HTTP response.
pub async fn function_handler(
    handler: &WebhookHandler,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    let payload = &event.payload;

    if let Some(path) = parsing::request_path(payload) {
        if !path.trim_end_matches('/').ends_with(WEBHOOK_PATH) {
            info!(raw_path = %path, "Unknown path");
            return Ok(helpers::err_response(404, "Not found"));
        }
    }

    if let Some(method) = parsing::request_method(payload) {
        if !method.eq_ignore_ascii_case("POST") {
            info!(method = %method, "Unsupported method");
            return Ok(helpers::err_response(405, "Method not allowed"));
        }
    }

    let body = match parsing::raw_body_bytes(payload) {
        Ok(body) => body,
        Err(e) => {
            error!("{}", e);
            return Ok(helpers::err_response(400, &e.to_string()));
        }
    };

    let signature = payload
        .get("headers")
        .and_then(|headers| parsing::get_header_value(headers, SIGNATURE_HEADER));

    Ok(handler.handle(&body, signature).await.to_proxy_response())
}
