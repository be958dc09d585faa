//! Dispatches webhook events to the proofreading pipeline.
//!
//! Text messages run completion → extraction → formatting → reply, one event
//! at a time in delivery order. Every other event type is logged and skipped.
//! A failing event is recorded in the [`BatchReport`] and never stops the
//! events after it.
//!
//! Redelivered events are processed again; nothing here deduplicates.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::ai::{extract_structured_reply, request_completion};
use crate::clients::{CompletionBackend, ReplyTransport};
use crate::core::models::{InboundEvent, TextMessageEvent};
use crate::errors::RelayError;
use crate::line::format_reply;

#[derive(Debug)]
pub enum EventOutcome {
    Replied { index: usize, text: String },
    Failed { index: usize, error: RelayError },
    Ignored { index: usize, event_type: String },
}

impl EventOutcome {
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            EventOutcome::Replied { index, .. }
            | EventOutcome::Failed { index, .. }
            | EventOutcome::Ignored { index, .. } => *index,
        }
    }
}

/// Per-event results of one webhook request, in event order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<EventOutcome>,
}

impl BatchReport {
    #[must_use]
    pub fn replied_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EventOutcome::Replied { .. }))
            .count()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EventOutcome::Failed { .. }))
            .count()
    }

    #[must_use]
    pub fn ignored_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EventOutcome::Ignored { .. }))
            .count()
    }
}

#[derive(Clone)]
pub struct EventRouter {
    backend: Arc<dyn CompletionBackend>,
    transport: Arc<dyn ReplyTransport>,
}

impl EventRouter {
    pub fn new(backend: Arc<dyn CompletionBackend>, transport: Arc<dyn ReplyTransport>) -> Self {
        Self { backend, transport }
    }

    pub async fn dispatch(&self, events: &[InboundEvent]) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, event) in events.iter().enumerate() {
            let outcome = match event {
                InboundEvent::TextMessage(message) => {
                    if message.is_redelivery {
                        warn!(
                            event_index = index,
                            webhook_event_id = message.webhook_event_id.as_deref().unwrap_or(""),
                            "Processing redelivered event"
                        );
                    }
                    match self.process_text_message(message).await {
                        Ok(text) => {
                            info!(event_index = index, "Text message answered");
                            EventOutcome::Replied { index, text }
                        }
                        Err(e) if e.is_event_local() => {
                            warn!(event_index = index, error = %e, "Text message pipeline failed");
                            EventOutcome::Failed { index, error: e }
                        }
                        Err(e) => {
                            error!(
                                event_index = index,
                                error = %e,
                                "Text message pipeline failed outside the event"
                            );
                            EventOutcome::Failed { index, error: e }
                        }
                    }
                }
                InboundEvent::Other { .. } => {
                    let event_type = event.type_tag();
                    info!(event_index = index, event_type, "Ignoring event");
                    EventOutcome::Ignored {
                        index,
                        event_type: event_type.to_string(),
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        report
    }

    async fn process_text_message(&self, message: &TextMessageEvent) -> Result<String, RelayError> {
        let completion = request_completion(self.backend.as_ref(), &message.text).await?;
        let reply = extract_structured_reply(&completion)?;
        let text = format_reply(&reply);
        self.transport
            .reply_text(&message.reply_token, &text)
            .await?;
        Ok(text)
    }
}
