use serde::Deserialize;
use serde_json::Value;

use super::json_path::{v_bool, v_str};

/// Top-level body LINE posts to the webhook.
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub destination: Option<String>,
    pub events: Vec<Value>,
}

impl WebhookEnvelope {
    /// Classifies every raw event, keeping the order LINE sent them in.
    #[must_use]
    pub fn inbound_events(&self) -> Vec<InboundEvent> {
        self.events.iter().map(InboundEvent::from_value).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessageEvent {
    pub reply_token: String,
    pub text: String,
    pub webhook_event_id: Option<String>,
    pub is_redelivery: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    TextMessage(TextMessageEvent),
    Other { event_type: String },
}

impl InboundEvent {
    /// A text message needs `type == "message"`, `message.type == "text"`,
    /// a string `message.text` and a `replyToken`. Anything else is `Other`.
    #[must_use]
    pub fn from_value(event: &Value) -> Self {
        let event_type = v_str(event, &["type"]).unwrap_or("unknown");

        if event_type == "message" && v_str(event, &["message", "type"]) == Some("text") {
            if let (Some(reply_token), Some(text)) = (
                v_str(event, &["replyToken"]),
                v_str(event, &["message", "text"]),
            ) {
                return InboundEvent::TextMessage(TextMessageEvent {
                    reply_token: reply_token.to_string(),
                    text: text.to_string(),
                    webhook_event_id: v_str(event, &["webhookEventId"]).map(ToString::to_string),
                    is_redelivery: v_bool(event, &["deliveryContext", "isRedelivery"])
                        .unwrap_or(false),
                });
            }
        }

        let tag = match (event_type, v_str(event, &["message", "type"])) {
            ("message", Some(message_type)) => format!("message.{message_type}"),
            (other, _) => other.to_string(),
        };
        InboundEvent::Other { event_type: tag }
    }

    #[must_use]
    pub fn type_tag(&self) -> &str {
        match self {
            InboundEvent::TextMessage(_) => "message.text",
            InboundEvent::Other { event_type } => event_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Japanese,
    English,
}

impl Language {
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Language::Japanese => "japanese",
            Language::English => "english",
        }
    }

    #[must_use]
    pub fn flag(self) -> &'static str {
        match self {
            Language::Japanese => "🇯🇵",
            Language::English => "🇺🇸",
        }
    }

    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Language::Japanese => Language::English,
            Language::English => Language::Japanese,
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "japanese" => Some(Language::Japanese),
            "english" => Some(Language::English),
            _ => None,
        }
    }
}

/// Corrected text and translation pulled out of a completion.
///
/// `source` is the language whose key came first in the completion, which the
/// system instruction ties to the detected input language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredReply {
    pub japanese: Option<String>,
    pub english: Option<String>,
    pub source: Language,
}

impl StructuredReply {
    #[must_use]
    pub fn new(japanese: Option<String>, english: Option<String>, source: Language) -> Self {
        Self {
            japanese,
            english,
            source,
        }
    }

    #[must_use]
    pub fn get(&self, language: Language) -> Option<&str> {
        match language {
            Language::Japanese => self.japanese.as_deref(),
            Language::English => self.english.as_deref(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.japanese.is_none() && self.english.is_none()
    }

    /// Present fields, source language first.
    pub fn ordered(&self) -> impl Iterator<Item = (Language, &str)> {
        [self.source, self.source.other()]
            .into_iter()
            .filter_map(move |lang| self.get(lang).map(|value| (lang, value)))
    }
}
