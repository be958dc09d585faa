//! LINE Messaging API client module
//!
//! Only the reply endpoint is used: one text message per reply token.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::clients::ReplyTransport;
use crate::core::config::AppConfig;
use crate::errors::RelayError;

/// LINE's per-message limit for `text` messages, in characters.
pub const TEXT_MESSAGE_LIMIT: usize = 5_000;

pub struct LineClient {
    http: Client,
    access_token: String,
    base_url: String,
}

impl LineClient {
    /// # Errors
    ///
    /// Returns [`RelayError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, RelayError> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| {
                RelayError::Configuration(format!("Failed to build LINE HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            access_token: config.line_channel_access_token.clone(),
            base_url: config.line_api_base_url.clone(),
        })
    }

    fn headers(&self) -> Result<HeaderMap, RelayError> {
        let mut headers = HeaderMap::new();
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", self.access_token))
            .map_err(|e| RelayError::Configuration(format!("Invalid Authorization header: {e}")))?;
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl ReplyTransport for LineClient {
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), RelayError> {
        let payload = build_reply_payload(reply_token, text);

        let response = self
            .http
            .post(format!("{}/v2/bot/message/reply", self.base_url))
            .headers(self.headers()?)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RelayError::Delivery(format!("LINE reply request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            error!("LINE reply failed: status={} body={}", status, body_text);
            return Err(RelayError::Delivery(format!(
                "LINE reply API error (status {status}): {body_text}"
            )));
        }

        info!("Reply delivered");
        Ok(())
    }
}

/// Body for `POST /v2/bot/message/reply` carrying a single text message.
#[must_use]
pub fn build_reply_payload(reply_token: &str, text: &str) -> Value {
    json!({
        "replyToken": reply_token,
        "messages": [
            { "type": "text", "text": truncate_chars(text, TEXT_MESSAGE_LIMIT) }
        ]
    })
}

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_payload_shape() {
        let payload = build_reply_payload("token-1", "🇺🇸 Hi");
        assert_eq!(payload["replyToken"], "token-1");
        let messages = payload["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["type"], "text");
        assert_eq!(messages[0]["text"], "🇺🇸 Hi");
    }

    #[test]
    fn test_long_text_truncated_on_char_boundary() {
        let long = "あ".repeat(TEXT_MESSAGE_LIMIT + 10);
        let payload = build_reply_payload("t", &long);
        let text = payload["messages"][0]["text"].as_str().unwrap();
        assert_eq!(text.chars().count(), TEXT_MESSAGE_LIMIT);
    }

    #[test]
    fn test_short_text_untouched() {
        assert_eq!(truncate_chars("abc", 5), "abc");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
    }
}
