//! LLM (`OpenAI`) API client module
//!
//! Encapsulates the Responses API call used for proofreading and translation.

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::prompt::CompletionRequest;
use crate::clients::CompletionBackend;
use crate::core::config::AppConfig;
use crate::errors::RelayError;

const MAX_OUTPUT_TOKENS: usize = 2_000;

/// LLM API client for proofreading requests
pub struct LlmClient {
    http: Client,
    api_key: String,
    org_id: Option<String>,
    model_name: String,
    base_url: String,
}

impl LlmClient {
    /// # Errors
    ///
    /// Returns [`RelayError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, RelayError> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| {
                RelayError::Configuration(format!("Failed to build OpenAI HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            api_key: config.openai_api_key.clone(),
            org_id: config.openai_org_id.clone(),
            model_name: config.openai_model.clone(),
            base_url: config.openai_base_url.clone(),
        })
    }

    fn headers(&self) -> Result<HeaderMap, RelayError> {
        let mut headers = HeaderMap::new();
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| RelayError::Configuration(format!("Invalid Authorization header: {e}")))?;
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(org) = &self.org_id {
            let org_value = HeaderValue::from_str(org).map_err(|e| {
                RelayError::Configuration(format!("Invalid OpenAI-Organization header: {e}"))
            })?;
            headers.insert("OpenAI-Organization", org_value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, RelayError> {
        let prompt = request.to_chat_messages();

        #[cfg(feature = "debug-logs")]
        info!("Using prompt:\n{:?}", prompt);

        let request_body = json!({
            "model": self.model_name,
            "input": build_responses_input_from_prompt(&prompt),
            "max_output_tokens": MAX_OUTPUT_TOKENS
        });

        info!(model = %self.model_name, "Requesting completion");

        let response = self
            .http
            .post(format!("{}/v1/responses", self.base_url))
            .headers(self.headers()?)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                RelayError::BackendUnavailable(format!("OpenAI API request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(RelayError::BackendUnavailable(format!(
                "OpenAI API error (status {status}): {error_text}"
            )));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            RelayError::BackendUnavailable(format!("Failed to parse OpenAI response: {e}"))
        })?;

        let text = extract_output_text(&response_json).ok_or(RelayError::EmptyCompletion)?;
        debug!(chars = text.chars().count(), "Completion received");
        Ok(text)
    }
}

/// Builds the completion request for `user_text`, sends it, and rejects
/// blank answers.
///
/// # Errors
///
/// [`RelayError::BackendUnavailable`] from the transport, or
/// [`RelayError::EmptyCompletion`] when no text content came back.
pub async fn request_completion(
    backend: &dyn CompletionBackend,
    user_text: &str,
) -> Result<String, RelayError> {
    let request = CompletionRequest::new(user_text);
    let text = backend.complete(&request).await?;
    if text.trim().is_empty() {
        return Err(RelayError::EmptyCompletion);
    }
    Ok(text)
}

pub(crate) fn build_responses_input_from_prompt(prompt: &[ChatCompletionMessage]) -> Vec<Value> {
    prompt
        .iter()
        .map(|m| {
            let role_str = match m.role {
                MessageRole::system => "system",
                MessageRole::assistant => "assistant",
                MessageRole::user | MessageRole::function | MessageRole::tool => "user",
            };

            let parts: Vec<Value> = match &m.content {
                Content::Text(t) => vec![json!({ "type": "input_text", "text": t })],
                Content::ImageUrl(_) => Vec::new(),
            };

            json!({
                "role": role_str,
                "content": parts
            })
        })
        .collect()
}

/// Text of a Responses API answer: `output_text` when the API provides it,
/// otherwise every `output_text` part under `output[].content[]`.
pub(crate) fn extract_output_text(response_json: &Value) -> Option<String> {
    if let Some(text) = response_json.get("output_text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    let mut collected: Vec<String> = Vec::new();
    if let Some(items) = response_json.get("output").and_then(Value::as_array) {
        for item in items {
            let Some(parts) = item.get("content").and_then(Value::as_array) else {
                continue;
            };
            for p in parts {
                let is_output_text = p
                    .get("type")
                    .and_then(Value::as_str)
                    .is_some_and(|t| t == "output_text");
                if !is_output_text {
                    continue;
                }
                if let Some(s) = p.get("text").and_then(Value::as_str) {
                    collected.push(s.to_string());
                } else if let Some(s) = p
                    .get("text")
                    .and_then(|t| t.get("value"))
                    .and_then(Value::as_str)
                {
                    collected.push(s.to_string());
                }
            }
        }
    }

    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_responses_input_uses_typed_parts() {
        let prompt = CompletionRequest::new("hello").to_chat_messages();
        let input = build_responses_input_from_prompt(&prompt);

        assert_eq!(input.len(), 2);
        assert_eq!(input[0]["role"], "system");
        assert_eq!(input[0]["content"][0]["type"], "input_text");
        assert_eq!(input[1]["role"], "user");
        assert_eq!(input[1]["content"][0]["text"], r#"{"text":"hello"}"#);
    }

    #[test]
    fn test_extract_output_text_top_level() {
        let v = json!({"output_text": "{\"english\":\"Hi\"}"});
        assert_eq!(extract_output_text(&v).as_deref(), Some("{\"english\":\"Hi\"}"));
    }

    #[test]
    fn test_extract_output_text_from_parts() {
        let v = json!({
            "output": [
                {"type": "reasoning", "content": []},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "first"},
                    {"type": "refusal", "refusal": "no"},
                    {"type": "output_text", "text": {"value": "second"}}
                ]}
            ]
        });
        assert_eq!(extract_output_text(&v).as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn test_extract_output_text_none_when_absent() {
        assert!(extract_output_text(&json!({"output": []})).is_none());
        assert!(extract_output_text(&json!({})).is_none());
    }
}
