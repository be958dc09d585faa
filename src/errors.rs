use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Signature verification failed: {0}")]
    Authentication(String),

    #[error("Completion backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Completion backend returned no text")]
    EmptyCompletion,

    #[error("No JSON object found in completion")]
    NoJsonFound,

    #[error("Malformed JSON in completion: {0}")]
    MalformedJson(String),

    #[error("Completion JSON has neither `japanese` nor `english`")]
    MissingFields,

    #[error("Failed to deliver reply: {0}")]
    Delivery(String),

    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RelayError {
    /// Whether this failure is contained to a single event.
    #[must_use]
    pub fn is_event_local(&self) -> bool {
        matches!(
            self,
            RelayError::BackendUnavailable(_)
                | RelayError::EmptyCompletion
                | RelayError::NoJsonFound
                | RelayError::MalformedJson(_)
                | RelayError::MissingFields
                | RelayError::Delivery(_)
        )
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(error: reqwest::Error) -> Self {
        RelayError::BackendUnavailable(error.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(error: serde_json::Error) -> Self {
        RelayError::MalformedJson(error.to_string())
    }
}
