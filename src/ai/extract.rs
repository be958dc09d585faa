//! Pulls the `{"japanese": ..., "english": ...}` object out of a completion.
//!
//! The backend is prompted, not contracted, to answer with bare JSON, so two
//! shapes are accepted: a fenced block tagged `json`, or the first flat
//! `{...}` span in the text.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use tracing::debug;

use crate::core::models::{Language, StructuredReply};
use crate::errors::RelayError;

static FENCED_JSON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)```json\b\s*(.*?)```").expect("static regex compile"));

static FLAT_OBJECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^{}]*\}").expect("static regex compile"));

/// Locates the JSON candidate in `raw`, fenced block first.
pub fn locate_json(raw: &str) -> Option<&str> {
    if let Some(caps) = FENCED_JSON_RE.captures(raw) {
        return caps.get(1).map(|m| m.as_str().trim());
    }
    FLAT_OBJECT_RE.find(raw).map(|m| m.as_str())
}

/// # Errors
///
/// - [`RelayError::NoJsonFound`] when neither shape is present.
/// - [`RelayError::MalformedJson`] when the candidate is not a JSON object
///   with string values for the recognised keys.
/// - [`RelayError::MissingFields`] when neither `japanese` nor `english` is set.
pub fn extract_structured_reply(raw: &str) -> Result<StructuredReply, RelayError> {
    let candidate = locate_json(raw).ok_or(RelayError::NoJsonFound)?;
    debug!(candidate_len = candidate.len(), "Located JSON candidate");

    let fields: ReplyFields = serde_json::from_str(candidate)?;

    let reply = StructuredReply::new(
        fields.japanese,
        fields.english,
        fields.first.unwrap_or(Language::Japanese),
    );
    if reply.is_empty() {
        return Err(RelayError::MissingFields);
    }
    Ok(reply)
}

/// Recognised fields plus which one appeared first.
#[derive(Default)]
struct ReplyFields {
    japanese: Option<String>,
    english: Option<String>,
    first: Option<Language>,
}

impl<'de> Deserialize<'de> for ReplyFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = ReplyFields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<ReplyFields, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields = ReplyFields::default();
                while let Some(key) = map.next_key::<String>()? {
                    let Some(language) = Language::from_key(&key) else {
                        map.next_value::<IgnoredAny>()?;
                        continue;
                    };

                    let value: Option<String> = map.next_value().map_err(|_| {
                        de::Error::custom(format!("`{}` must be a string", language.key()))
                    })?;
                    let Some(value) = value else {
                        continue;
                    };

                    fields.first.get_or_insert(language);
                    match language {
                        Language::Japanese => fields.japanese = Some(value),
                        Language::English => fields.english = Some(value),
                    }
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}
