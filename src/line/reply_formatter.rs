//! Renders a [`StructuredReply`] as the text sent back to the chat.

use crate::core::models::StructuredReply;

const FIELD_SEPARATOR: &str = "\n\n";

/// One `<flag> <value>` line per present field, detected source language
/// first, separated by a blank line.
#[must_use]
pub fn format_reply(reply: &StructuredReply) -> String {
    reply
        .ordered()
        .map(|(language, value)| format!("{} {}", language.flag(), value))
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Language;

    #[test]
    fn test_two_fields_japanese_source() {
        let reply = StructuredReply::new(
            Some("ここはどこですか？".to_string()),
            Some("Where is this place?".to_string()),
            Language::Japanese,
        );
        assert_eq!(
            format_reply(&reply),
            "🇯🇵 ここはどこですか？\n\n🇺🇸 Where is this place?"
        );
    }

    #[test]
    fn test_two_fields_english_source() {
        let reply = StructuredReply::new(
            Some("ここはどこですか？".to_string()),
            Some("Where is this place?".to_string()),
            Language::English,
        );
        assert_eq!(
            format_reply(&reply),
            "🇺🇸 Where is this place?\n\n🇯🇵 ここはどこですか？"
        );
    }

    #[test]
    fn test_single_field_has_no_separator() {
        let reply = StructuredReply::new(None, Some("Hello".to_string()), Language::Japanese);
        assert_eq!(format_reply(&reply), "🇺🇸 Hello");
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let reply = StructuredReply::new(
            Some("はい".to_string()),
            Some("Yes".to_string()),
            Language::Japanese,
        );
        assert_eq!(format_reply(&reply), format_reply(&reply.clone()));
    }
}
