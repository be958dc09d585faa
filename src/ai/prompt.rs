use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use serde_json::json;

/// Fixed behavioural constraint sent as the system message on every request.
pub const SYSTEM_INSTRUCTION: &str = "You are a bilingual Japanese/English proofreader and translator. \
The user message is a JSON object whose `text` field holds the text to process. \
Detect the language of that text. \
If it is Japanese, correct it into natural Japanese and translate it into English, \
then reply with exactly {\"japanese\": \"<corrected Japanese>\", \"english\": \"<English translation>\"}. \
If it is English, correct it into natural English and translate it into Japanese, \
then reply with exactly {\"english\": \"<corrected English>\", \"japanese\": \"<Japanese translation>\"}. \
The key of the detected language always comes first. \
Reply with that JSON object only: no explanations and no other keys.";

/// One completion request: the system instruction plus the wrapped user text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system_instruction: &'static str,
    pub user_message: String,
}

impl CompletionRequest {
    #[must_use]
    pub fn new(user_text: &str) -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION,
            user_message: wrap_user_text(user_text),
        }
    }

    pub fn to_chat_messages(&self) -> Vec<ChatCompletionMessage> {
        vec![
            ChatCompletionMessage {
                role: MessageRole::system,
                content: Content::Text(self.system_instruction.to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text(self.user_message.clone()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
        ]
    }
}

/// `{"text": <user text>}` with JSON escaping applied by `serde_json`.
#[must_use]
pub fn wrap_user_text(user_text: &str) -> String {
    json!({ "text": user_text }).to_string()
}
