use serde::{Deserialize, Serialize};

/// One question/answer turn as returned to clients.
/// Rows sharing a `chat_uid` form a single conversation; `chat_id` is its title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub question: String,
    pub answer: String,
    pub video: String,
    pub chat_id: String,
    pub chat_uid: String,
}
