use chatbot_types::models::ChatMessage;

// Database row types. These map directly to SQLite rows and are kept apart
// from the chatbot-types wire models.

pub struct UserRow {
    pub user_id: String,
    pub password_hash: String,
    pub created_at: String,
}

pub struct MessageRow {
    pub id: i64,
    pub chat_id: String,
    pub chat_uid: String,
    pub user_id: String,
    pub question: String,
    pub answer: String,
    pub video: String,
    pub created_at: String,
    pub modified_at: String,
}

impl From<MessageRow> for ChatMessage {
    fn from(row: MessageRow) -> Self {
        ChatMessage {
            question: row.question,
            answer: row.answer,
            video: row.video,
            chat_id: row.chat_id,
            chat_uid: row.chat_uid,
        }
    }
}
