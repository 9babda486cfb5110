use serde::{Deserialize, Serialize};

use crate::models::ChatMessage;

// Every request field is optional on the wire. Handlers check the master key
// before they look at anything else, so a bad key is reported ahead of a
// missing field.

// -- Auth --

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub uid: Option<String>,
    pub pass: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub uid: Option<String>,
    pub pass: Option<String>,
    pub key: Option<String>,
}

// -- Messages --

#[derive(Debug, Default, Deserialize)]
pub struct UploadRequest {
    pub uid: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub video: Option<String>,
    /// Conversation title.
    pub cid: Option<String>,
    /// `None`, `""` or the literal `"null"` ask the server to start a new conversation.
    pub chat_uid: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RetrieveRequest {
    pub uid: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteChatRequest {
    pub uid: Option<String>,
    pub chat: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RenameChatRequest {
    pub uid: Option<String>,
    pub c_uid: Option<String>,
    pub updated_title: Option<String>,
    pub key: Option<String>,
}

// -- Responses --

/// Success body. `status` is mirrored as the HTTP status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversations: Option<Vec<ChatMessage>>,
}

impl StatusResponse {
    /// Bare `{"status": 200}`.
    pub fn success() -> Self {
        Self {
            status: 200,
            message: None,
            user: None,
            chat_uid: None,
            conversations: None,
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success()
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_chat_uid(mut self, chat_uid: impl Into<String>) -> Self {
        self.chat_uid = Some(chat_uid.into());
        self
    }

    pub fn with_conversations(mut self, conversations: Vec<ChatMessage>) -> Self {
        self.conversations = Some(conversations);
        self
    }
}

/// Failure body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
