use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use chatbot_db::Database;
use chatbot_types::models::ChatMessage;

use crate::error::StoreError;

/// Authentication and persistence facade over the chat database.
///
/// Every operation checks the caller's master key before touching storage,
/// then runs exactly one transaction. Nothing is retried.
pub struct ChatStore {
    db: Database,
    master_key: String,
}

impl ChatStore {
    pub fn new(db: Database, master_key: impl Into<String>) -> Self {
        Self {
            db,
            master_key: master_key.into(),
        }
    }

    pub fn authenticate(&self, key: Option<&str>) -> Result<(), StoreError> {
        match key {
            Some(key) if !key.is_empty() && key == self.master_key => Ok(()),
            _ => {
                warn!("Rejected request with invalid API key");
                Err(StoreError::Forbidden)
            }
        }
    }

    /// Lowercase hex SHA-256 of the password.
    pub fn hash_password(password: &str) -> String {
        hex::encode(Sha256::digest(password.as_bytes()))
    }

    pub fn register_user(&self, user_id: &str, password: &str, key: Option<&str>) -> Result<(), StoreError> {
        self.authenticate(key)?;

        let created = self
            .db
            .create_user(user_id, &Self::hash_password(password))
            .map_err(StoreError::internal("Error creating user"))?;
        if !created {
            return Err(StoreError::Conflict);
        }

        info!("Registered user {}", user_id);
        Ok(())
    }

    /// Returns the user id on success.
    pub fn login_user(&self, user_id: &str, password: &str, key: Option<&str>) -> Result<String, StoreError> {
        self.authenticate(key)?;

        let user = self
            .db
            .get_user(user_id)
            .map_err(StoreError::internal("Error during login"))?
            .ok_or(StoreError::NotFound)?;

        if user.password_hash != Self::hash_password(password) {
            return Err(StoreError::Unauthorized);
        }
        Ok(user.user_id)
    }

    /// Store one question/answer turn. The caller owns `chat_uid`; it is
    /// returned unchanged.
    #[allow(clippy::too_many_arguments)]
    pub fn upload_message(
        &self,
        user_id: &str,
        question: &str,
        answer: &str,
        video: &str,
        chat_id: &str,
        chat_uid: &str,
        key: Option<&str>,
    ) -> Result<String, StoreError> {
        self.authenticate(key)?;

        self.db
            .insert_message(user_id, question, answer, video, chat_id, chat_uid)
            .map_err(StoreError::internal("Error uploading query"))?;
        Ok(chat_uid.to_string())
    }

    /// Remove a whole conversation. Deleting an unknown conversation succeeds.
    pub fn delete_chat(&self, user_id: &str, chat_uid: &str, key: Option<&str>) -> Result<(), StoreError> {
        self.authenticate(key)?;

        let removed = self
            .db
            .delete_chat(user_id, chat_uid)
            .map_err(StoreError::internal("Error deleting chat"))?;
        debug!("Deleted {} rows of chat {} for {}", removed, chat_uid, user_id);
        Ok(())
    }

    pub fn list_messages(&self, user_id: &str, key: Option<&str>) -> Result<Vec<ChatMessage>, StoreError> {
        self.authenticate(key)?;

        let rows = self
            .db
            .get_messages(user_id)
            .map_err(StoreError::internal("Error retrieving messages"))?;
        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }

    pub fn rename_chat(
        &self,
        user_id: &str,
        chat_uid: &str,
        new_title: &str,
        key: Option<&str>,
    ) -> Result<(), StoreError> {
        self.authenticate(key)?;

        let updated = self
            .db
            .rename_chat(user_id, chat_uid, new_title)
            .map_err(StoreError::internal("Error renaming chat"))?;
        debug!("Renamed {} rows of chat {} for {}", updated, chat_uid, user_id);
        Ok(())
    }
}
