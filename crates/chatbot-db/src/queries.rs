use crate::Database;
use crate::models::{MessageRow, UserRow};
use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use rusqlite::Connection;

/// RFC 3339 UTC with microseconds, so lexical order matches time order.
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl Database {
    // -- Users --

    /// Insert a user unless `user_id` is taken.
    /// Returns false, without writing, when the user already exists.
    ///
    /// The existence check and the insert share one transaction, but two
    /// racing registrations can both pass the check; the primary key on
    /// `users.user_id` rejects the loser.
    pub fn create_user(&self, user_id: &str, password_hash: &str) -> Result<bool> {
        self.with_tx(|conn| {
            if query_user(conn, user_id)?.is_some() {
                return Ok(false);
            }

            conn.execute(
                "INSERT INTO users (user_id, password_hash, created_at) VALUES (?1, ?2, ?3)",
                (user_id, password_hash, now_timestamp()),
            )?;
            Ok(true)
        })
    }

    pub fn get_user(&self, user_id: &str) -> Result<Option<UserRow>> {
        self.with_tx(|conn| query_user(conn, user_id))
    }

    // -- Messages --

    pub fn insert_message(
        &self,
        user_id: &str,
        question: &str,
        answer: &str,
        video: &str,
        chat_id: &str,
        chat_uid: &str,
    ) -> Result<()> {
        let now = now_timestamp();
        self.with_tx(|conn| {
            conn.execute(
                "INSERT INTO questions (chat_id, chat_uid, user_id, question, answer, video, created_at, modified_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                rusqlite::params![chat_id, chat_uid, user_id, question, answer, video, now],
            )?;
            Ok(())
        })
    }

    /// Delete every turn of one conversation. Returns the number of rows removed.
    pub fn delete_chat(&self, user_id: &str, chat_uid: &str) -> Result<usize> {
        self.with_tx(|conn| {
            let removed = conn.execute(
                "DELETE FROM questions WHERE chat_uid = ?1 AND user_id = ?2",
                (chat_uid, user_id),
            )?;
            Ok(removed)
        })
    }

    /// All turns for a user, oldest first.
    pub fn get_messages(&self, user_id: &str) -> Result<Vec<MessageRow>> {
        self.with_tx(|conn| query_messages(conn, user_id))
    }

    /// Retitle every turn of one conversation. Returns the number of rows updated.
    pub fn rename_chat(&self, user_id: &str, chat_uid: &str, title: &str) -> Result<usize> {
        let now = now_timestamp();
        self.with_tx(|conn| {
            let updated = conn.execute(
                "UPDATE questions SET chat_id = ?1, modified_at = ?2 WHERE user_id = ?3 AND chat_uid = ?4",
                (title, &now, user_id, chat_uid),
            )?;
            Ok(updated)
        })
    }
}

fn query_user(conn: &Connection, user_id: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT user_id, password_hash, created_at FROM users WHERE user_id = ?1")?;

    let row = stmt
        .query_row([user_id], |row| {
            Ok(UserRow {
                user_id: row.get(0)?,
                password_hash: row.get(1)?,
                created_at: row.get(2)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_messages(conn: &Connection, user_id: &str) -> Result<Vec<MessageRow>> {
    // id breaks ties between turns written within the same microsecond
    let mut stmt = conn.prepare(
        "SELECT id, chat_id, chat_uid, user_id, question, answer, video, created_at, modified_at
         FROM questions
         WHERE user_id = ?1
         ORDER BY created_at, id",
    )?;

    let rows = stmt
        .query_map([user_id], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                chat_id: row.get(1)?,
                chat_uid: row.get(2)?,
                user_id: row.get(3)?,
                question: row.get(4)?,
                answer: row.get(5)?,
                video: row.get(6)?,
                created_at: row.get(7)?,
                modified_at: row.get(8)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_with_user(user_id: &str) -> Database {
        let db = Database::open_in_memory().unwrap();
        assert!(db.create_user(user_id, "hash").unwrap());
        db
    }

    #[test]
    fn create_user_refuses_duplicates() {
        let db = db_with_user("alice");
        assert!(!db.create_user("alice", "other").unwrap());

        let user = db.get_user("alice").unwrap().unwrap();
        assert_eq!(user.password_hash, "hash");
        assert!(!user.created_at.is_empty());
        assert!(db.get_user("bob").unwrap().is_none());
    }

    #[test]
    fn primary_key_backs_up_the_existence_check() {
        let db = db_with_user("alice");
        let raw_insert = db.with_tx(|conn| {
            conn.execute(
                "INSERT INTO users (user_id, password_hash, created_at) VALUES ('alice', 'x', 'now')",
                [],
            )?;
            Ok(())
        });
        assert!(raw_insert.is_err());
    }

    #[test]
    fn messages_come_back_oldest_first() {
        let db = db_with_user("alice");
        db.insert_message("alice", "q1", "a1", "", "Budget", "c1").unwrap();
        db.insert_message("alice", "q2", "a2", "v.mp4", "Budget", "c1").unwrap();
        db.insert_message("alice", "q3", "a3", "", "Savings", "c2").unwrap();

        let rows = db.get_messages("alice").unwrap();
        let questions: Vec<_> = rows.iter().map(|r| r.question.as_str()).collect();
        assert_eq!(questions, vec!["q1", "q2", "q3"]);
        assert_eq!(rows[0].created_at, rows[0].modified_at);
        assert_eq!(rows[1].video, "v.mp4");
    }

    #[test]
    fn message_for_unknown_user_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.insert_message("ghost", "q", "a", "", "t", "c").is_err());
    }

    #[test]
    fn delete_and_rename_are_scoped_to_one_conversation() {
        let db = db_with_user("alice");
        assert!(db.create_user("bob", "hash").unwrap());
        db.insert_message("alice", "q1", "a1", "", "Old", "c1").unwrap();
        db.insert_message("alice", "q2", "a2", "", "Old", "c1").unwrap();
        db.insert_message("alice", "q3", "a3", "", "Other", "c2").unwrap();
        db.insert_message("bob", "q4", "a4", "", "Old", "c1").unwrap();

        assert_eq!(db.rename_chat("alice", "c1", "New").unwrap(), 2);
        let titles: Vec<_> = db
            .get_messages("alice")
            .unwrap()
            .into_iter()
            .map(|r| r.chat_id)
            .collect();
        assert_eq!(titles, vec!["New", "New", "Other"]);
        assert_eq!(db.get_messages("bob").unwrap()[0].chat_id, "Old");

        assert_eq!(db.delete_chat("alice", "c1").unwrap(), 2);
        assert_eq!(db.delete_chat("alice", "c1").unwrap(), 0);
        assert_eq!(db.get_messages("alice").unwrap().len(), 1);
        assert_eq!(db.get_messages("bob").unwrap().len(), 1);
    }

    #[test]
    fn failed_closure_rolls_back() {
        let db = db_with_user("alice");
        let result: Result<()> = db.with_tx(|conn| {
            conn.execute("DELETE FROM users WHERE user_id = 'alice'", [])?;
            anyhow::bail!("abort")
        });
        assert!(result.is_err());
        assert!(db.get_user("alice").unwrap().is_some());
    }
}
