use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            user_id         TEXT PRIMARY KEY,
            password_hash   TEXT NOT NULL,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS questions (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            chat_id         TEXT NOT NULL,
            chat_uid        TEXT NOT NULL,
            user_id         TEXT NOT NULL REFERENCES users(user_id),
            question        TEXT NOT NULL,
            answer          TEXT NOT NULL,
            video           TEXT NOT NULL DEFAULT '',
            created_at      TEXT NOT NULL,
            modified_at     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_questions_user
            ON questions(user_id, created_at);

        CREATE INDEX IF NOT EXISTS idx_questions_chat
            ON questions(user_id, chat_uid);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
