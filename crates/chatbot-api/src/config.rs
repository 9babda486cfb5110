use std::fmt;
use std::path::PathBuf;

use anyhow::{Result, bail};

/// Master keys that MUST NOT be used.
const PLACEHOLDER_KEYS: &[&str] = &["change-me", "change-me-to-a-random-string", "dev-secret-change-me"];

/// Process configuration, read once at startup and passed down explicitly.
#[derive(Clone)]
pub struct AppConfig {
    pub master_key: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. `CHATBOT_MASTER_KEY` wins over the
    /// legacy `MASTER_KEY`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let master_key = lookup("CHATBOT_MASTER_KEY")
            .or_else(|| lookup("MASTER_KEY"))
            .unwrap_or_default();
        if master_key.is_empty() || PLACEHOLDER_KEYS.contains(&master_key.as_str()) {
            bail!("CHATBOT_MASTER_KEY is unset or still a placeholder");
        }

        let db_path = lookup("CHATBOT_DB_PATH")
            .unwrap_or_else(|| "chatbot.db".into())
            .into();
        let host = lookup("CHATBOT_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("CHATBOT_PORT") {
            Some(raw) => raw.parse()?,
            None => 8000,
        };

        Ok(Self {
            master_key,
            db_path,
            host,
            port,
        })
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("master_key", &"<redacted>")
            .field("db_path", &self.db_path)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}
