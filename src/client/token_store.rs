use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::permission::User;

/// Credential persisted between console invocations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub server: String,
    pub token: String,
    pub user: Option<User>,
    pub saved_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(server: impl Into<String>, token: impl Into<String>, user: Option<User>) -> Self {
        Self {
            server: server.into(),
            token: token.into(),
            user,
            saved_at: Utc::now(),
        }
    }
}

/// File-backed token storage under the console's config directory
#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    const SESSION_FILE: &'static str = "session.json";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `PORTAL_CONFIG_DIR`, else `~/.config/portal-admin`
    pub fn from_env() -> anyhow::Result<Self> {
        let dir = if let Ok(custom_dir) = std::env::var("PORTAL_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
            PathBuf::from(home).join(".config").join("portal-admin")
        };
        Ok(Self::new(dir))
    }

    fn session_file(&self) -> PathBuf {
        self.dir.join(Self::SESSION_FILE)
    }

    pub fn load(&self) -> anyhow::Result<Option<StoredSession>> {
        let file = self.session_file();
        if !file.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(file)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save(&self, session: &StoredSession) -> anyhow::Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(self.session_file(), content)?;
        Ok(())
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        let file = self.session_file();
        if file.exists() {
            fs::remove_file(file)?;
        }
        Ok(())
    }
}
