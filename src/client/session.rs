/**
 * Client Session
 *
 * A [`Session`] is the token plus the signed-in user, held explicitly by the
 * client app instead of living in ambient global storage. [`SessionStore`]
 * persists it as JSON so a restart keeps the user signed in.
 *
 * # Lifecycle
 *
 * 1. `load` at startup
 * 2. `refresh` against `/api/auth/me`; a 401 clears the stored session
 * 3. `save` after login or registration
 * 4. `clear` at logout
 */

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::client::api::FeedApi;
use crate::client::error::ClientError;
use crate::shared::UserSummary;

/// Directory under the platform data dir holding client files
const APP_DIR: &str = "feedline";
/// Session file name
const SESSION_FILE: &str = "session.json";

/// Signed-in user as returned by the auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl SessionUser {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Token and user; also the body of the register and login responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

/// JSON file holding the persisted session
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform data directory, if the platform has one
    pub fn default_location() -> Option<Self> {
        dirs::data_dir().map(|dir| Self::new(dir.join(APP_DIR).join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session
    ///
    /// A missing file means no session. An unreadable one is logged and
    /// treated the same way so a corrupt file never blocks startup.
    pub async fn load(&self) -> Result<Option<Session>, ClientError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    /// Persist a session, creating parent directories as needed
    pub async fn save(&self, session: &Session) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Remove the stored session; removing a missing file is not an error
    pub async fn clear(&self) -> Result<(), ClientError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Revalidate a session with the server
    ///
    /// # Returns
    /// The session with fresh user details, or `None` when the server no
    /// longer accepts the token (the stored copy is cleared).
    pub async fn refresh(&self, api: &FeedApi, session: Session) -> Result<Option<Session>, ClientError> {
        match api.me(&session.token).await {
            Ok(user) => {
                let refreshed = Session {
                    token: session.token,
                    user,
                };
                self.save(&refreshed).await?;
                Ok(Some(refreshed))
            }
            Err(e) if e.is_unauthorized() => {
                tracing::info!("Stored session rejected by server, clearing");
                self.clear().await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Session {
        Session {
            token: "jwt".to_string(),
            user: SessionUser {
                id: "u1".to_string(),
                username: "alice".to_string(),
                email: "alice@test.com".to_string(),
                avatar: None,
            },
        }
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("nested").join("session.json"));

        assert_eq!(store.load().await.unwrap(), None);

        store.save(&sample()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(sample()));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_no_session() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("session.json"));
        tokio::fs::write(store.path(), b"{not json").await.unwrap();

        assert_eq!(store.load().await.unwrap(), None);
    }

    #[test]
    fn test_session_parses_auth_response() {
        let body = r#"{"token":"t","user":{"id":"u1","username":"bob","email":"bob@test.com"}}"#;
        let session: Session = serde_json::from_str(body).unwrap();
        assert_eq!(session.user.summary().username, "bob");
    }
}
