//! File-based session storage.
//!
//! The primary session is stored as JSON at a single path, by default
//! `<data dir>/crossportal/session.json`. The file holds a live bearer
//! credential and is written with owner-only permissions on Unix.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use crossportal_application::ports::{SessionStorage, SessionStorageError};
use crossportal_domain::PrimarySession;
use tokio::fs;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Session storage backed by one JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    /// Creates storage at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default session file location, if the platform has a data directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("crossportal").join("session.json"))
    }

    /// Path of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self) -> Result<Option<PrimarySession>, SessionStorageError> {
        let content = match fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionStorageError::Io(e)),
        };

        let session = from_json_bytes(&content)
            .map_err(|e| SessionStorageError::Serialization(e.to_string()))?;
        Ok(Some(session))
    }

    async fn save(&self, session: &PrimarySession) -> Result<(), SessionStorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = to_json_stable_bytes(session)
            .map_err(|e| SessionStorageError::Serialization(e.to_string()))?;
        fs::write(&self.path, &content).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600)).await?;
        }

        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStorageError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionStorageError::Io(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crossportal_domain::UserIdentity;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_missing_file_is_none() {
        let dir = tempdir().expect("Failed to create temp directory");
        let storage = FileSessionStorage::new(dir.path().join("session.json"));
        assert!(storage.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let dir = tempdir().expect("Failed to create temp directory");
        let storage = FileSessionStorage::new(dir.path().join("nested").join("session.json"));
        let session = PrimarySession::new(
            UserIdentity::new("u1").with_display_name("Ada"),
            "primary-1",
            Utc::now(),
        );

        storage.save(&session).await.unwrap();
        assert_eq!(storage.load().await.unwrap(), Some(session));

        storage.clear().await.unwrap();
        assert!(storage.load().await.unwrap().is_none());
        // Clearing twice is fine.
        storage.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not json").unwrap();

        let storage = FileSessionStorage::new(path);
        assert!(matches!(
            storage.load().await,
            Err(SessionStorageError::Serialization(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("Failed to create temp directory");
        let storage = FileSessionStorage::new(dir.path().join("session.json"));
        storage
            .save(&PrimarySession::new(UserIdentity::new("u1"), "p", Utc::now()))
            .await
            .unwrap();

        let mode = std::fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
