//! Session storage port
//!
//! Defines where the primary session survives between restarts.

use async_trait::async_trait;
use crossportal_domain::PrimarySession;

/// Errors that can occur during session storage operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionStorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Repository trait for primary session persistence.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Loads the stored session.
    ///
    /// # Returns
    /// `None` if nothing is stored.
    async fn load(&self) -> Result<Option<PrimarySession>, SessionStorageError>;

    /// Stores the session, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error if the session cannot be written.
    async fn save(&self, session: &PrimarySession) -> Result<(), SessionStorageError>;

    /// Removes the stored session. Clearing an empty store succeeds.
    ///
    /// # Errors
    /// Returns an error if the stored session cannot be removed.
    async fn clear(&self) -> Result<(), SessionStorageError>;
}
