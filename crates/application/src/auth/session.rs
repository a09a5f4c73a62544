//! Primary session holder.
//!
//! Owns the current primary session together with an epoch counter that
//! advances on every change, so work started under one session can tell
//! when it has been superseded.

use std::fmt;
use std::sync::Arc;

use crossportal_domain::PrimarySession;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ports::{SessionStorage, SessionStorageError};

/// The session slot and its epoch.
#[derive(Debug, Default)]
pub struct SessionState {
    session: Option<PrimarySession>,
    epoch: u64,
}

impl SessionState {
    /// The current session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&PrimarySession> {
        self.session.as_ref()
    }

    /// Number of session changes seen so far.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Replaces the session and advances the epoch.
    pub(crate) fn replace(&mut self, session: Option<PrimarySession>) -> Option<PrimarySession> {
        self.epoch = self.epoch.wrapping_add(1);
        std::mem::replace(&mut self.session, session)
    }
}

/// Holds the primary session and mirrors it to an optional store.
pub struct SessionHolder {
    state: RwLock<SessionState>,
    storage: Option<Arc<dyn SessionStorage>>,
}

impl SessionHolder {
    /// Create a holder backed by `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
            storage: Some(storage),
        }
    }

    /// Create a holder that keeps the session in memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
            storage: None,
        }
    }

    /// Loads a persisted session into the holder.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub async fn restore(&self) -> Result<Option<PrimarySession>, SessionStorageError> {
        let Some(storage) = &self.storage else {
            return Ok(None);
        };
        let loaded = storage.load().await?;
        if let Some(session) = &loaded {
            let mut state = self.state.write().await;
            state.replace(Some(session.clone()));
        }
        Ok(loaded)
    }

    /// Current session, cloned.
    pub async fn current(&self) -> Option<PrimarySession> {
        self.state.read().await.session.clone()
    }

    /// Primary credential and the epoch it belongs to.
    pub async fn credential_snapshot(&self) -> Option<(String, u64)> {
        let state = self.state.read().await;
        let credential = state.session.as_ref()?.credential()?.to_string();
        Some((credential, state.epoch))
    }

    /// Writes `session` to the store, if one is attached.
    pub(crate) async fn persist(&self, session: &PrimarySession) -> Result<(), SessionStorageError> {
        match &self.storage {
            Some(storage) => storage.save(session).await,
            None => Ok(()),
        }
    }

    /// Removes the stored session, if a store is attached.
    pub(crate) async fn forget(&self) -> Result<(), SessionStorageError> {
        match &self.storage {
            Some(storage) => storage.clear().await,
            None => Ok(()),
        }
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().await
    }
}

impl fmt::Debug for SessionHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHolder")
            .field("persistent", &self.storage.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use crossportal_domain::UserIdentity;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStorage {
        slot: Mutex<Option<PrimarySession>>,
    }

    #[async_trait]
    impl SessionStorage for MemoryStorage {
        async fn load(&self) -> Result<Option<PrimarySession>, SessionStorageError> {
            Ok(self.slot.lock().expect("Lock poisoned").clone())
        }

        async fn save(&self, session: &PrimarySession) -> Result<(), SessionStorageError> {
            *self.slot.lock().expect("Lock poisoned") = Some(session.clone());
            Ok(())
        }

        async fn clear(&self) -> Result<(), SessionStorageError> {
            *self.slot.lock().expect("Lock poisoned") = None;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_restore_loads_persisted_session() {
        let storage = Arc::new(MemoryStorage::default());
        let session = PrimarySession::new(UserIdentity::new("u1"), "primary", Utc::now());
        storage.save(&session).await.unwrap();

        let holder = SessionHolder::new(storage);
        let restored = holder.restore().await.unwrap();

        assert_eq!(restored, Some(session.clone()));
        assert_eq!(holder.current().await, Some(session));
        assert_eq!(holder.read().await.epoch(), 1);
    }

    #[tokio::test]
    async fn test_restore_empty_store_keeps_epoch() {
        let holder = SessionHolder::new(Arc::new(MemoryStorage::default()));
        assert_eq!(holder.restore().await.unwrap(), None);
        assert_eq!(holder.read().await.epoch(), 0);
    }

    #[tokio::test]
    async fn test_credential_snapshot_tracks_epoch() {
        let holder = SessionHolder::in_memory();
        assert!(holder.credential_snapshot().await.is_none());

        holder.write().await.replace(Some(PrimarySession::new(
            UserIdentity::new("u1"),
            "primary",
            Utc::now(),
        )));
        assert_eq!(
            holder.credential_snapshot().await,
            Some(("primary".to_string(), 1))
        );

        holder.write().await.replace(None);
        assert!(holder.credential_snapshot().await.is_none());
        assert_eq!(holder.read().await.epoch(), 2);
    }
}
