//! In-memory portal token cache with expiry tracking.
//!
//! Holds at most one delegated token per portal. Expiry is judged against
//! a caller-supplied `now` so the cache itself never reads the clock.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use crossportal_domain::{Portal, PortalToken, PortalTokenStatus};
use tokio::sync::RwLock;

/// Thread-safe in-memory token cache keyed by portal.
#[derive(Debug, Clone, Default)]
pub struct PortalTokenCache {
    tokens: Arc<RwLock<HashMap<Portal, PortalToken>>>,
}

impl PortalTokenCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a token under its portal, replacing any earlier one.
    pub async fn store(&self, token: PortalToken) -> Option<PortalToken> {
        let mut tokens = self.tokens.write().await;
        tokens.insert(token.portal, token)
    }

    /// Get a token by portal regardless of expiry.
    pub async fn get(&self, portal: Portal) -> Option<PortalToken> {
        let tokens = self.tokens.read().await;
        tokens.get(&portal).cloned()
    }

    /// Get an unexpired token, or None if expired/missing.
    pub async fn get_valid(&self, portal: Portal, now: DateTime<Utc>) -> Option<PortalToken> {
        let tokens = self.tokens.read().await;
        tokens
            .get(&portal)
            .filter(|t| !t.is_expired_at(now))
            .cloned()
    }

    /// Remove a token.
    pub async fn remove(&self, portal: Portal) -> Option<PortalToken> {
        let mut tokens = self.tokens.write().await;
        tokens.remove(&portal)
    }

    /// Clear all tokens, returning how many were dropped.
    pub async fn clear(&self) -> usize {
        let mut tokens = self.tokens.write().await;
        let dropped = tokens.len();
        tokens.clear();
        dropped
    }

    /// Remove every token with `now > expires_at`.
    ///
    /// Returns the portals that were evicted.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Vec<Portal> {
        let mut tokens = self.tokens.write().await;
        let expired: Vec<Portal> = tokens
            .values()
            .filter(|t| t.is_expired_at(now))
            .map(|t| t.portal)
            .collect();
        for portal in &expired {
            tokens.remove(portal);
        }
        expired
    }

    /// Get all cached portals.
    pub async fn portals(&self) -> Vec<Portal> {
        let tokens = self.tokens.read().await;
        let mut portals: Vec<Portal> = tokens.keys().copied().collect();
        portals.sort();
        portals
    }

    /// Get token status for UI display.
    pub async fn status(&self, portal: Portal, now: DateTime<Utc>) -> PortalTokenStatus {
        let tokens = self.tokens.read().await;
        PortalTokenStatus::of(tokens.get(&portal), now)
    }

    /// Get count of cached tokens.
    pub async fn count(&self) -> usize {
        let tokens = self.tokens.read().await;
        tokens.len()
    }
}
