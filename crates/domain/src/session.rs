//! Primary session types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::token::token_preview;

/// Identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Identity-provider user id.
    pub id: String,
    /// Email address, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl UserIdentity {
    /// Creates an identity with only a user id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            display_name: None,
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// The main authenticated identity and credential all portal tokens derive from.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimarySession {
    /// Unique id of this session (UUID v7).
    pub session_id: Uuid,
    /// The signed-in user.
    pub user: UserIdentity,
    /// Primary bearer credential.
    pub access_token: String,
    /// When the session was established.
    pub established_at: DateTime<Utc>,
}

impl PrimarySession {
    /// Creates a new session established at `now`.
    #[must_use]
    pub fn new(user: UserIdentity, access_token: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            session_id: Uuid::now_v7(),
            user,
            access_token: access_token.into(),
            established_at: now,
        }
    }

    /// Returns the primary credential if it is non-blank.
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        let token = self.access_token.trim();
        (!token.is_empty()).then_some(token)
    }
}

impl fmt::Debug for PrimarySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimarySession")
            .field("session_id", &self.session_id)
            .field("user", &self.user)
            .field("access_token", &token_preview(&self.access_token))
            .field("established_at", &self.established_at)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blank_credential_is_absent() {
        let session = PrimarySession::new(UserIdentity::new("u1"), "   ", Utc::now());
        assert_eq!(session.credential(), None);

        let session = PrimarySession::new(UserIdentity::new("u1"), "primary-1", Utc::now());
        assert_eq!(session.credential(), Some("primary-1"));
    }

    #[test]
    fn test_session_json_shape() {
        let user = UserIdentity::new("u1").with_email("ada@example.com");
        let session = PrimarySession::new(user, "primary-1", Utc::now());
        let json = serde_json::to_value(&session).unwrap();

        assert_eq!(json["user"]["id"], "u1");
        assert_eq!(json["user"]["email"], "ada@example.com");
        assert!(json["user"].get("display_name").is_none());

        let back: PrimarySession = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_debug_masks_short_credential() {
        let session = PrimarySession::new(UserIdentity::new("u1"), "pw-42", Utc::now());
        let rendered = format!("{session:?}");
        assert!(rendered.contains("pw..."));
        assert!(!rendered.contains("pw-42"));
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        let a = PrimarySession::new(UserIdentity::new("u1"), "t", Utc::now());
        let b = PrimarySession::new(UserIdentity::new("u1"), "t", Utc::now());
        assert_ne!(a.session_id, b.session_id);
    }
}
