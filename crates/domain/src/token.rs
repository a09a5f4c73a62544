//! Delegated portal tokens with expiry tracking.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::portal::Portal;

/// A short-lived, portal-scoped credential minted from the primary session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalToken {
    /// Portal this token authenticates against.
    pub portal: Portal,
    /// The delegated token string.
    pub access_token: String,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Origin of the target portal.
    pub base_url: Url,
}

impl PortalToken {
    /// Builds a token from an exchange response received at `now`.
    #[must_use]
    pub fn from_exchange(
        portal: Portal,
        access_token: String,
        expires_in_secs: u64,
        base_url: Url,
        now: DateTime<Utc>,
    ) -> Self {
        let lifetime = i64::try_from(expires_in_secs).unwrap_or(i64::MAX);
        let expires_at = Duration::try_seconds(lifetime)
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            portal,
            access_token,
            expires_at,
            base_url,
        }
    }

    /// A token is expired once `now` is strictly past its expiry.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Seconds left before expiry, clamped at zero.
    #[must_use]
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }

    /// Shortened form of the delegated token, safe for logs.
    #[must_use]
    pub fn preview(&self) -> String {
        token_preview(&self.access_token)
    }
}

impl fmt::Debug for PortalToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalToken")
            .field("portal", &self.portal)
            .field("access_token", &self.preview())
            .field("expires_at", &self.expires_at)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

/// Get a preview of a token: at most 8 chars and never more than half
/// of it, followed by `...`.
#[must_use]
pub fn token_preview(token: &str) -> String {
    let shown = (token.chars().count() / 2).min(8);
    let head: String = token.chars().take(shown).collect();
    format!("{head}...")
}

/// Status of a portal's cached token for UI display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalTokenStatus {
    /// No token is cached for this portal.
    NotAuthenticated,
    /// Token is cached and unexpired.
    Valid {
        /// Seconds until expiry.
        seconds_remaining: i64,
    },
    /// Token is cached but past its expiry; the next navigation re-exchanges.
    Expired,
}

impl PortalTokenStatus {
    /// Derives the status of an optional cached token at `now`.
    #[must_use]
    pub fn of(token: Option<&PortalToken>, now: DateTime<Utc>) -> Self {
        match token {
            None => Self::NotAuthenticated,
            Some(t) if t.is_expired_at(now) => Self::Expired,
            Some(t) => Self::Valid {
                seconds_remaining: t.seconds_remaining(now),
            },
        }
    }

    /// Returns true if the token can be used for navigation.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Get a user-friendly display message.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::NotAuthenticated => "Not authenticated".to_string(),
            Self::Valid { seconds_remaining } => {
                if *seconds_remaining > 3600 {
                    format!("Valid for {} hours", seconds_remaining / 3600)
                } else if *seconds_remaining > 60 {
                    format!("Valid for {} minutes", seconds_remaining / 60)
                } else {
                    format!("Valid for {seconds_remaining} seconds")
                }
            }
            Self::Expired => "Expired (re-exchanged on next use)".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn token(expires_in: u64) -> PortalToken {
        PortalToken::from_exchange(
            Portal::Store,
            "t1".to_string(),
            expires_in,
            Url::parse("https://store.example.com").unwrap(),
            issued_at(),
        )
    }

    #[test]
    fn test_expiry_is_issue_time_plus_lifetime() {
        let t = token(60);
        assert_eq!(t.expires_at, issued_at() + Duration::seconds(60));
    }

    #[test]
    fn test_expired_only_strictly_after_expiry() {
        let t = token(60);
        assert!(!t.is_expired_at(issued_at() + Duration::seconds(30)));
        assert!(!t.is_expired_at(t.expires_at));
        assert!(t.is_expired_at(t.expires_at + Duration::milliseconds(1)));
        assert!(t.is_expired_at(issued_at() + Duration::seconds(61)));
    }

    #[test]
    fn test_huge_lifetime_saturates() {
        let t = token(u64::MAX);
        assert!(!t.is_expired_at(issued_at() + Duration::days(365 * 100)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut t = token(60);
        t.access_token = "abcdefghijklmnopqrstuvwxyz".to_string();
        let rendered = format!("{t:?}");
        assert!(rendered.contains("abcdefgh..."));
        assert!(!rendered.contains("qrstuvwxyz"));
    }

    #[test]
    fn test_token_preview() {
        assert_eq!(token_preview("abcdefghijklmnop"), "abcdefgh...");
        assert_eq!(token_preview("short"), "sh...");
        assert_eq!(token_preview("primary"), "pri...");
        assert_eq!(token_preview("x"), "...");
        assert_eq!(token_preview(""), "...");
    }

    #[test]
    fn test_status_of_token() {
        let t = token(7200);
        assert_eq!(
            PortalTokenStatus::of(None, issued_at()),
            PortalTokenStatus::NotAuthenticated
        );
        let status = PortalTokenStatus::of(Some(&t), issued_at());
        assert!(status.is_valid());
        assert!(status.display_message().contains("hours"));

        let status = PortalTokenStatus::of(Some(&t), issued_at() + Duration::hours(3));
        assert_eq!(status, PortalTokenStatus::Expired);
        assert!(!status.is_valid());
    }
}
