//! Wall-clock time source.
//!
//! Every portal token expiry and signout timestamp in a running process
//! is taken from this clock.

use chrono::{DateTime, Utc};
use crossportal_application::ports::Clock;

/// Clock reading the host's UTC wall time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates the wall clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crossportal_domain::{CrossPortalMessage, Portal, PortalToken};
    use url::Url;

    #[test]
    fn test_fresh_token_is_valid_against_wall_clock() {
        let clock = SystemClock::new();
        let token = PortalToken::from_exchange(
            Portal::Store,
            "delegated".to_string(),
            60,
            Url::parse("https://store.example.com").unwrap(),
            clock.now(),
        );

        assert!(!token.is_expired_at(clock.now()));
        assert!(token.seconds_remaining(clock.now()) <= 60);
    }

    #[test]
    fn test_signout_timestamp_is_unix_millis() {
        let clock = SystemClock::new();
        let before = clock.now().timestamp_millis();
        let message = CrossPortalMessage::signout(Portal::Gateway, clock.now());
        let after = clock.now().timestamp_millis();

        let CrossPortalMessage::CrossPortalSignout { timestamp, .. } = message;
        assert!((before..=after).contains(&timestamp));
    }
}
