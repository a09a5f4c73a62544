//! Messages exchanged between browsing contexts running the same provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::portal::Portal;

/// Cross-context message, tagged by its `type` discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrossPortalMessage {
    /// A context signed out; listeners clear their local session state.
    CrossPortalSignout {
        /// Portal that initiated the signout.
        portal: Portal,
        /// Unix timestamp in milliseconds.
        timestamp: i64,
        /// Instance that posted the message. Process-local; never on the
        /// wire, so messages parsed from JSON carry `None`.
        #[serde(skip)]
        origin: Option<Uuid>,
    },
}

impl CrossPortalMessage {
    /// Builds a signout message stamped at `now`.
    #[must_use]
    pub fn signout(portal: Portal, now: DateTime<Utc>) -> Self {
        Self::CrossPortalSignout {
            portal,
            timestamp: now.timestamp_millis(),
            origin: None,
        }
    }

    /// Stamps the message with the instance that posts it.
    #[must_use]
    pub fn with_origin(self, id: Uuid) -> Self {
        match self {
            Self::CrossPortalSignout {
                portal, timestamp, ..
            } => Self::CrossPortalSignout {
                portal,
                timestamp,
                origin: Some(id),
            },
        }
    }

    /// Instance that posted the message, if known.
    #[must_use]
    pub const fn origin(&self) -> Option<Uuid> {
        match self {
            Self::CrossPortalSignout { origin, .. } => *origin,
        }
    }

    /// Portal the message originated from.
    #[must_use]
    pub const fn portal(&self) -> Portal {
        match self {
            Self::CrossPortalSignout { portal, .. } => *portal,
        }
    }
}
