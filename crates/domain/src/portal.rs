//! Portal identifiers and the directory of portal origins.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// One of the independently deployed front-end applications sharing
/// a single identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Portal {
    /// The main gateway portal.
    Gateway,
    /// The makerspace management portal.
    MakerspaceCave,
    /// The store and checkout portal.
    Store,
}

impl Portal {
    /// Every known portal, in directory order.
    pub const ALL: [Self; 3] = [Self::Gateway, Self::MakerspaceCave, Self::Store];

    /// Wire identifier used in exchange requests and signout messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gateway => "gateway",
            Self::MakerspaceCave => "makerspace-cave",
            Self::Store => "store",
        }
    }

    /// Environment variable overriding this portal's base URL.
    #[must_use]
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::Gateway => "PORTAL_GATEWAY_URL",
            Self::MakerspaceCave => "PORTAL_MAKERSPACE_CAVE_URL",
            Self::Store => "PORTAL_STORE_URL",
        }
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Portal {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownPortal(s.to_string()))
    }
}

/// Fixed map from portal identifier to base origin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalDirectory {
    entries: BTreeMap<Portal, Url>,
}

impl PortalDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds or replaces the base URL for a portal.
    #[must_use]
    pub fn with_portal(mut self, portal: Portal, base_url: Url) -> Self {
        self.insert(portal, base_url);
        self
    }

    /// Adds or replaces the base URL for a portal.
    pub fn insert(&mut self, portal: Portal, base_url: Url) {
        self.entries.insert(portal, base_url);
    }

    /// Returns the base URL for a portal.
    ///
    /// # Errors
    /// Returns `MissingPortalEntry` if the portal has no configured origin.
    pub fn base_url(&self, portal: Portal) -> DomainResult<&Url> {
        self.entries
            .get(&portal)
            .ok_or(DomainError::MissingPortalEntry(portal))
    }

    /// Iterates over configured portals and their origins.
    pub fn iter(&self) -> impl Iterator<Item = (Portal, &Url)> {
        self.entries.iter().map(|(p, u)| (*p, u))
    }

    /// Number of configured portals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no portal is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
