//! Domain error types

use thiserror::Error;

use crate::portal::Portal;

/// Domain-level errors that can occur during validation or URL construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The portal identifier is not one of the known portals.
    #[error("unknown portal: {0}")]
    UnknownPortal(String),

    /// The portal directory has no base URL for this portal.
    #[error("no base URL configured for portal {0}")]
    MissingPortalEntry(Portal),

    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The navigation path cannot be joined onto a portal origin.
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
