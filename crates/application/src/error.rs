//! Application error types

use crossportal_domain::{DomainError, Portal};
use thiserror::Error;

use crate::ports::{BrowserError, SessionStorageError};

/// Errors surfaced by the cross-portal auth service.
#[derive(Debug, Error)]
pub enum CrossPortalError {
    /// No primary session, or its credential is blank.
    #[error("no primary credential: sign in before switching portals")]
    MissingCredential,

    /// The exchange produced no token, so navigation cannot proceed.
    #[error("could not obtain a token for portal {portal}")]
    ExchangeFailed {
        /// Portal being navigated to.
        portal: Portal,
    },

    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The browser adapter failed.
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),

    /// The session store failed.
    #[error("session storage error: {0}")]
    Session(#[from] SessionStorageError),
}

/// Result type alias for cross-portal operations.
pub type CrossPortalResult<T> = Result<T, CrossPortalError>;
