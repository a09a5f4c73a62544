//! Crossportal Domain - Core types
//!
//! This crate defines the domain model for cross-portal authentication:
//! portals, delegated tokens, the primary session and the signout message.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod message;
pub mod navigation;
pub mod portal;
pub mod session;
pub mod token;

pub use error::{DomainError, DomainResult};
pub use message::CrossPortalMessage;
pub use navigation::{AUTH_TOKEN_PARAM, PORTAL_AUTH_PARAM, build_portal_url};
pub use portal::{Portal, PortalDirectory};
pub use session::{PrimarySession, UserIdentity};
pub use token::{PortalToken, PortalTokenStatus, token_preview};
