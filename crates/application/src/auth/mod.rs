//! Cross-portal authentication.
//!
//! This module provides:
//! - In-memory portal token cache with expiry tracking
//! - The primary session holder
//! - The cross-portal auth service (exchange, navigation, signout)
//! - Background expiry sweep and signout listener tasks

mod cross_portal;
mod session;
mod tasks;
mod token_cache;

pub use cross_portal::{CrossPortalAuth, CrossPortalOptions};
pub use session::{SessionHolder, SessionState};
pub use tasks::{DEFAULT_SWEEP_INTERVAL, listen_for_signouts, spawn_expiry_sweep};
pub use token_cache::PortalTokenCache;
