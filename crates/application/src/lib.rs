//! Crossportal Application - Services and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - The cross-portal auth service and its background tasks
//! - Application-level error handling

pub mod auth;
pub mod error;
pub mod ports;

pub use auth::{
    CrossPortalAuth, CrossPortalOptions, DEFAULT_SWEEP_INTERVAL, PortalTokenCache, SessionHolder,
    listen_for_signouts, spawn_expiry_sweep,
};
pub use error::{CrossPortalError, CrossPortalResult};
pub use ports::{
    BrowserError, Clock, ExchangeError, PortalBrowser, SessionStorage, SessionStorageError,
    TokenExchangeRequest, TokenExchangeResponse, TokenExchanger,
};
