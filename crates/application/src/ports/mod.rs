//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod portal_browser;
mod session_storage;
mod token_exchanger;

pub use clock::Clock;
pub use portal_browser::{BrowserError, PortalBrowser, redact_url};
pub use session_storage::{SessionStorage, SessionStorageError};
pub use token_exchanger::{
    ExchangeError, TokenExchangeRequest, TokenExchangeResponse, TokenExchanger,
};
