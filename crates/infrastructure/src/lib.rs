//! Crossportal Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus environment configuration.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod serialization;

pub use adapters::{
    EXCHANGE_PATH, Launcher, ReqwestTokenExchanger, SignoutChannel, SystemBrowser, SystemClock,
};
pub use config::{ConfigError, PortalConfig};
pub use persistence::FileSessionStorage;
pub use serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};
