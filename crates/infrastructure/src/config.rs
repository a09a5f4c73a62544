//! Environment configuration.
//!
//! Every value has a local-development default and can be overridden by
//! one environment variable.

use std::path::PathBuf;
use std::time::Duration;

use crossportal_application::{CrossPortalOptions, DEFAULT_SWEEP_INTERVAL};
use crossportal_domain::{Portal, PortalDirectory};
use url::Url;

use crate::persistence::FileSessionStorage;

/// Auth service base URL.
pub const AUTH_SERVICE_URL_VAR: &str = "PORTAL_AUTH_SERVICE_URL";
/// Seconds between expiry sweeps.
pub const SWEEP_INTERVAL_VAR: &str = "PORTAL_SWEEP_INTERVAL_SECS";
/// Portal this process acts as.
pub const CURRENT_PORTAL_VAR: &str = "PORTAL_CURRENT";
/// Location of the session file.
pub const SESSION_FILE_VAR: &str = "PORTAL_SESSION_FILE";

const DEFAULT_AUTH_SERVICE_URL: &str = "http://localhost:8000";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A URL variable does not parse.
    #[error("{var} is not a valid URL: {value}")]
    InvalidUrl {
        /// Variable name.
        var: String,
        /// Offending value.
        value: String,
    },

    /// A numeric variable does not parse.
    #[error("{var} is not a valid number: {value}")]
    InvalidNumber {
        /// Variable name.
        var: String,
        /// Offending value.
        value: String,
    },

    /// The current portal is not a known portal.
    #[error("PORTAL_CURRENT names an unknown portal: {0}")]
    InvalidPortal(String),

    /// No session file location could be determined.
    #[error("no data directory available; set PORTAL_SESSION_FILE")]
    NoSessionPath,
}

/// Runtime configuration for the cross-portal flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Base URL of the central auth service.
    pub auth_service_url: Url,
    /// Base URL of every portal.
    pub directory: PortalDirectory,
    /// Portal this process acts as.
    pub current_portal: Portal,
    /// Spacing between expiry sweeps.
    pub sweep_interval: Duration,
    /// Where the primary session is persisted.
    pub session_file: PathBuf,
}

impl PortalConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error if any variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value. Unset and blank variables fall back to defaults.
    ///
    /// # Errors
    /// Returns an error if any variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let auth_service_url = parse_url(
            AUTH_SERVICE_URL_VAR,
            get(AUTH_SERVICE_URL_VAR).as_deref(),
            DEFAULT_AUTH_SERVICE_URL,
        )?;

        let mut directory = PortalDirectory::new();
        for portal in Portal::ALL {
            let url = parse_url(
                portal.env_var(),
                get(portal.env_var()).as_deref(),
                default_portal_url(portal),
            )?;
            directory.insert(portal, url);
        }

        let current_portal = match get(CURRENT_PORTAL_VAR) {
            Some(value) => value
                .parse::<Portal>()
                .map_err(|_| ConfigError::InvalidPortal(value))?,
            None => Portal::Gateway,
        };

        let sweep_interval = match get(SWEEP_INTERVAL_VAR) {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: SWEEP_INTERVAL_VAR.to_string(),
                        value,
                    });
                }
            },
            None => DEFAULT_SWEEP_INTERVAL,
        };

        let session_file = match get(SESSION_FILE_VAR) {
            Some(path) => PathBuf::from(path),
            None => FileSessionStorage::default_path().ok_or(ConfigError::NoSessionPath)?,
        };

        Ok(Self {
            auth_service_url,
            directory,
            current_portal,
            sweep_interval,
            session_file,
        })
    }

    /// Options for constructing a `CrossPortalAuth`.
    #[must_use]
    pub fn auth_options(&self) -> CrossPortalOptions {
        CrossPortalOptions {
            directory: self.directory.clone(),
            current_portal: self.current_portal,
        }
    }
}

const fn default_portal_url(portal: Portal) -> &'static str {
    match portal {
        Portal::Gateway => "http://localhost:3000",
        Portal::MakerspaceCave => "http://localhost:3001",
        Portal::Store => "http://localhost:3002",
    }
}

fn parse_url(var: &str, value: Option<&str>, default: &str) -> Result<Url, ConfigError> {
    let raw = value.unwrap_or(default);
    let url = Url::parse(raw).map_err(|_| ConfigError::InvalidUrl {
        var: var.to_string(),
        value: raw.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            var: var.to_string(),
            value: raw.to_string(),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            PortalConfig::from_lookup(lookup(&[(SESSION_FILE_VAR, "/tmp/session.json")])).unwrap();

        assert_eq!(config.auth_service_url.as_str(), "http://localhost:8000/");
        assert_eq!(
            config.directory.base_url(Portal::MakerspaceCave).unwrap().as_str(),
            "http://localhost:3001/"
        );
        assert_eq!(config.directory.len(), 3);
        assert_eq!(config.current_portal, Portal::Gateway);
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
        assert_eq!(config.session_file, PathBuf::from("/tmp/session.json"));
    }

    #[test]
    fn test_overrides() {
        let config = PortalConfig::from_lookup(lookup(&[
            (AUTH_SERVICE_URL_VAR, "https://auth.example.com"),
            ("PORTAL_STORE_URL", "https://store.example.com"),
            (CURRENT_PORTAL_VAR, "makerspace-cave"),
            (SWEEP_INTERVAL_VAR, "15"),
            (SESSION_FILE_VAR, "/tmp/s.json"),
        ]))
        .unwrap();

        assert_eq!(config.auth_service_url.as_str(), "https://auth.example.com/");
        assert_eq!(
            config.directory.base_url(Portal::Store).unwrap().as_str(),
            "https://store.example.com/"
        );
        assert_eq!(config.current_portal, Portal::MakerspaceCave);
        assert_eq!(config.sweep_interval, Duration::from_secs(15));
        assert_eq!(config.auth_options().current_portal, Portal::MakerspaceCave);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = PortalConfig::from_lookup(lookup(&[
            ("PORTAL_GATEWAY_URL", "   "),
            (SESSION_FILE_VAR, "/tmp/s.json"),
        ]))
        .unwrap();
        assert_eq!(
            config.directory.base_url(Portal::Gateway).unwrap().as_str(),
            "http://localhost:3000/"
        );
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            PortalConfig::from_lookup(lookup(&[("PORTAL_GATEWAY_URL", "not a url")])),
            Err(ConfigError::InvalidUrl {
                var: "PORTAL_GATEWAY_URL".to_string(),
                value: "not a url".to_string(),
            })
        );
        assert!(matches!(
            PortalConfig::from_lookup(lookup(&[(AUTH_SERVICE_URL_VAR, "mailto:a@b.c")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            PortalConfig::from_lookup(lookup(&[(SWEEP_INTERVAL_VAR, "0")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert_eq!(
            PortalConfig::from_lookup(lookup(&[(CURRENT_PORTAL_VAR, "admin")])),
            Err(ConfigError::InvalidPortal("admin".to_string()))
        );
    }
}
