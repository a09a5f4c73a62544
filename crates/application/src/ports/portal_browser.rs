//! Browser port
//!
//! Abstracts the two browser primitives the cross-portal flow needs:
//! opening a new browsing context and notifying related contexts.

use async_trait::async_trait;
use crossportal_domain::CrossPortalMessage;
use url::Url;

/// Errors raised by browser adapters.
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    /// The new browsing context could not be opened.
    #[error("failed to open {url}: {message}")]
    Launch {
        /// URL that was being opened, with the token redacted.
        url: String,
        /// Error description.
        message: String,
    },

    /// The signout message could not be posted.
    #[error("failed to broadcast signout: {0}")]
    Broadcast(String),
}

/// Port for browser-specific primitives.
#[async_trait]
pub trait PortalBrowser: Send + Sync {
    /// Opens a new browsing context at `url`.
    ///
    /// # Errors
    /// Returns `BrowserError::Launch` if the context cannot be opened.
    async fn open_remote_session(&self, url: &Url) -> Result<(), BrowserError>;

    /// Posts a message to every related browsing context.
    ///
    /// Delivery is best effort; having no listeners is not an error.
    ///
    /// # Errors
    /// Returns `BrowserError::Broadcast` if the message cannot be posted at all.
    async fn broadcast_local_signout(&self, message: &CrossPortalMessage)
    -> Result<(), BrowserError>;
}

/// Renders a navigation URL for logs and errors with the token hidden.
#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if k == crossportal_domain::AUTH_TOKEN_PARAM {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();
    if pairs.is_empty() {
        return redacted.to_string();
    }
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_redact_url_hides_token_only() {
        let url = Url::parse("https://store.example.com/cart?auth_token=secret&portal_auth=true")
            .unwrap();
        assert_eq!(
            redact_url(&url),
            "https://store.example.com/cart?auth_token=***&portal_auth=true"
        );
    }

    #[test]
    fn test_redact_url_without_query() {
        let url = Url::parse("https://store.example.com/").unwrap();
        assert_eq!(redact_url(&url), "https://store.example.com/");
    }
}
