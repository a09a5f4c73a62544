//! Token exchange port
//!
//! Defines the interface to the central auth service that mints
//! portal-scoped tokens from a primary credential.

use async_trait::async_trait;
use crossportal_domain::Portal;
use url::Url;

/// Errors returned by a token exchange call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The auth service answered with a non-success status.
    #[error("exchange rejected with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response could not be decoded.
    #[error("invalid exchange response: {0}")]
    InvalidResponse(String),
}

/// Input for a single exchange call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenExchangeRequest {
    /// Portal the delegated token is scoped to.
    pub portal: Portal,
    /// Callback URL sent to the auth service.
    pub redirect_url: Url,
}

/// Successful exchange response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenExchangeResponse {
    /// The delegated token.
    pub access_token: String,
    /// Lifetime in seconds, counted from receipt.
    pub expires_in: u64,
}

/// Port for minting delegated portal tokens.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Exchanges the primary credential for a portal-scoped token.
    ///
    /// # Arguments
    /// * `primary_token` - The caller's primary bearer credential
    /// * `request` - Target portal and callback URL
    ///
    /// # Errors
    /// Returns an error on network failure, non-2xx status, or an
    /// undecodable body. Implementations must not retry.
    async fn exchange(
        &self,
        primary_token: &str,
        request: &TokenExchangeRequest,
    ) -> Result<TokenExchangeResponse, ExchangeError>;
}
