//! Token exchange client using reqwest.
//!
//! Calls `POST {auth_service}/auth/token/exchange` with the primary
//! credential as a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use crossportal_application::ports::{
    ExchangeError, TokenExchangeRequest, TokenExchangeResponse, TokenExchanger,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

/// Path of the exchange endpoint relative to the auth service root.
pub const EXCHANGE_PATH: &str = "auth/token/exchange";

/// Request timeout for a single exchange.
const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(15);

/// Exchange request body.
#[derive(Debug, Serialize)]
struct ExchangeBody<'a> {
    portal: &'a str,
    redirect_url: &'a str,
}

/// Exchange response body.
#[derive(Debug, Deserialize)]
struct ExchangeResponseBody {
    access_token: String,
    expires_in: u64,
}

/// Token exchanger backed by the central auth service.
#[derive(Debug, Clone)]
pub struct ReqwestTokenExchanger {
    client: Client,
    endpoint: Url,
}

impl ReqwestTokenExchanger {
    /// Creates an exchanger for the auth service at `auth_service_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created or the endpoint
    /// URL cannot be derived.
    pub fn new(auth_service_url: &Url) -> Result<Self, ExchangeError> {
        let client = Client::builder()
            .user_agent(concat!("Crossportal/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
            .timeout(EXCHANGE_TIMEOUT)
            .build()
            .map_err(|e| ExchangeError::Network(e.to_string()))?;

        Self::with_client(client, auth_service_url)
    }

    /// Creates an exchanger with a custom reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL cannot be derived.
    pub fn with_client(client: Client, auth_service_url: &Url) -> Result<Self, ExchangeError> {
        Ok(Self {
            client,
            endpoint: exchange_endpoint(auth_service_url)?,
        })
    }

    /// The full exchange endpoint URL.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Maps reqwest errors to `ExchangeError`.
    fn map_error(error: &reqwest::Error) -> ExchangeError {
        if error.is_timeout() {
            return ExchangeError::Network(format!(
                "timed out after {}s",
                EXCHANGE_TIMEOUT.as_secs()
            ));
        }
        if error.is_decode() {
            return ExchangeError::InvalidResponse(error.to_string());
        }
        ExchangeError::Network(error.to_string())
    }
}

/// Joins the exchange path onto the auth service root, keeping any
/// path prefix the service is mounted under.
fn exchange_endpoint(auth_service_url: &Url) -> Result<Url, ExchangeError> {
    let mut base = auth_service_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(EXCHANGE_PATH)
        .map_err(|e| ExchangeError::Network(format!("invalid auth service URL: {e}")))
}

#[async_trait]
impl TokenExchanger for ReqwestTokenExchanger {
    async fn exchange(
        &self,
        primary_token: &str,
        request: &TokenExchangeRequest,
    ) -> Result<TokenExchangeResponse, ExchangeError> {
        let body = ExchangeBody {
            portal: request.portal.as_str(),
            redirect_url: request.redirect_url.as_str(),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(primary_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::map_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExchangeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ExchangeResponseBody = response
            .json()
            .await
            .map_err(|e| ExchangeError::InvalidResponse(e.to_string()))?;

        if parsed.access_token.is_empty() {
            return Err(ExchangeError::InvalidResponse(
                "empty access_token".to_string(),
            ));
        }

        Ok(TokenExchangeResponse {
            access_token: parsed.access_token,
            expires_in: parsed.expires_in,
        })
    }
}
