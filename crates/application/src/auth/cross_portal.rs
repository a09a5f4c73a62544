//! Cross-portal authentication service.
//!
//! Exchanges the primary credential for portal-scoped tokens, opens
//! portals with those tokens, and keeps every context's cache in step
//! with the primary session.
//!
//! Tokens are refreshed lazily: an expired token is re-exchanged the next
//! time it is needed and never refreshed in the background.

use std::sync::Arc;

use crossportal_domain::{
    CrossPortalMessage, Portal, PortalDirectory, PortalToken, PortalTokenStatus, PrimarySession,
    build_portal_url,
};
use tracing::{debug, info, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::auth::{PortalTokenCache, SessionHolder};
use crate::error::{CrossPortalError, CrossPortalResult};
use crate::ports::{Clock, PortalBrowser, TokenExchangeRequest, TokenExchanger, redact_url};

/// Static wiring for a `CrossPortalAuth` instance.
#[derive(Debug, Clone)]
pub struct CrossPortalOptions {
    /// Base URL of every reachable portal.
    pub directory: PortalDirectory,
    /// Portal this instance runs inside; stamped on outgoing signouts.
    pub current_portal: Portal,
}

/// Cross-portal authentication provider.
///
/// One instance corresponds to one browsing context. Contexts share
/// nothing but the signout channel behind `B`.
pub struct CrossPortalAuth<E, B> {
    instance_id: Uuid,
    exchanger: E,
    browser: B,
    clock: Arc<dyn Clock>,
    session: SessionHolder,
    cache: PortalTokenCache,
    options: CrossPortalOptions,
}

impl<E: TokenExchanger, B: PortalBrowser> CrossPortalAuth<E, B> {
    /// Creates a new provider with an empty cache.
    pub fn new(
        exchanger: E,
        browser: B,
        clock: Arc<dyn Clock>,
        session: SessionHolder,
        options: CrossPortalOptions,
    ) -> Self {
        Self {
            instance_id: Uuid::now_v7(),
            exchanger,
            browser,
            clock,
            session,
            cache: PortalTokenCache::new(),
            options,
        }
    }

    /// Access to the token cache.
    #[must_use]
    pub const fn cache(&self) -> &PortalTokenCache {
        &self.cache
    }

    /// Access to the session holder.
    #[must_use]
    pub const fn session(&self) -> &SessionHolder {
        &self.session
    }

    /// Identifier stamped on every signout this instance posts.
    #[must_use]
    pub const fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Portal this instance runs inside.
    #[must_use]
    pub const fn current_portal(&self) -> Portal {
        self.options.current_portal
    }

    /// Installs a new primary session.
    ///
    /// The session is persisted first; on success every cached portal
    /// token is dropped since none of them derive from the new session.
    ///
    /// # Errors
    /// Returns an error if the session cannot be persisted. The previous
    /// session stays in place in that case.
    #[instrument(skip_all, fields(user = %session.user.id))]
    pub async fn establish_session(&self, session: PrimarySession) -> CrossPortalResult<()> {
        self.session.persist(&session).await?;

        let mut state = self.session.write().await;
        state.replace(Some(session));
        let dropped = self.cache.clear().await;
        drop(state);

        info!(dropped, "Primary session established");
        Ok(())
    }

    /// Ends the primary session and drops every cached token.
    ///
    /// # Errors
    /// Returns an error if the stored session cannot be removed. Local
    /// state is cleared regardless.
    pub async fn end_session(&self) -> CrossPortalResult<Option<PrimarySession>> {
        let mut state = self.session.write().await;
        let previous = state.replace(None);
        let dropped = self.cache.clear().await;
        drop(state);

        debug!(dropped, "Primary session ended");
        self.session.forget().await?;
        Ok(previous)
    }

    /// Exchanges the primary credential for a token scoped to `portal`.
    ///
    /// Returns `Ok(None)` if the exchange endpoint fails; the failure is
    /// logged and the cache is left untouched. The result is also dropped
    /// if the primary session changed while the request was in flight.
    ///
    /// # Errors
    /// Returns `MissingCredential` without any network call if there is no
    /// primary credential, or a domain error if `portal` has no base URL.
    #[instrument(skip_all, fields(portal = %portal))]
    pub async fn exchange_token(&self, portal: Portal) -> CrossPortalResult<Option<PortalToken>> {
        let (credential, epoch) = self
            .session
            .credential_snapshot()
            .await
            .ok_or(CrossPortalError::MissingCredential)?;
        let base_url = self.options.directory.base_url(portal)?.clone();

        let request = TokenExchangeRequest {
            portal,
            redirect_url: base_url.clone(),
        };

        debug!("Exchanging primary credential");
        let response = match self.exchanger.exchange(&credential, &request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Token exchange failed");
                return Ok(None);
            }
        };

        let token = PortalToken::from_exchange(
            portal,
            response.access_token,
            response.expires_in,
            base_url,
            self.clock.now(),
        );

        // Holding the read guard keeps the session from changing between
        // the epoch check and the cache write.
        let state = self.session.read().await;
        if state.epoch() != epoch {
            info!("Primary session changed during exchange; discarding token");
            return Ok(None);
        }
        self.cache.store(token.clone()).await;
        drop(state);

        info!(
            token = %token.preview(),
            expires_in = response.expires_in,
            "Portal token obtained"
        );
        Ok(Some(token))
    }

    /// Opens `portal` at `path` (root if omitted) in a new browsing context.
    ///
    /// Uses the cached token when it is unexpired, otherwise exchanges
    /// first. Returns the URL that was opened.
    ///
    /// # Errors
    /// Fails if there is no primary credential, if the exchange produced no
    /// token, if the URL cannot be built, or if the browser cannot open it.
    /// Nothing is retried.
    #[instrument(skip_all, fields(portal = %portal))]
    pub async fn navigate_to_portal(
        &self,
        portal: Portal,
        path: Option<&str>,
    ) -> CrossPortalResult<Url> {
        let token = match self.cache.get_valid(portal, self.clock.now()).await {
            Some(token) => {
                debug!("Using cached portal token");
                token
            }
            None => self
                .exchange_token(portal)
                .await?
                .ok_or(CrossPortalError::ExchangeFailed { portal })?,
        };

        let url = build_portal_url(&token.base_url, path, &token.access_token)?;
        self.browser.open_remote_session(&url).await?;

        info!(url = %redact_url(&url), "Opened portal");
        Ok(url)
    }

    /// Returns true if an unexpired token is cached for `portal`.
    pub async fn is_portal_authenticated(&self, portal: Portal) -> bool {
        self.cache
            .get_valid(portal, self.clock.now())
            .await
            .is_some()
    }

    /// Returns the unexpired cached token for `portal`, if any.
    pub async fn portal_token(&self, portal: Portal) -> Option<PortalToken> {
        self.cache.get_valid(portal, self.clock.now()).await
    }

    /// Status of the cached token for `portal`.
    pub async fn portal_status(&self, portal: Portal) -> PortalTokenStatus {
        self.cache.status(portal, self.clock.now()).await
    }

    /// Evicts expired tokens and returns how many were removed.
    pub async fn sweep_expired(&self) -> usize {
        let evicted = self.cache.sweep_expired(self.clock.now()).await;
        if !evicted.is_empty() {
            debug!(?evicted, "Swept expired portal tokens");
        }
        evicted.len()
    }

    /// Signs out of every portal.
    ///
    /// Clears the cache and the primary session, then tells other contexts
    /// to do the same. The broadcast is best effort: a failure is logged and
    /// does not fail the signout.
    ///
    /// # Errors
    /// Returns an error if the stored session cannot be removed. The
    /// broadcast is still attempted in that case.
    #[instrument(skip_all, fields(portal = %self.options.current_portal))]
    pub async fn sign_out(&self) -> CrossPortalResult<()> {
        let ended = self.end_session().await;

        let message = CrossPortalMessage::signout(self.options.current_portal, self.clock.now())
            .with_origin(self.instance_id);
        if let Err(e) = self.browser.broadcast_local_signout(&message).await {
            warn!(error = %e, "Signout broadcast failed");
        }

        info!("Signed out");
        ended.map(|_| ())
    }

    /// Reacts to a message posted by another context.
    ///
    /// A signout clears the local cache and primary session; the local
    /// context does not re-broadcast. Signouts this instance posted itself
    /// are ignored, since its state was already cleared when it sent them.
    ///
    /// # Errors
    /// Returns an error if the stored session cannot be removed.
    pub async fn handle_cross_portal_message(
        &self,
        message: &CrossPortalMessage,
    ) -> CrossPortalResult<()> {
        match message {
            CrossPortalMessage::CrossPortalSignout {
                origin: Some(origin),
                ..
            } if *origin == self.instance_id => {
                debug!("Ignoring own signout");
                Ok(())
            }
            CrossPortalMessage::CrossPortalSignout {
                portal, timestamp, ..
            } => {
                info!(from = %portal, timestamp, "Received cross-portal signout");
                self.end_session().await.map(|_| ())
            }
        }
    }
}
