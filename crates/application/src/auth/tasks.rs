//! Background tasks owned by a `CrossPortalAuth` instance.

use std::sync::Arc;
use std::time::Duration;

use crossportal_domain::CrossPortalMessage;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::auth::CrossPortalAuth;
use crate::ports::{PortalBrowser, TokenExchanger};

/// Default spacing between expiry sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Spawns a task that evicts expired tokens every `interval`.
///
/// The sweep only bounds memory; navigation validates expiry on its own.
/// Abort the returned handle to stop the task.
pub fn spawn_expiry_sweep<E, B>(
    auth: Arc<CrossPortalAuth<E, B>>,
    interval: Duration,
) -> JoinHandle<()>
where
    E: TokenExchanger + 'static,
    B: PortalBrowser + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = auth.sweep_expired().await;
            debug!(evicted, "Expiry sweep finished");
        }
    })
}

/// Spawns a task that applies every signout posted by other contexts.
///
/// The task ends when the channel closes. A lagging receiver skips the
/// missed messages; any later signout still clears local state.
pub fn listen_for_signouts<E, B>(
    auth: Arc<CrossPortalAuth<E, B>>,
    mut receiver: broadcast::Receiver<CrossPortalMessage>,
) -> JoinHandle<()>
where
    E: TokenExchanger + 'static,
    B: PortalBrowser + 'static,
{
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(message) => {
                    if let Err(e) = auth.handle_cross_portal_message(&message).await {
                        warn!(error = %e, "Failed to apply cross-portal signout");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Signout listener lagged");
                }
                Err(RecvError::Closed) => {
                    debug!("Signout channel closed");
                    break;
                }
            }
        }
    })
}
