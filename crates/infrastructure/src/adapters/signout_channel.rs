//! In-process signout channel.
//!
//! Stands in for the browser's inter-window messaging. Every subscriber
//! receives every signout, including the poster's own; receivers drop
//! their own messages by comparing the message origin.

use crossportal_domain::CrossPortalMessage;
use tokio::sync::broadcast;

/// Messages buffered per receiver before it starts lagging.
const DEFAULT_CAPACITY: usize = 16;

/// Broadcast channel shared by all contexts in the process.
#[derive(Debug, Clone)]
pub struct SignoutChannel {
    sender: broadcast::Sender<CrossPortalMessage>,
}

impl SignoutChannel {
    /// Creates a channel with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a channel buffering `capacity` messages per receiver.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Registers a new listener.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CrossPortalMessage> {
        self.sender.subscribe()
    }

    /// Posts a message, returning how many listeners received it.
    ///
    /// Zero listeners is not an error: delivery is best effort.
    pub fn post(&self, message: CrossPortalMessage) -> usize {
        self.sender.send(message).unwrap_or(0)
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SignoutChannel {
    fn default() -> Self {
        Self::new()
    }
}
