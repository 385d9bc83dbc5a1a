//! Error types for the event listener.

use thiserror::Error;

/// Synchronous failures from [`EventListener`](crate::EventListener) calls.
///
/// Background renewal failures are not represented here — they surface as
/// [`ListenerEvent::SubscriptionError`](crate::ListenerEvent) on the event
/// channel, since the renewal tick has no caller to propagate to.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// `listen()` was called on a listener that is already listening
    #[error("listener is already listening")]
    AlreadyListening,

    /// Subscriptions can only be managed after `listen()` has succeeded
    #[error("listener is not listening; call listen() first")]
    NotListening,

    /// The subscription id is not tracked by this listener
    #[error("no subscription with sid {0}")]
    UnknownSubscription(String),

    /// A SUBSCRIBE/UNSUBSCRIBE exchange with the device failed
    #[error("subscription request failed: {0}")]
    Subscription(String),

    /// The local callback listener could not be started
    #[error("callback listener error: {0}")]
    CallbackServer(String),
}

/// Convenience alias for results carrying [`ListenerError`].
pub type Result<T> = std::result::Result<T, ListenerError>;
