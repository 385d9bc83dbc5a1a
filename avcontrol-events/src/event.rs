//! Events emitted on the listener's channel.

use std::collections::HashMap;

/// Asynchronous events surfaced by an [`EventListener`](crate::EventListener).
///
/// A closed set: consumers match exhaustively rather than registering
/// callbacks by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerEvent {
    /// A NOTIFY callback was merged into a subscription's state.
    ServiceEvent {
        /// Event endpoint path of the subscribed service
        event_path: String,
        /// Subscription id the notification was addressed to
        sid: String,
        /// Full snapshot of the accumulated properties after the merge
        properties: HashMap<String, String>,
    },

    /// A background renewal or automatic resubscription failed.
    ///
    /// The subscription stays tracked (and retried) on renewal failures;
    /// after a failed resubscription nothing remains tracked for the path
    /// until a caller re-adds it.
    SubscriptionError {
        /// Human-readable failure cause
        cause: String,
        /// Event endpoint path of the affected subscription
        event_path: String,
        /// Subscription id that failed to renew
        sid: String,
    },
}
