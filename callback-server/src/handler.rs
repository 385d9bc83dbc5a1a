//! The seam between the HTTP listener and the subscription layer.

use async_trait::async_trait;

/// Outcome of delivering a NOTIFY payload to the subscription layer.
///
/// The listener maps each disposition to an HTTP response status. Unknown
/// subscription ids are acknowledged with 200 rather than an error status:
/// they are expected races with a recent unsubscribe, and devices would
/// otherwise retry or drop the subscription on their side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Payload accepted and merged; responds 200 with an empty body
    Delivered,
    /// The SID is not tracked; responds 200, payload dropped
    UnknownSubscription,
    /// Payload could not be parsed; responds 500
    Rejected,
}

/// Receives validated NOTIFY payloads from the listener.
#[async_trait]
pub trait NotificationHandler: Send + Sync {
    /// Handle one notification: `sid` from the `SID` header, `body` the raw
    /// XML property-set document.
    async fn handle_notify(&self, sid: &str, body: &str) -> Disposition;
}
