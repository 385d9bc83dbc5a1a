//! Subscription lifecycle management and notification routing.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use async_trait::async_trait;
use callback_server::{detect_local_ip, CallbackServer, Disposition, NotificationHandler};
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use avcontrol_api::Service;

use crate::error::{ListenerError, Result};
use crate::event::ListenerEvent;
use crate::gena::{GenaClient, GenaError};
use crate::propertyset::parse_property_set;
use crate::renewal::renew_after;

/// One tracked subscription on the remote device.
#[derive(Debug, Clone)]
struct Subscription {
    event_path: String,
    renew_at: Instant,
    properties: HashMap<String, String>,
}

/// Shared state between the listener handle, the NOTIFY sink, and the
/// renewal tick task.
///
/// The subscription table is the single shared mutable resource; every
/// access goes through atomic per-key operations, and renewal results are
/// no-ops when the record was removed while the request was in flight.
struct Inner {
    host: String,
    port: u16,
    gena: GenaClient,
    subscriptions: DashMap<String, Subscription>,
    event_tx: mpsc::UnboundedSender<ListenerEvent>,
    callback_url: OnceLock<String>,
}

impl Inner {
    fn event_url(&self, event_path: &str) -> String {
        format!("http://{}:{}{}", self.host, self.port, event_path)
    }

    fn emit(&self, event: ListenerEvent) {
        // The receiver may be gone during teardown; nothing to do then.
        let _ = self.event_tx.send(event);
    }

    async fn subscribe_path(&self, event_path: &str) -> Result<String> {
        let callback_url = self.callback_url.get().ok_or(ListenerError::NotListening)?;

        let response = self
            .gena
            .subscribe(&self.event_url(event_path), callback_url)
            .await
            .map_err(|e| ListenerError::Subscription(e.to_string()))?;

        let subscription = Subscription {
            event_path: event_path.to_string(),
            renew_at: Instant::now() + renew_after(response.timeout.as_deref()),
            properties: HashMap::new(),
        };
        self.subscriptions.insert(response.sid.clone(), subscription);

        debug!(sid = %response.sid, event_path, "subscription established");
        Ok(response.sid)
    }

    /// One pass of the renewal tick: renew every subscription whose
    /// schedule has passed.
    async fn run_renewals(&self) {
        let now = Instant::now();
        // Collect first; never renew while iterating the table.
        let due: Vec<(String, String)> = self
            .subscriptions
            .iter()
            .filter(|entry| entry.renew_at <= now)
            .map(|entry| (entry.key().clone(), entry.event_path.clone()))
            .collect();

        for (sid, event_path) in due {
            self.renew_one(&sid, &event_path).await;
        }
    }

    async fn renew_one(&self, sid: &str, event_path: &str) {
        match self.gena.renew(&self.event_url(event_path), sid).await {
            Ok(timeout) => {
                // No-op if the subscription was removed while the renewal
                // was in flight.
                if let Some(mut entry) = self.subscriptions.get_mut(sid) {
                    entry.renew_at = Instant::now() + renew_after(timeout.as_deref());
                }
            }
            Err(GenaError::Gone) => {
                // Device restarted and forgot us; drop the stale record and
                // resubscribe the same event path.
                debug!(sid, event_path, "device lost subscription, resubscribing");
                self.subscriptions.remove(sid);
                if let Err(e) = self.subscribe_path(event_path).await {
                    self.emit(ListenerEvent::SubscriptionError {
                        cause: e.to_string(),
                        event_path: event_path.to_string(),
                        sid: sid.to_string(),
                    });
                }
            }
            Err(e) => {
                // renew_at stays untouched, so the next tick retries.
                self.emit(ListenerEvent::SubscriptionError {
                    cause: e.to_string(),
                    event_path: event_path.to_string(),
                    sid: sid.to_string(),
                });
            }
        }
    }

    fn handle_notify(&self, sid: &str, body: &str) -> Disposition {
        if !self.subscriptions.contains_key(sid) {
            return Disposition::UnknownSubscription;
        }

        let pairs = match parse_property_set(body) {
            Ok(pairs) => pairs,
            Err(e) => {
                warn!(sid, error = %e, "unparseable NOTIFY body");
                return Disposition::Rejected;
            }
        };

        // Re-checked under the entry lock; the subscription may have been
        // removed between the check above and here.
        let Some(mut entry) = self.subscriptions.get_mut(sid) else {
            return Disposition::UnknownSubscription;
        };
        for (key, value) in pairs {
            entry.properties.insert(key, value);
        }
        let event_path = entry.event_path.clone();
        let properties = entry.properties.clone();
        drop(entry);

        self.emit(ListenerEvent::ServiceEvent {
            event_path,
            sid: sid.to_string(),
            properties,
        });
        Disposition::Delivered
    }
}

struct NotifySink {
    inner: Arc<Inner>,
}

#[async_trait]
impl NotificationHandler for NotifySink {
    async fn handle_notify(&self, sid: &str, body: &str) -> Disposition {
        self.inner.handle_notify(sid, body)
    }
}

struct Running {
    server: CallbackServer,
    tick_shutdown: mpsc::Sender<()>,
    tick_handle: tokio::task::JoinHandle<()>,
}

/// Manages event subscriptions against one media-renderer device.
///
/// Owns a local callback listener for inbound NOTIFY traffic, a one-second
/// renewal tick, and the table of active subscriptions. Property changes
/// and background failures arrive on the channel returned by [`new`](Self::new);
/// precondition violations on `subscribe`/`unsubscribe` are returned
/// synchronously instead.
pub struct EventListener {
    inner: Arc<Inner>,
    runtime: Option<Running>,
    callback_port: u16,
    callback_host: Option<String>,
}

impl EventListener {
    /// Create a listener for the device at `host:port`, returning it with
    /// the receiving end of its event channel.
    pub fn new(
        host: impl Into<String>,
        port: u16,
    ) -> (Self, mpsc::UnboundedReceiver<ListenerEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let inner = Arc::new(Inner {
            host: host.into(),
            port,
            gena: GenaClient::new(),
            subscriptions: DashMap::new(),
            event_tx,
            callback_url: OnceLock::new(),
        });
        (
            Self {
                inner,
                runtime: None,
                callback_port: 0,
                callback_host: None,
            },
            event_rx,
        )
    }

    /// Use a fixed local port for the callback listener instead of an
    /// ephemeral one.
    pub fn with_callback_port(mut self, port: u16) -> Self {
        self.callback_port = port;
        self
    }

    /// Use a specific local interface address in callback URLs instead of
    /// the auto-detected one. Useful on multi-homed machines.
    pub fn with_callback_host(mut self, host: impl Into<String>) -> Self {
        self.callback_host = Some(host.into());
        self
    }

    /// Whether `listen()` has succeeded on this listener.
    pub fn is_listening(&self) -> bool {
        self.inner.callback_url.get().is_some()
    }

    /// Subscription ids currently tracked.
    pub fn tracked_subscriptions(&self) -> Vec<String> {
        self.inner
            .subscriptions
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Start the callback listener and the renewal tick.
    ///
    /// Returns the local port NOTIFY callbacks arrive on. Fails with
    /// [`ListenerError::AlreadyListening`] when called twice.
    pub async fn listen(&mut self) -> Result<u16> {
        if self.is_listening() {
            return Err(ListenerError::AlreadyListening);
        }

        let handler = Arc::new(NotifySink {
            inner: self.inner.clone(),
        });
        let server = CallbackServer::bind(self.callback_port, handler)
            .await
            .map_err(|e| ListenerError::CallbackServer(e.to_string()))?;

        let callback_host = match &self.callback_host {
            Some(host) => host.clone(),
            None => detect_local_ip()
                .ok_or_else(|| {
                    ListenerError::CallbackServer(
                        "could not determine local interface address".to_string(),
                    )
                })?
                .to_string(),
        };
        let port = server.port();
        let callback_url = format!("http://{callback_host}:{port}/notify");
        let _ = self.inner.callback_url.set(callback_url);

        let (tick_shutdown, mut shutdown_rx) = mpsc::channel::<()>(1);
        let inner = self.inner.clone();
        let tick_handle = tokio::spawn(async move {
            let mut tick = tokio::time::interval(std::time::Duration::from_secs(1));
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = tick.tick() => inner.run_renewals().await,
                    _ = shutdown_rx.recv() => break,
                }
            }
        });

        self.runtime = Some(Running {
            server,
            tick_shutdown,
            tick_handle,
        });
        Ok(port)
    }

    /// Subscribe to a service's event endpoint; returns the
    /// device-assigned subscription id.
    pub async fn subscribe(&self, service: Service) -> Result<String> {
        self.subscribe_path(service.info().event_path).await
    }

    /// Subscribe to an arbitrary event endpoint path.
    pub async fn subscribe_path(&self, event_path: &str) -> Result<String> {
        if !self.is_listening() {
            return Err(ListenerError::NotListening);
        }
        self.inner.subscribe_path(event_path).await
    }

    /// Unsubscribe a tracked subscription.
    ///
    /// On UNSUBSCRIBE failure the record stays tracked and the error is
    /// surfaced; a 412 counts as success since the device has already
    /// forgotten the subscription.
    pub async fn unsubscribe(&self, sid: &str) -> Result<()> {
        if !self.is_listening() {
            return Err(ListenerError::NotListening);
        }
        let event_path = self
            .inner
            .subscriptions
            .get(sid)
            .map(|entry| entry.event_path.clone())
            .ok_or_else(|| ListenerError::UnknownSubscription(sid.to_string()))?;

        match self
            .inner
            .gena
            .unsubscribe(&self.inner.event_url(&event_path), sid)
            .await
        {
            Ok(()) | Err(GenaError::Gone) => {
                self.inner.subscriptions.remove(sid);
                Ok(())
            }
            Err(e) => Err(ListenerError::Subscription(e.to_string())),
        }
    }

    /// Stop the renewal tick and the callback listener, then best-effort
    /// unsubscribe everything still tracked.
    ///
    /// Remote failures during cleanup are logged, not surfaced — the
    /// subscriptions expire server-side anyway.
    pub async fn shutdown(&mut self) {
        let Some(running) = self.runtime.take() else {
            return;
        };

        let _ = running.tick_shutdown.send(()).await;
        let _ = running.tick_handle.await;
        running.server.shutdown().await;

        let tracked: Vec<(String, String)> = self
            .inner
            .subscriptions
            .iter()
            .map(|entry| (entry.key().clone(), entry.event_path.clone()))
            .collect();
        for (sid, event_path) in tracked {
            let url = self.inner.event_url(&event_path);
            match self.inner.gena.unsubscribe(&url, &sid).await {
                Ok(()) | Err(GenaError::Gone) => {}
                Err(e) => warn!(sid, error = %e, "unsubscribe during shutdown failed"),
            }
            self.inner.subscriptions.remove(&sid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_inner(server: &mockito::ServerGuard) -> (Arc<Inner>, mpsc::UnboundedReceiver<ListenerEvent>) {
        let host_with_port = server.host_with_port();
        let (host, port) = host_with_port.split_once(':').unwrap();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let inner = Arc::new(Inner {
            host: host.to_string(),
            port: port.parse().unwrap(),
            gena: GenaClient::new(),
            subscriptions: DashMap::new(),
            event_tx,
            callback_url: OnceLock::new(),
        });
        let _ = inner
            .callback_url
            .set("http://127.0.0.1:3400/notify".to_string());
        (inner, event_rx)
    }

    fn insert_due_subscription(inner: &Inner, sid: &str, event_path: &str) {
        inner.subscriptions.insert(
            sid.to_string(),
            Subscription {
                event_path: event_path.to_string(),
                renew_at: Instant::now() - std::time::Duration::from_secs(1),
                properties: HashMap::new(),
            },
        );
    }

    const VOLUME_NOTIFY: &str = r#"<e:propertyset xmlns:e="urn:schemas-upnp-org:event-1-0"><e:property><Volume>10</Volume></e:property></e:propertyset>"#;
    const MUTE_NOTIFY: &str = r#"<e:propertyset xmlns:e="urn:schemas-upnp-org:event-1-0"><e:property><Mute>0</Mute></e:property></e:propertyset>"#;

    #[tokio::test]
    async fn successful_renewal_advances_the_schedule() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("SUBSCRIBE", "/Event")
            .match_header("sid", "uuid:sub-1")
            .with_status(200)
            .with_header("TIMEOUT", "Second-100")
            .create_async()
            .await;

        let (inner, _rx) = test_inner(&server);
        insert_due_subscription(&inner, "uuid:sub-1", "/Event");

        inner.run_renewals().await;

        mock.assert_async().await;
        let entry = inner.subscriptions.get("uuid:sub-1").unwrap();
        let wait = entry.renew_at - Instant::now();
        // Second-100 grants 85 s until the next renewal.
        assert!(wait > std::time::Duration::from_secs(80));
        assert!(wait <= std::time::Duration::from_secs(85));
    }

    #[tokio::test]
    async fn renewal_412_resubscribes_the_same_path_within_the_tick() {
        let mut server = mockito::Server::new_async().await;
        let renew_mock = server
            .mock("SUBSCRIBE", "/MediaRenderer/AVTransport/Event")
            .match_header("sid", "uuid:old")
            .with_status(412)
            .create_async()
            .await;
        let resubscribe_mock = server
            .mock("SUBSCRIBE", "/MediaRenderer/AVTransport/Event")
            .match_header("nt", "upnp:event")
            .with_status(200)
            .with_header("SID", "uuid:new")
            .with_header("TIMEOUT", "Second-3600")
            .create_async()
            .await;

        let (inner, _rx) = test_inner(&server);
        insert_due_subscription(&inner, "uuid:old", "/MediaRenderer/AVTransport/Event");

        inner.run_renewals().await;

        renew_mock.assert_async().await;
        resubscribe_mock.assert_async().await;
        assert!(!inner.subscriptions.contains_key("uuid:old"));
        let entry = inner.subscriptions.get("uuid:new").unwrap();
        assert_eq!(entry.event_path, "/MediaRenderer/AVTransport/Event");
    }

    #[tokio::test]
    async fn failed_resubscription_emits_an_error_with_the_old_sid() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("SUBSCRIBE", "/Event")
            .match_header("sid", "uuid:old")
            .with_status(412)
            .create_async()
            .await;
        server
            .mock("SUBSCRIBE", "/Event")
            .match_header("nt", "upnp:event")
            .with_status(500)
            .create_async()
            .await;

        let (inner, mut rx) = test_inner(&server);
        insert_due_subscription(&inner, "uuid:old", "/Event");

        inner.run_renewals().await;

        assert!(inner.subscriptions.is_empty());
        match rx.try_recv().unwrap() {
            ListenerEvent::SubscriptionError {
                event_path, sid, ..
            } => {
                assert_eq!(event_path, "/Event");
                assert_eq!(sid, "uuid:old");
            }
            other => panic!("expected subscription error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn other_renewal_failures_leave_the_record_for_retry() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("SUBSCRIBE", "/Event")
            .match_header("sid", "uuid:sub-1")
            .with_status(503)
            .create_async()
            .await;

        let (inner, mut rx) = test_inner(&server);
        insert_due_subscription(&inner, "uuid:sub-1", "/Event");

        inner.run_renewals().await;

        // Still tracked and still due, so the next tick retries.
        let entry = inner.subscriptions.get("uuid:sub-1").unwrap();
        assert!(entry.renew_at <= Instant::now());
        drop(entry);
        assert!(matches!(
            rx.try_recv().unwrap(),
            ListenerEvent::SubscriptionError { .. }
        ));
    }

    #[tokio::test]
    async fn notify_for_unknown_sid_is_ignored() {
        let server = mockito::Server::new_async().await;
        let (inner, mut rx) = test_inner(&server);

        let disposition = inner.handle_notify("uuid:who", VOLUME_NOTIFY);

        assert_eq!(disposition, Disposition::UnknownSubscription);
        assert!(rx.try_recv().is_err());
        assert!(inner.subscriptions.is_empty());
    }

    #[tokio::test]
    async fn notifications_accumulate_properties_across_events() {
        let server = mockito::Server::new_async().await;
        let (inner, mut rx) = test_inner(&server);
        insert_due_subscription(&inner, "uuid:sub-1", "/Event");

        assert_eq!(
            inner.handle_notify("uuid:sub-1", VOLUME_NOTIFY),
            Disposition::Delivered
        );
        assert_eq!(
            inner.handle_notify("uuid:sub-1", MUTE_NOTIFY),
            Disposition::Delivered
        );

        // First event carries only the volume.
        match rx.try_recv().unwrap() {
            ListenerEvent::ServiceEvent { properties, .. } => {
                assert_eq!(properties.get("Volume").map(String::as_str), Some("10"));
                assert!(!properties.contains_key("Mute"));
            }
            other => panic!("expected service event, got {other:?}"),
        }
        // Second event carries the union of both.
        match rx.try_recv().unwrap() {
            ListenerEvent::ServiceEvent {
                event_path,
                sid,
                properties,
            } => {
                assert_eq!(event_path, "/Event");
                assert_eq!(sid, "uuid:sub-1");
                assert_eq!(properties.get("Volume").map(String::as_str), Some("10"));
                assert_eq!(properties.get("Mute").map(String::as_str), Some("0"));
            }
            other => panic!("expected service event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_notify_is_rejected_without_merging() {
        let server = mockito::Server::new_async().await;
        let (inner, mut rx) = test_inner(&server);
        insert_due_subscription(&inner, "uuid:sub-1", "/Event");

        let disposition = inner.handle_notify("uuid:sub-1", "not xml <<<");

        assert_eq!(disposition, Disposition::Rejected);
        assert!(rx.try_recv().is_err());
        let entry = inner.subscriptions.get("uuid:sub-1").unwrap();
        assert!(entry.properties.is_empty());
    }
}
