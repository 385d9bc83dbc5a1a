//! End-to-end subscription lifecycle tests with a mock device and the real
//! callback listener.

use avcontrol_api::Service;
use avcontrol_events::{EventListener, ListenerError, ListenerEvent};
use tokio::sync::mpsc::UnboundedReceiver;

fn device_host_and_port(server: &mockito::ServerGuard) -> (String, u16) {
    let host_with_port = server.host_with_port();
    let (host, port) = host_with_port.split_once(':').unwrap();
    (host.to_string(), port.parse().unwrap())
}

/// Listener pinned to the loopback interface so tests never depend on
/// routed-interface detection.
fn loopback_listener(
    host: String,
    port: u16,
) -> (EventListener, UnboundedReceiver<ListenerEvent>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    let (listener, events) = EventListener::new(host, port);
    (listener.with_callback_host("127.0.0.1"), events)
}

fn notify_method() -> reqwest::Method {
    reqwest::Method::from_bytes(b"NOTIFY").unwrap()
}

async fn send_notify(port: u16, sid: &str, body: &str) -> reqwest::Response {
    reqwest::Client::new()
        .request(notify_method(), format!("http://127.0.0.1:{port}/notify"))
        .header("SID", sid)
        .header("NT", "upnp:event")
        .header("NTS", "upnp:propchange")
        .body(body.to_string())
        .send()
        .await
        .expect("NOTIFY delivered")
}

#[tokio::test]
async fn subscribe_receives_notifications_and_accumulates_state() {
    let mut server = mockito::Server::new_async().await;
    let (host, device_port) = device_host_and_port(&server);

    let subscribe_mock = server
        .mock("SUBSCRIBE", "/MediaRenderer/RenderingControl/Event")
        .match_header("nt", "upnp:event")
        .match_header("timeout", "Second-3600")
        .with_status(200)
        .with_header("SID", "uuid:sub-1")
        .with_header("TIMEOUT", "Second-3600")
        .create_async()
        .await;
    let unsubscribe_mock = server
        .mock("UNSUBSCRIBE", "/MediaRenderer/RenderingControl/Event")
        .match_header("sid", "uuid:sub-1")
        .with_status(200)
        .create_async()
        .await;

    let (mut listener, mut events) = loopback_listener(host, device_port);
    let callback_port = listener.listen().await.unwrap();

    let sid = listener.subscribe(Service::RenderingControl).await.unwrap();
    assert_eq!(sid, "uuid:sub-1");
    subscribe_mock.assert_async().await;
    assert_eq!(listener.tracked_subscriptions(), vec!["uuid:sub-1"]);

    let volume = r#"<e:propertyset xmlns:e="urn:schemas-upnp-org:event-1-0"><e:property><Volume>10</Volume></e:property></e:propertyset>"#;
    let mute = r#"<e:propertyset xmlns:e="urn:schemas-upnp-org:event-1-0"><e:property><Mute>0</Mute></e:property></e:propertyset>"#;

    assert_eq!(send_notify(callback_port, "uuid:sub-1", volume).await.status(), 200);
    assert_eq!(send_notify(callback_port, "uuid:sub-1", mute).await.status(), 200);

    let first = events.recv().await.unwrap();
    match first {
        ListenerEvent::ServiceEvent { ref properties, .. } => {
            assert_eq!(properties.get("Volume").map(String::as_str), Some("10"));
        }
        ref other => panic!("expected service event, got {other:?}"),
    }
    let second = events.recv().await.unwrap();
    match second {
        ListenerEvent::ServiceEvent {
            event_path,
            sid,
            properties,
        } => {
            assert_eq!(event_path, "/MediaRenderer/RenderingControl/Event");
            assert_eq!(sid, "uuid:sub-1");
            assert_eq!(properties.get("Volume").map(String::as_str), Some("10"));
            assert_eq!(properties.get("Mute").map(String::as_str), Some("0"));
        }
        other => panic!("expected service event, got {other:?}"),
    }

    listener.shutdown().await;
    unsubscribe_mock.assert_async().await;
    assert!(listener.tracked_subscriptions().is_empty());
}

#[tokio::test]
async fn notify_with_unknown_sid_is_acknowledged_but_dropped() {
    let mut server = mockito::Server::new_async().await;
    let (host, device_port) = device_host_and_port(&server);

    server
        .mock("SUBSCRIBE", "/MediaRenderer/AVTransport/Event")
        .with_status(200)
        .with_header("SID", "uuid:sub-1")
        .with_header("TIMEOUT", "Second-3600")
        .create_async()
        .await;

    let (mut listener, mut events) = loopback_listener(host, device_port);
    let callback_port = listener.listen().await.unwrap();
    listener.subscribe(Service::AVTransport).await.unwrap();

    let body = r#"<e:propertyset xmlns:e="urn:schemas-upnp-org:event-1-0"><e:property><Volume>99</Volume></e:property></e:propertyset>"#;
    let response = send_notify(callback_port, "uuid:someone-else", body).await;

    // Unknown SIDs are treated as benign races with a recent unsubscribe.
    assert_eq!(response.status(), 200);
    assert!(events.try_recv().is_err());

    listener.shutdown().await;
}

#[tokio::test]
async fn subscribe_before_listen_is_rejected() {
    let (listener, _events) = EventListener::new("10.0.0.9", 1400);
    let result = listener.subscribe(Service::AVTransport).await;
    assert!(matches!(result, Err(ListenerError::NotListening)));

    let result = listener.unsubscribe("uuid:sub-1").await;
    assert!(matches!(result, Err(ListenerError::NotListening)));
}

#[tokio::test]
async fn listen_twice_is_rejected() {
    let (mut listener, _events) = loopback_listener("10.0.0.9".to_string(), 1400);
    listener.listen().await.unwrap();

    let result = listener.listen().await;
    assert!(matches!(result, Err(ListenerError::AlreadyListening)));

    listener.shutdown().await;
}

#[tokio::test]
async fn failed_subscribe_records_nothing() {
    let mut server = mockito::Server::new_async().await;
    let (host, device_port) = device_host_and_port(&server);

    server
        .mock("SUBSCRIBE", "/MediaRenderer/AVTransport/Event")
        .with_status(500)
        .create_async()
        .await;

    let (mut listener, _events) = loopback_listener(host, device_port);
    listener.listen().await.unwrap();

    let result = listener.subscribe(Service::AVTransport).await;
    assert!(matches!(result, Err(ListenerError::Subscription(_))));
    assert!(listener.tracked_subscriptions().is_empty());

    listener.shutdown().await;
}

#[tokio::test]
async fn second_unsubscribe_for_the_same_sid_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let (host, device_port) = device_host_and_port(&server);

    server
        .mock("SUBSCRIBE", "/MediaRenderer/AVTransport/Event")
        .with_status(200)
        .with_header("SID", "uuid:sub-1")
        .with_header("TIMEOUT", "Second-3600")
        .create_async()
        .await;
    server
        .mock("UNSUBSCRIBE", "/MediaRenderer/AVTransport/Event")
        .match_header("sid", "uuid:sub-1")
        .with_status(200)
        .create_async()
        .await;

    let (mut listener, _events) = loopback_listener(host, device_port);
    listener.listen().await.unwrap();
    let sid = listener.subscribe(Service::AVTransport).await.unwrap();

    listener.unsubscribe(&sid).await.unwrap();
    match listener.unsubscribe(&sid).await.unwrap_err() {
        ListenerError::UnknownSubscription(unknown) => assert_eq!(unknown, sid),
        other => panic!("expected unknown subscription, got {other:?}"),
    }

    listener.shutdown().await;
}

#[tokio::test]
async fn failed_unsubscribe_leaves_the_record_tracked() {
    let mut server = mockito::Server::new_async().await;
    let (host, device_port) = device_host_and_port(&server);

    server
        .mock("SUBSCRIBE", "/MediaRenderer/AVTransport/Event")
        .with_status(200)
        .with_header("SID", "uuid:sub-1")
        .with_header("TIMEOUT", "Second-3600")
        .create_async()
        .await;
    server
        .mock("UNSUBSCRIBE", "/MediaRenderer/AVTransport/Event")
        .with_status(503)
        .expect_at_least(1)
        .create_async()
        .await;

    let (mut listener, _events) = loopback_listener(host, device_port);
    listener.listen().await.unwrap();
    let sid = listener.subscribe(Service::AVTransport).await.unwrap();

    let result = listener.unsubscribe(&sid).await;
    assert!(matches!(result, Err(ListenerError::Subscription(_))));
    assert_eq!(listener.tracked_subscriptions(), vec![sid]);

    listener.shutdown().await;
}
