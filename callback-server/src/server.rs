//! HTTP server accepting UPnP NOTIFY requests.

use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::handler::{Disposition, NotificationHandler};

/// Errors from starting the callback listener.
#[derive(Debug, Error)]
pub enum CallbackServerError {
    /// The listener could not bind its local port
    #[error("failed to bind callback listener: {0}")]
    Bind(String),
}

/// HTTP callback listener for UPnP event notifications.
///
/// Accepts `NOTIFY /notify` (method and path case-insensitive), requires a
/// `SID` header, and forwards the body to the configured
/// [`NotificationHandler`]. All other requests get 404; a NOTIFY without a
/// `SID` header gets 400.
pub struct CallbackServer {
    port: u16,
    shutdown_tx: Option<mpsc::Sender<()>>,
    server_handle: Option<tokio::task::JoinHandle<()>>,
}

impl CallbackServer {
    /// Bind the listener and start serving.
    ///
    /// `port` 0 binds an ephemeral port; the actual port is available via
    /// [`port`](Self::port) afterwards.
    pub async fn bind(
        port: u16,
        handler: Arc<dyn NotificationHandler>,
    ) -> Result<Self, CallbackServerError> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let notify_route = warp::method()
            .and(warp::path::full())
            .and(warp::header::optional::<String>("sid"))
            .and(warp::body::bytes())
            .and_then({
                move |method: warp::http::Method,
                      path: warp::path::FullPath,
                      sid: Option<String>,
                      body: bytes::Bytes| {
                    let handler = handler.clone();
                    async move {
                        if !method.as_str().eq_ignore_ascii_case("NOTIFY")
                            || !path.as_str().eq_ignore_ascii_case("/notify")
                        {
                            return Err(warp::reject::not_found());
                        }

                        let sid = sid.ok_or_else(|| warp::reject::custom(MissingSid))?;
                        let body = String::from_utf8_lossy(&body);
                        debug!(sid = %sid, bytes = body.len(), "inbound NOTIFY");

                        let status = match handler.handle_notify(&sid, &body).await {
                            Disposition::Delivered => StatusCode::OK,
                            Disposition::UnknownSubscription => {
                                debug!(sid = %sid, "NOTIFY for untracked subscription, dropped");
                                StatusCode::OK
                            }
                            Disposition::Rejected => {
                                warn!(sid = %sid, "NOTIFY body rejected");
                                StatusCode::INTERNAL_SERVER_ERROR
                            }
                        };

                        Ok::<_, Rejection>(warp::reply::with_status(warp::reply(), status))
                    }
                }
            });

        let routes = notify_route.recover(handle_rejection);

        let (addr, server) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(
                SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
                async move {
                    shutdown_rx.recv().await;
                },
            )
            .map_err(|e| CallbackServerError::Bind(e.to_string()))?;

        debug!(port = addr.port(), "callback listener bound");
        let server_handle = tokio::spawn(server);

        Ok(Self {
            port: addr.port(),
            shutdown_tx: Some(shutdown_tx),
            server_handle: Some(server_handle),
        })
    }

    /// The local port the listener is bound to.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Stop accepting traffic and wait for in-flight requests to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(handle) = self.server_handle.take() {
            let _ = handle.await;
        }
    }
}

#[derive(Debug)]
struct MissingSid;

impl warp::reject::Reject for MissingSid {}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let status = if err.find::<MissingSid>().is_some() {
        StatusCode::BAD_REQUEST
    } else if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Ok(warp::reply::with_status(warp::reply(), status))
}

/// Detect the local IP address used for outbound traffic.
///
/// Uses a connected UDP socket to learn the routed interface address; no
/// datagram is actually sent. Devices deliver NOTIFY callbacks to this
/// address.
pub fn detect_local_ip() -> Option<IpAddr> {
    let socket = std::net::UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    Some(socket.local_addr().ok()?.ip())
}
