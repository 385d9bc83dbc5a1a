//! Generic HTTP callback listener for UPnP event notifications.
//!
//! This crate provides the inbound half of UPnP eventing: a small HTTP
//! server that receives `NOTIFY` requests from devices and routes them, by
//! subscription id, to whatever layer owns the subscriptions. It is
//! deliberately generic — it validates the request shape, extracts the
//! `SID` header and body, and delegates everything else to a
//! [`NotificationHandler`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use callback_server::{CallbackServer, Disposition, NotificationHandler};
//!
//! struct Printer;
//!
//! #[async_trait]
//! impl NotificationHandler for Printer {
//!     async fn handle_notify(&self, sid: &str, body: &str) -> Disposition {
//!         println!("event for {sid}: {body}");
//!         Disposition::Delivered
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = CallbackServer::bind(0, Arc::new(Printer)).await.unwrap();
//!     println!("listening on port {}", server.port());
//!     server.shutdown().await;
//! }
//! ```

mod handler;
mod server;

pub use handler::{Disposition, NotificationHandler};
pub use server::{detect_local_ip, CallbackServer, CallbackServerError};
