//! Event subscription management for UPnP media renderers.
//!
//! UPnP eventing is subscription-based: the control point SUBSCRIBEs to a
//! service's event endpoint with a callback URL, the device assigns a
//! subscription id (SID) and a timeout, and from then on delivers state
//! changes as HTTP NOTIFY requests to the callback. Subscriptions must be
//! renewed before they expire; a device that restarted answers renewals
//! with HTTP 412, at which point a fresh subscription is needed.
//!
//! [`EventListener`] packages that whole lifecycle for one device: the
//! local callback listener, the renewal tick, transparent resubscription
//! after 412, and per-subscription property accumulation. Consumers drain
//! a single channel of [`ListenerEvent`]s.

mod error;
mod event;
mod gena;
mod listener;
mod propertyset;
mod renewal;

pub use error::{ListenerError, Result};
pub use event::ListenerEvent;
pub use listener::EventListener;
