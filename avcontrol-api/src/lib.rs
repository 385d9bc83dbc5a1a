//! Typed control API for UPnP media-renderer devices.
//!
//! This crate binds each device service to its control endpoint and exposes
//! remote actions as plain methods. The SOAP exchange itself lives in the
//! private `soap-client` crate; this layer adds the service descriptors,
//! the per-service default-parameter merge, and thin typed wrappers around
//! the decoded field mappings.
//!
//! ```no_run
//! use avcontrol_api::Device;
//!
//! # fn main() -> avcontrol_api::Result<()> {
//! let device = Device::new("192.168.1.42");
//! device.set_volume(25)?;
//! device.play_uri("http://example.com/stream.mp3", "")?;
//! println!("state: {}", device.transport_state()?);
//! # Ok(())
//! # }
//! ```

mod device;
mod error;
mod proxy;
mod service;
pub mod services;
mod track;

pub use device::Device;
pub use error::{ApiError, Result};
pub use proxy::ServiceProxy;
pub use service::{merge_params, Service, ServiceInfo};
pub use services::{AvTransport, BrowseResponse, ContentDirectory, DeviceProperties, RenderingControl};
pub use track::{parse_didl, Track, TrackMetadata};

// Re-exported so callers can build parameter lists for the generic proxy
// without depending on the internal crate directly.
pub use soap_client::{ActionParams, ActionResponse};
