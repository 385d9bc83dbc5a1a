//! SSDP discovery of UPnP media renderers.
//!
//! Broadcasts an M-SEARCH datagram for MediaRenderer devices, collects the
//! unicast replies until the timeout window closes, and emits one event per
//! newly observed device address. Control of a known host does not depend
//! on this crate — it only finds addresses to hand to `avcontrol-api`.

mod description;
mod error;
mod ssdp;

pub use description::{fetch_description, parse_description, DeviceDescription};
pub use error::{DiscoveryError, Result};

use std::collections::HashSet;
use std::time::Duration;

use crate::ssdp::{host_and_port_from_location, model_from_server, SsdpClient};

const MEDIA_RENDERER_TARGET: &str = "urn:schemas-upnp-org:device:MediaRenderer:1";

/// A renderer observed during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredRenderer {
    /// Device address
    pub host: String,
    /// Port from the description `LOCATION` URL (not the control port)
    pub port: u16,
    /// Model string from the `SERVER` header, when present
    pub model: Option<String>,
    /// Description document URL for [`fetch_description`]
    pub location: String,
}

/// Events emitted during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    /// A renderer was observed for the first time in this search
    Found(DiscoveredRenderer),
}

/// Discover all media renderers reachable within the timeout window.
pub fn discover(timeout: Duration) -> Vec<DiscoveredRenderer> {
    discover_iter(timeout)
        .map(|DiscoveryEvent::Found(renderer)| renderer)
        .collect()
}

/// Iterator-based discovery, yielding each renderer as it is observed.
///
/// A failed socket setup yields an empty iterator rather than an error —
/// discovery is best-effort by nature.
pub fn discover_iter(timeout: Duration) -> DiscoveryIterator {
    let client = SsdpClient::new(timeout)
        .and_then(|client| client.search(MEDIA_RENDERER_TARGET).map(|()| client))
        .ok();
    DiscoveryIterator {
        client,
        seen_hosts: HashSet::new(),
    }
}

/// Iterator over [`DiscoveryEvent`]s for one search window.
pub struct DiscoveryIterator {
    client: Option<SsdpClient>,
    seen_hosts: HashSet<String>,
}

impl Iterator for DiscoveryIterator {
    type Item = DiscoveryEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let client = self.client.as_ref()?;

        loop {
            let response = client.recv_response()?;
            let Some((host, port)) = host_and_port_from_location(&response.location) else {
                continue;
            };
            if !self.seen_hosts.insert(host.clone()) {
                continue;
            }
            let model = response.server.as_deref().and_then(model_from_server);
            return Some(DiscoveryEvent::Found(DiscoveredRenderer {
                host,
                port,
                model,
                location: response.location,
            }));
        }
    }
}
