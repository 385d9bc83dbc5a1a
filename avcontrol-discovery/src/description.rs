//! Device description fetch and parse.
//!
//! The `LOCATION` header of an SSDP response points at an XML device
//! description document; the fields extracted here identify the renderer
//! beyond its network address.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{DiscoveryError, Result};

/// Identity fields from a UPnP device description document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescription {
    /// Human-readable device name
    pub friendly_name: String,
    /// Manufacturer model name
    pub model_name: String,
    /// Unique device name, e.g. `uuid:RINCON_000E58A0123456`
    pub udn: String,
}

#[derive(Debug, Deserialize)]
struct Root {
    device: DeviceNode,
}

#[derive(Debug, Deserialize)]
struct DeviceNode {
    #[serde(rename = "friendlyName", default)]
    friendly_name: String,
    #[serde(rename = "modelName", default)]
    model_name: String,
    #[serde(rename = "UDN", default)]
    udn: String,
}

/// Fetch and parse the description document behind a `LOCATION` URL.
pub fn fetch_description(location: &str, timeout: Duration) -> Result<DeviceDescription> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DiscoveryError::Network(format!("failed to build HTTP client: {e}")))?;

    let text = client
        .get(location)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(|e| DiscoveryError::Network(e.to_string()))?;

    parse_description(&text)
}

/// Parse a device description document.
pub fn parse_description(xml: &str) -> Result<DeviceDescription> {
    let root: Root = quick_xml::de::from_str(xml)
        .map_err(|e| DiscoveryError::Parse(format!("device description: {e}")))?;

    Ok(DeviceDescription {
        friendly_name: root.device.friendly_name,
        model_name: root.device.model_name,
        udn: root.device.udn,
    })
}
