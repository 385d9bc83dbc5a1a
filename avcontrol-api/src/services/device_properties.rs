//! DeviceProperties: zone naming, LED, and hardware info.

use soap_client::{ActionParams, ActionResponse};

use crate::error::Result;
use crate::proxy::ServiceProxy;

/// Proxy for the `DeviceProperties` service.
#[derive(Debug, Clone)]
pub struct DeviceProperties {
    proxy: ServiceProxy,
}

impl DeviceProperties {
    pub(crate) fn new(proxy: ServiceProxy) -> Self {
        Self { proxy }
    }

    /// Zone name and icon (`CurrentZoneName`, `CurrentIcon`).
    pub fn get_zone_attributes(&self) -> Result<ActionResponse> {
        self.proxy.action("GetZoneAttributes", ActionParams::new())
    }

    /// Hardware info: serial number, MAC address, software version
    /// (`SerialNumber`, `MACAddress`, `SoftwareVersion`, …). Callers use
    /// the MAC-style identifier to build queue-selection URIs.
    pub fn get_zone_info(&self) -> Result<ActionResponse> {
        self.proxy.action("GetZoneInfo", ActionParams::new())
    }

    pub fn get_led_state(&self) -> Result<bool> {
        let response = self.proxy.action("GetLEDState", ActionParams::new())?;
        Ok(response.field("CurrentLEDState") == "On")
    }

    pub fn set_led_state(&self, on: bool) -> Result<()> {
        self.proxy
            .action(
                "SetLEDState",
                ActionParams::new().with("DesiredLEDState", if on { "On" } else { "Off" }),
            )
            .map(drop)
    }
}
