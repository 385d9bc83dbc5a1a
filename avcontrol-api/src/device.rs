//! Device façade: one renderer, all of its services.

use soap_client::{SoapClient, DEFAULT_CONTROL_PORT};

use crate::error::Result;
use crate::proxy::ServiceProxy;
use crate::service::Service;
use crate::services::{
    AvTransport, BrowseResponse, ContentDirectory, DeviceProperties, RenderingControl,
};
use crate::track::{parse_didl, Track};

/// A media-renderer device addressed by host and control port.
///
/// Cheap to clone; the underlying HTTP agent is shared. Convenience methods
/// are call-site sugar over exactly one service action each — sequencing of
/// dependent calls ("set volume, then play") is the caller's job.
#[derive(Debug, Clone)]
pub struct Device {
    host: String,
    port: u16,
    client: SoapClient,
}

impl Device {
    /// Address a device on the conventional control port (1400).
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_port(host, DEFAULT_CONTROL_PORT)
    }

    /// Address a device on an explicit control port.
    pub fn with_port(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            client: SoapClient::new(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// A generic proxy for any service, including those without a typed
    /// surface (alarms, music services, …).
    pub fn service(&self, service: Service) -> ServiceProxy {
        ServiceProxy::new(service, self.host.clone(), self.port, self.client.clone())
    }

    pub fn av_transport(&self) -> AvTransport {
        AvTransport::new(self.service(Service::AVTransport))
    }

    pub fn rendering_control(&self) -> RenderingControl {
        RenderingControl::new(self.service(Service::RenderingControl))
    }

    pub fn content_directory(&self) -> ContentDirectory {
        ContentDirectory::new(self.service(Service::ContentDirectory))
    }

    pub fn device_properties(&self) -> DeviceProperties {
        DeviceProperties::new(self.service(Service::DeviceProperties))
    }

    // Transport sugar

    pub fn play(&self) -> Result<()> {
        self.av_transport().play()
    }

    pub fn pause(&self) -> Result<()> {
        self.av_transport().pause()
    }

    pub fn stop(&self) -> Result<()> {
        self.av_transport().stop()
    }

    pub fn next(&self) -> Result<()> {
        self.av_transport().next()
    }

    pub fn previous(&self) -> Result<()> {
        self.av_transport().previous()
    }

    /// Seek to an elapsed time in the current track, `H:MM:SS`.
    pub fn seek(&self, target: &str) -> Result<()> {
        self.av_transport().seek("REL_TIME", target)
    }

    /// Point the transport at a URI and start playback.
    pub fn play_uri(&self, uri: &str, metadata: &str) -> Result<()> {
        let transport = self.av_transport();
        transport.set_av_transport_uri(uri, metadata)?;
        transport.play()
    }

    /// Append a URI to the end of the queue; returns the enqueued position.
    pub fn queue_uri(&self, uri: &str, metadata: &str) -> Result<u32> {
        self.av_transport().add_uri_to_queue(uri, metadata, 0, false)
    }

    /// Clear the play queue.
    pub fn flush_queue(&self) -> Result<()> {
        self.av_transport().remove_all_tracks_from_queue()
    }

    /// Transport state string, e.g. `PLAYING`, `PAUSED_PLAYBACK`, `STOPPED`.
    pub fn transport_state(&self) -> Result<String> {
        let response = self.av_transport().get_transport_info()?;
        Ok(response.field("CurrentTransportState").to_string())
    }

    /// The currently playing track with position information and decoded
    /// metadata.
    pub fn current_track(&self) -> Result<Track> {
        let response = self.av_transport().get_position_info()?;

        let metadata = parse_didl(response.field("TrackMetaData"))?.into_iter().next();
        let non_empty = |v: &str| (!v.is_empty()).then(|| v.to_string());

        Ok(Track {
            queue_position: response.field("Track").parse().unwrap_or(0),
            uri: non_empty(response.field("TrackURI")),
            duration: non_empty(response.field("TrackDuration")),
            position: non_empty(response.field("RelTime")),
            metadata,
        })
    }

    /// The play queue (`Q:0`), first `requested_count` entries from
    /// `starting_index`.
    pub fn get_queue(&self, starting_index: u32, requested_count: u32) -> Result<BrowseResponse> {
        self.content_directory()
            .browse("Q:0", starting_index, requested_count)
    }

    // Rendering sugar

    pub fn get_volume(&self) -> Result<u16> {
        self.rendering_control().get_volume()
    }

    pub fn set_volume(&self, volume: u16) -> Result<()> {
        self.rendering_control().set_volume(volume)
    }

    /// Adjust volume by a signed delta; returns the resulting volume.
    pub fn adjust_volume(&self, delta: i32) -> Result<u16> {
        self.rendering_control().set_relative_volume(delta)
    }

    pub fn is_muted(&self) -> Result<bool> {
        self.rendering_control().get_mute()
    }

    pub fn set_muted(&self, muted: bool) -> Result<()> {
        self.rendering_control().set_mute(muted)
    }

    // Device sugar

    /// The zone name the device reports.
    pub fn zone_name(&self) -> Result<String> {
        let response = self.device_properties().get_zone_attributes()?;
        Ok(response.field("CurrentZoneName").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_the_conventional_control_port() {
        let device = Device::new("10.0.0.7");
        assert_eq!(device.host(), "10.0.0.7");
        assert_eq!(device.port(), 1400);
    }

    #[test]
    fn with_port_overrides_it() {
        let device = Device::with_port("10.0.0.7", 1401);
        assert_eq!(device.port(), 1401);
    }
}
