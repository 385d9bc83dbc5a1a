//! Service descriptors for the UPnP services exposed by media renderers.

use soap_client::ActionParams;

/// The UPnP services a media-renderer device exposes.
///
/// Each service is a named group of actions with a fixed control/event URL
/// pair on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Playback and queue control (play, pause, seek, queue manipulation)
    AVTransport,
    /// Audio rendering (volume, mute, EQ)
    RenderingControl,
    /// Device metadata (zone name, LED, hardware info)
    DeviceProperties,
    /// Media library and queue browsing
    ContentDirectory,
    /// Zone/group topology reporting
    ZoneGroupTopology,
    /// Alarm management
    AlarmClock,
    /// Music service account management
    MusicServices,
    /// Group membership operations
    GroupManagement,
    /// Line-in control
    AudioIn,
    /// System-level configuration storage
    SystemProperties,
}

/// Static endpoint and namespace information for one service.
///
/// Created once per [`Service`] variant; immutable for the lifetime of any
/// proxy built from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceInfo {
    /// Service name, e.g. `AVTransport`
    pub name: &'static str,
    /// XML namespace used in SOAP requests
    pub service_uri: &'static str,
    /// Control endpoint path on the device
    pub control_path: &'static str,
    /// Event subscription endpoint path
    pub event_path: &'static str,
    /// Service description document path
    pub scpd_path: &'static str,
}

impl Service {
    /// The service name as a string.
    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// Endpoint and namespace information for this service.
    pub fn info(&self) -> ServiceInfo {
        match self {
            Service::AVTransport => ServiceInfo {
                name: "AVTransport",
                service_uri: "urn:schemas-upnp-org:service:AVTransport:1",
                control_path: "/MediaRenderer/AVTransport/Control",
                event_path: "/MediaRenderer/AVTransport/Event",
                scpd_path: "/xml/AVTransport1.xml",
            },
            Service::RenderingControl => ServiceInfo {
                name: "RenderingControl",
                service_uri: "urn:schemas-upnp-org:service:RenderingControl:1",
                control_path: "/MediaRenderer/RenderingControl/Control",
                event_path: "/MediaRenderer/RenderingControl/Event",
                scpd_path: "/xml/RenderingControl1.xml",
            },
            Service::DeviceProperties => ServiceInfo {
                name: "DeviceProperties",
                service_uri: "urn:schemas-upnp-org:service:DeviceProperties:1",
                control_path: "/DeviceProperties/Control",
                event_path: "/DeviceProperties/Event",
                scpd_path: "/xml/DeviceProperties1.xml",
            },
            Service::ContentDirectory => ServiceInfo {
                name: "ContentDirectory",
                service_uri: "urn:schemas-upnp-org:service:ContentDirectory:1",
                control_path: "/MediaServer/ContentDirectory/Control",
                event_path: "/MediaServer/ContentDirectory/Event",
                scpd_path: "/xml/ContentDirectory1.xml",
            },
            Service::ZoneGroupTopology => ServiceInfo {
                name: "ZoneGroupTopology",
                service_uri: "urn:schemas-upnp-org:service:ZoneGroupTopology:1",
                control_path: "/ZoneGroupTopology/Control",
                event_path: "/ZoneGroupTopology/Event",
                scpd_path: "/xml/ZoneGroupTopology1.xml",
            },
            Service::AlarmClock => ServiceInfo {
                name: "AlarmClock",
                service_uri: "urn:schemas-upnp-org:service:AlarmClock:1",
                control_path: "/AlarmClock/Control",
                event_path: "/AlarmClock/Event",
                scpd_path: "/xml/AlarmClock1.xml",
            },
            Service::MusicServices => ServiceInfo {
                name: "MusicServices",
                service_uri: "urn:schemas-upnp-org:service:MusicServices:1",
                control_path: "/MusicServices/Control",
                event_path: "/MusicServices/Event",
                scpd_path: "/xml/MusicServices1.xml",
            },
            Service::GroupManagement => ServiceInfo {
                name: "GroupManagement",
                service_uri: "urn:schemas-upnp-org:service:GroupManagement:1",
                control_path: "/GroupManagement/Control",
                event_path: "/GroupManagement/Event",
                scpd_path: "/xml/GroupManagement1.xml",
            },
            Service::AudioIn => ServiceInfo {
                name: "AudioIn",
                service_uri: "urn:schemas-upnp-org:service:AudioIn:1",
                control_path: "/AudioIn/Control",
                event_path: "/AudioIn/Event",
                scpd_path: "/xml/AudioIn1.xml",
            },
            Service::SystemProperties => ServiceInfo {
                name: "SystemProperties",
                service_uri: "urn:schemas-upnp-org:service:SystemProperties:1",
                control_path: "/SystemProperties/Control",
                event_path: "/SystemProperties/Event",
                scpd_path: "/xml/SystemProperties1.xml",
            },
        }
    }

    /// The implicit parameters every action of this service carries.
    ///
    /// Merged under caller-supplied parameters by [`merge_params`]; callers
    /// win on key collision.
    pub fn default_params(&self) -> ActionParams {
        match self {
            Service::AVTransport => ActionParams::new().with("InstanceID", "0"),
            Service::RenderingControl => ActionParams::new()
                .with("InstanceID", "0")
                .with("Channel", "Master"),
            _ => ActionParams::new(),
        }
    }
}

/// Merge caller parameters over per-service defaults.
///
/// Defaults keep their position; a caller-supplied value for an existing
/// key replaces it in place, and novel keys append after the defaults.
pub fn merge_params(defaults: &ActionParams, overrides: &ActionParams) -> ActionParams {
    let mut merged = defaults.clone();
    for (key, value) in overrides.iter() {
        merged.set(key, value);
    }
    merged
}
