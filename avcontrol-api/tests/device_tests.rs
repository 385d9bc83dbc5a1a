//! Device-level tests against a mock renderer.

use avcontrol_api::{ApiError, Device};

fn device_for(server: &mockito::ServerGuard) -> Device {
    let host_with_port = server.host_with_port();
    let (host, port) = host_with_port.split_once(':').unwrap();
    Device::with_port(host, port.parse().unwrap())
}

fn envelope(body: &str) -> String {
    format!(
        r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body>{body}</s:Body></s:Envelope>"#
    )
}

#[test]
fn get_volume_parses_the_current_volume() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/MediaRenderer/RenderingControl/Control")
        .match_header(
            "soapaction",
            "\"urn:schemas-upnp-org:service:RenderingControl:1#GetVolume\"",
        )
        .with_status(200)
        .with_body(envelope(
            r#"<u:GetVolumeResponse xmlns:u="urn:schemas-upnp-org:service:RenderingControl:1"><CurrentVolume>25</CurrentVolume></u:GetVolumeResponse>"#,
        ))
        .create();

    assert_eq!(device_for(&server).get_volume().unwrap(), 25);
}

#[test]
fn transport_state_reads_the_transport_info_field() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/MediaRenderer/AVTransport/Control")
        .with_status(200)
        .with_body(envelope(
            r#"<u:GetTransportInfoResponse xmlns:u="urn:schemas-upnp-org:service:AVTransport:1"><CurrentTransportState>PLAYING</CurrentTransportState><CurrentTransportStatus>OK</CurrentTransportStatus><CurrentSpeed>1</CurrentSpeed></u:GetTransportInfoResponse>"#,
        ))
        .create();

    assert_eq!(device_for(&server).transport_state().unwrap(), "PLAYING");
}

#[test]
fn current_track_decodes_position_and_metadata() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/MediaRenderer/AVTransport/Control")
        .with_status(200)
        .with_body(envelope(
            r#"<u:GetPositionInfoResponse xmlns:u="urn:schemas-upnp-org:service:AVTransport:1"><Track>3</Track><TrackDuration>0:03:57</TrackDuration><TrackMetaData>&lt;DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/"&gt;&lt;item id="Q:0/3"&gt;&lt;dc:title&gt;Fake Empire&lt;/dc:title&gt;&lt;/item&gt;&lt;/DIDL-Lite&gt;</TrackMetaData><TrackURI>http://10.0.0.5/track.mp3</TrackURI><RelTime>0:01:10</RelTime><AbsTime>NOT_IMPLEMENTED</AbsTime></u:GetPositionInfoResponse>"#,
        ))
        .create();

    let track = device_for(&server).current_track().unwrap();
    assert_eq!(track.queue_position, 3);
    assert_eq!(track.duration.as_deref(), Some("0:03:57"));
    assert_eq!(track.position.as_deref(), Some("0:01:10"));
    assert_eq!(track.uri.as_deref(), Some("http://10.0.0.5/track.mp3"));
    let metadata = track.metadata.expect("metadata decoded");
    assert_eq!(metadata.title.as_deref(), Some("Fake Empire"));
}

#[test]
fn get_queue_decodes_browse_results() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/MediaServer/ContentDirectory/Control")
        .match_body(mockito::Matcher::Regex(
            "<ObjectID>Q:0</ObjectID><BrowseFlag>BrowseDirectChildren</BrowseFlag>".to_string(),
        ))
        .with_status(200)
        .with_body(envelope(
            r#"<u:BrowseResponse xmlns:u="urn:schemas-upnp-org:service:ContentDirectory:1"><Result>&lt;DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/"&gt;&lt;item id="Q:0/1"&gt;&lt;dc:title&gt;One&lt;/dc:title&gt;&lt;/item&gt;&lt;item id="Q:0/2"&gt;&lt;dc:title&gt;Two&lt;/dc:title&gt;&lt;/item&gt;&lt;/DIDL-Lite&gt;</Result><NumberReturned>2</NumberReturned><TotalMatches>2</TotalMatches><UpdateID>7</UpdateID></u:BrowseResponse>"#,
        ))
        .create();

    let queue = device_for(&server).get_queue(0, 0).unwrap();
    assert_eq!(queue.number_returned, 2);
    assert_eq!(queue.total_matches, 2);
    assert_eq!(queue.items.len(), 2);
    assert_eq!(queue.items[0].title.as_deref(), Some("One"));
    assert_eq!(queue.items[1].title.as_deref(), Some("Two"));
}

#[test]
fn device_faults_surface_as_typed_errors() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/MediaRenderer/AVTransport/Control")
        .with_status(200)
        .with_body(envelope(
            r#"<s:Fault><faultcode>s:Client</faultcode><faultstring>UPnPError</faultstring><detail><UPnPError xmlns="urn:schemas-upnp-org:control-1-0"><errorCode>701</errorCode></UPnPError></detail></s:Fault>"#,
        ))
        .create();

    match device_for(&server).play().unwrap_err() {
        ApiError::Fault { error_code, .. } => assert_eq!(error_code, "701"),
        other => panic!("expected fault, got {other:?}"),
    }
}
