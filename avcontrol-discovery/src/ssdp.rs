//! SSDP M-SEARCH client.
//!
//! Sends the multicast search datagram and iterates unicast responses
//! until the socket read timeout fires. Responses are HTTP-like header
//! blocks; only the headers needed to identify a renderer are extracted.

use std::net::UdpSocket;
use std::time::Duration;

use crate::error::{DiscoveryError, Result};

const SSDP_MULTICAST_ADDR: &str = "239.255.255.250:1900";

/// A parsed SSDP search response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SsdpResponse {
    pub location: String,
    pub usn: String,
    pub server: Option<String>,
}

/// One-shot SSDP search client.
pub(crate) struct SsdpClient {
    socket: UdpSocket,
}

impl SsdpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| DiscoveryError::Network(format!("failed to bind UDP socket: {e}")))?;
        socket
            .set_read_timeout(Some(timeout))
            .map_err(|e| DiscoveryError::Network(format!("failed to set read timeout: {e}")))?;
        socket
            .set_broadcast(true)
            .map_err(|e| DiscoveryError::Network(format!("failed to enable broadcast: {e}")))?;
        Ok(Self { socket })
    }

    /// Send an M-SEARCH for the given target to the multicast group and
    /// the broadcast address.
    pub fn search(&self, search_target: &str) -> Result<()> {
        let request = format!(
            "M-SEARCH * HTTP/1.1\r\n\
             HOST: 239.255.255.250:1900\r\n\
             MAN: \"ssdp:discover\"\r\n\
             MX: 2\r\n\
             ST: {search_target}\r\n\
             \r\n"
        );

        for addr in [SSDP_MULTICAST_ADDR, "255.255.255.255:1900"] {
            self.socket
                .send_to(request.as_bytes(), addr)
                .map_err(|e| DiscoveryError::Network(format!("failed to send M-SEARCH: {e}")))?;
        }

        Ok(())
    }

    /// Receive the next parseable response, or `None` once the read
    /// timeout fires (closing the collection window).
    pub fn recv_response(&self) -> Option<SsdpResponse> {
        let mut buffer = [0u8; 2048];
        loop {
            let size = match self.socket.recv_from(&mut buffer) {
                Ok((size, _)) => size,
                Err(_) => return None,
            };
            let Ok(text) = std::str::from_utf8(&buffer[..size]) else {
                continue;
            };
            if let Some(response) = parse_ssdp_response(text) {
                return Some(response);
            }
        }
    }
}

/// Parse an SSDP HTTP-like response block.
pub(crate) fn parse_ssdp_response(text: &str) -> Option<SsdpResponse> {
    let mut lines = text.lines();
    let status = lines.next()?;
    if !status.starts_with("HTTP/1.1 200") && !status.starts_with("HTTP/1.0 200") {
        return None;
    }

    let mut location = None;
    let mut usn = None;
    let mut server = None;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match name.trim().to_ascii_lowercase().as_str() {
            "location" => location = Some(value.to_string()),
            "usn" => usn = Some(value.to_string()),
            "server" => server = Some(value.to_string()),
            _ => {}
        }
    }

    Some(SsdpResponse {
        location: location?,
        usn: usn?,
        server,
    })
}

/// Split a `LOCATION` URL into host and port (port defaults to 80).
pub(crate) fn host_and_port_from_location(location: &str) -> Option<(String, u16)> {
    let rest = location.strip_prefix("http://")?;
    let authority = rest.split('/').next()?;
    match authority.split_once(':') {
        Some((host, port)) => Some((host.to_string(), port.parse().ok()?)),
        None => Some((authority.to_string(), 80)),
    }
}

/// Extract the model string from a `SERVER` header, e.g.
/// `Linux UPnP/1.0 Renderer/83.1 (Model S12)` yields `Model S12`.
pub(crate) fn model_from_server(server: &str) -> Option<String> {
    let start = server.find('(')?;
    let end = server[start..].find(')')? + start;
    let model = server[start + 1..end].trim();
    (!model.is_empty()).then(|| model.to_string())
}
