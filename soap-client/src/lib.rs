//! Private SOAP client for UPnP media-renderer control.
//!
//! This crate performs one complete request/response exchange per action:
//! it serializes the action and its ordered parameters into a SOAP envelope,
//! POSTs it to the device's control endpoint, and decodes the response into
//! a field mapping — or a typed error. Retry policy, if any, belongs to the
//! caller; this layer never retries and never blocks beyond a single
//! round trip.

mod envelope;
mod error;
mod params;

pub use envelope::{decode_response, encode_request, ActionResponse};
pub use error::SoapError;
pub use params::ActionParams;

use std::time::Duration;

/// Conventional control port of media-renderer appliances.
pub const DEFAULT_CONTROL_PORT: u16 = 1400;

/// A minimal SOAP client for UPnP device communication.
#[derive(Debug, Clone)]
pub struct SoapClient {
    agent: ureq::Agent,
}

impl SoapClient {
    /// Create a new SOAP client with default timeouts.
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(Duration::from_secs(5))
                .timeout_read(Duration::from_secs(10))
                .build(),
        }
    }

    /// Invoke a named action against a device's control endpoint.
    ///
    /// Issues `POST http://{host}:{port}{control_path}` with the
    /// `SOAPACTION: "{service_uri}#{action}"` header. On HTTP 200 the body
    /// is decoded via [`decode_response`]; any other status maps to
    /// [`SoapError::Status`] without the body being read, and network-level
    /// failures map to [`SoapError::Network`].
    pub fn call(
        &self,
        host: &str,
        port: u16,
        control_path: &str,
        service_uri: &str,
        action: &str,
        params: &ActionParams,
    ) -> Result<ActionResponse, SoapError> {
        if host.is_empty() {
            return Err(SoapError::InvalidInput("host must not be empty".to_string()));
        }
        if control_path.is_empty() {
            return Err(SoapError::InvalidInput(
                "control path must not be empty".to_string(),
            ));
        }

        let body = encode_request(service_uri, action, params);
        let url = format!("http://{host}:{port}{control_path}");
        let soap_action = format!("\"{service_uri}#{action}\"");

        let response = match self
            .agent
            .post(&url)
            .set("SOAPACTION", &soap_action)
            .set("Content-Type", "text/xml; charset=utf8")
            .send_string(&body)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(SoapError::Status(code)),
            Err(ureq::Error::Transport(transport)) => {
                return Err(SoapError::Network(transport.to_string()))
            }
        };

        let text = response
            .into_string()
            .map_err(|e| SoapError::Network(e.to_string()))?;

        decode_response(&text, action)
    }
}

impl Default for SoapClient {
    fn default() -> Self {
        Self::new()
    }
}
