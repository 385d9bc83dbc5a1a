//! Error types for SOAP action invocation.

use thiserror::Error;

/// Errors that can occur while invoking a UPnP action.
#[derive(Debug, Error)]
pub enum SoapError {
    /// The request was rejected before any network traffic (empty host or path)
    #[error("invalid request: {0}")]
    InvalidInput(String),

    /// The response body was not well-formed XML
    #[error("XML parse error: {0}")]
    Parse(String),

    /// Well-formed XML missing the expected envelope/body/response structure
    #[error("malformed SOAP response: {0}")]
    Protocol(String),

    /// The device reported an application-level SOAP fault
    #[error("device fault {error_code}: {fault_string}")]
    Fault {
        /// The `faultstring` element of the fault
        fault_string: String,
        /// The `detail/UPnPError/errorCode` element of the fault
        error_code: String,
    },

    /// The device answered with a non-200 HTTP status
    #[error("HTTP status {0}")]
    Status(u16),

    /// Network-level failure (connection refused, timeout, DNS)
    #[error("network error: {0}")]
    Network(String),
}
