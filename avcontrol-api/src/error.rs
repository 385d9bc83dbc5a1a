//! Error taxonomy for device control operations.

use soap_client::SoapError;
use thiserror::Error;

/// Errors surfaced by device control operations.
///
/// Failures from the SOAP layer propagate unchanged in meaning; each
/// variant maps 1:1 onto the underlying exchange outcome.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure reaching the device
    #[error("network error: {0}")]
    Network(String),

    /// The device answered with a non-200 HTTP status
    #[error("HTTP status {0}")]
    Status(u16),

    /// The response body was not well-formed XML
    #[error("parse error: {0}")]
    Parse(String),

    /// Well-formed XML missing the expected SOAP structure
    #[error("malformed response: {0}")]
    Protocol(String),

    /// The device reported an application-level SOAP fault
    #[error("device fault {error_code}: {fault_string}")]
    Fault {
        /// `faultstring` from the fault element
        fault_string: String,
        /// `detail/UPnPError/errorCode` from the fault element
        error_code: String,
    },

    /// A parameter was rejected before any network traffic
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<SoapError> for ApiError {
    fn from(error: SoapError) -> Self {
        match error {
            SoapError::Network(msg) => ApiError::Network(msg),
            SoapError::Status(code) => ApiError::Status(code),
            SoapError::Parse(msg) => ApiError::Parse(msg),
            SoapError::Protocol(msg) => ApiError::Protocol(msg),
            SoapError::Fault {
                fault_string,
                error_code,
            } => ApiError::Fault {
                fault_string,
                error_code,
            },
            SoapError::InvalidInput(msg) => ApiError::InvalidParameter(msg),
        }
    }
}

/// Convenience alias for results carrying [`ApiError`].
pub type Result<T> = std::result::Result<T, ApiError>;
