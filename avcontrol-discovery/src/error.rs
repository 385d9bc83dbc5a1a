//! Error types for device discovery.

use thiserror::Error;

/// Failures during SSDP search or device-description fetches.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Socket or HTTP failure
    #[error("network error: {0}")]
    Network(String),

    /// SSDP response or description document could not be parsed
    #[error("parse error: {0}")]
    Parse(String),
}

/// Convenience alias for results carrying [`DiscoveryError`].
pub type Result<T> = std::result::Result<T, DiscoveryError>;
