//! Typed per-service action surfaces.
//!
//! Each module wraps a [`ServiceProxy`](crate::ServiceProxy) with named
//! methods, one per remote action. Methods are pass-throughs: they build
//! the parameter list, invoke the action, and at most pull a single value
//! out of the response. Anything richer belongs to callers.

mod av_transport;
mod content_directory;
mod device_properties;
mod rendering_control;

pub use av_transport::AvTransport;
pub use content_directory::{BrowseResponse, ContentDirectory};
pub use device_properties::DeviceProperties;
pub use rendering_control::RenderingControl;

use std::str::FromStr;

use soap_client::ActionResponse;

use crate::error::{ApiError, Result};

/// Extract a required response field and parse it.
pub(crate) fn parse_field<T>(response: &ActionResponse, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = response
        .fields
        .get(key)
        .ok_or_else(|| ApiError::Protocol(format!("missing {key} in {}", response.tag)))?;
    value
        .parse()
        .map_err(|e| ApiError::Parse(format!("{key} value {value:?}: {e}")))
}

/// Extract a required boolean field encoded as `1`/`0`.
pub(crate) fn parse_bool_field(response: &ActionResponse, key: &str) -> Result<bool> {
    let value: u8 = parse_field(response, key)?;
    Ok(value != 0)
}
