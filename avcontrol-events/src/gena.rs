//! Outbound GENA requests: SUBSCRIBE, renewal, UNSUBSCRIBE.

use std::time::Duration;

use reqwest::{Method, Response};
use thiserror::Error;

/// Timeout requested from devices on every subscribe/renew.
pub(crate) const REQUESTED_TIMEOUT: &str = "Second-3600";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome classification for GENA exchanges.
#[derive(Debug, Error)]
pub(crate) enum GenaError {
    /// HTTP 412: the device no longer knows the subscription
    #[error("device has forgotten the subscription (HTTP 412)")]
    Gone,

    /// Any other non-200 status
    #[error("HTTP status {0}")]
    Status(u16),

    /// Network-level failure
    #[error("network error: {0}")]
    Network(String),

    /// 200 response without the mandatory `SID` header
    #[error("missing SID header in SUBSCRIBE response")]
    MissingSid,
}

/// Successful SUBSCRIBE exchange: the device-assigned subscription id and
/// the granted timeout header, verbatim.
#[derive(Debug, Clone)]
pub(crate) struct SubscribeResponse {
    pub sid: String,
    pub timeout: Option<String>,
}

fn subscribe_method() -> Method {
    Method::from_bytes(b"SUBSCRIBE").expect("SUBSCRIBE is a valid method token")
}

fn unsubscribe_method() -> Method {
    Method::from_bytes(b"UNSUBSCRIBE").expect("UNSUBSCRIBE is a valid method token")
}

fn header_string(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn status_error(code: u16) -> GenaError {
    if code == 412 {
        GenaError::Gone
    } else {
        GenaError::Status(code)
    }
}

/// Thin async client for a device's event subscription endpoints.
#[derive(Debug, Clone, Default)]
pub(crate) struct GenaClient {
    http: reqwest::Client,
}

impl GenaClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial SUBSCRIBE: registers `callback_url` for notifications.
    pub async fn subscribe(
        &self,
        url: &str,
        callback_url: &str,
    ) -> Result<SubscribeResponse, GenaError> {
        let response = self
            .http
            .request(subscribe_method(), url)
            .header("CALLBACK", format!("<{callback_url}>"))
            .header("NT", "upnp:event")
            .header("TIMEOUT", REQUESTED_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| GenaError::Network(e.to_string()))?;

        match response.status().as_u16() {
            200 => {
                let sid = header_string(&response, "sid").ok_or(GenaError::MissingSid)?;
                let timeout = header_string(&response, "timeout");
                Ok(SubscribeResponse { sid, timeout })
            }
            code => Err(status_error(code)),
        }
    }

    /// Renewal: SUBSCRIBE with `SID` and `TIMEOUT`, no `CALLBACK`/`NT`.
    ///
    /// Returns the granted timeout header on success.
    pub async fn renew(&self, url: &str, sid: &str) -> Result<Option<String>, GenaError> {
        let response = self
            .http
            .request(subscribe_method(), url)
            .header("SID", sid)
            .header("TIMEOUT", REQUESTED_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| GenaError::Network(e.to_string()))?;

        match response.status().as_u16() {
            200 => Ok(header_string(&response, "timeout")),
            code => Err(status_error(code)),
        }
    }

    /// UNSUBSCRIBE with `SID`.
    pub async fn unsubscribe(&self, url: &str, sid: &str) -> Result<(), GenaError> {
        let response = self
            .http
            .request(unsubscribe_method(), url)
            .header("SID", sid)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| GenaError::Network(e.to_string()))?;

        match response.status().as_u16() {
            200 => Ok(()),
            code => Err(status_error(code)),
        }
    }
}
