//! Renewal scheduling policy.

use std::time::Duration;

const RENEWAL_MARGIN_SECS: i64 = 15;
const MIN_RENEWAL_SECS: i64 = 15;
const MAX_RENEWAL_SECS: i64 = 300;
const DEFAULT_TIMEOUT_SECS: i64 = 3600;

/// How long to wait before renewing, given the device's `TIMEOUT` response
/// header (`Second-N`, default 3600 when absent or non-numeric).
///
/// Renews 15 s before the granted expiry, but never waits more than 300 s
/// between renewals regardless of a long grant — a device restart is then
/// noticed within five minutes via the 412 on the next renewal. Grants too
/// short for the margin clamp up to a 15 s floor.
pub(crate) fn renew_after(timeout_header: Option<&str>) -> Duration {
    let granted = timeout_header
        .map(|value| value.strip_prefix("Second-").unwrap_or(value))
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let mut seconds = granted - RENEWAL_MARGIN_SECS;
    if seconds < 0 {
        seconds = MIN_RENEWAL_SECS;
    } else if seconds > MAX_RENEWAL_SECS {
        seconds = MAX_RENEWAL_SECS;
    }

    Duration::from_secs(seconds as u64)
}
