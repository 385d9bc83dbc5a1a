//! ContentDirectory: browsing the device's library and queue.

use soap_client::{ActionParams, ActionResponse};

use crate::error::Result;
use crate::proxy::ServiceProxy;
use crate::services::parse_field;
use crate::track::{parse_didl, TrackMetadata};

/// One page of browse results with the DIDL payload decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseResponse {
    /// Items and containers on this page, in document order
    pub items: Vec<TrackMetadata>,
    /// Number of objects returned on this page
    pub number_returned: u32,
    /// Total matching objects on the device
    pub total_matches: u32,
}

/// Proxy for the `ContentDirectory` service.
#[derive(Debug, Clone)]
pub struct ContentDirectory {
    proxy: ServiceProxy,
}

impl ContentDirectory {
    pub(crate) fn new(proxy: ServiceProxy) -> Self {
        Self { proxy }
    }

    /// Browse the children of an object, decoding the DIDL-Lite payload.
    ///
    /// `object_id` addresses the hierarchy (`Q:0` for the play queue,
    /// `A:ALBUM` for albums, …); `starting_index`/`requested_count` page
    /// through large containers (`0`, `0` fetches everything the device
    /// will give in one response).
    pub fn browse(
        &self,
        object_id: &str,
        starting_index: u32,
        requested_count: u32,
    ) -> Result<BrowseResponse> {
        let response = self.browse_raw(
            object_id,
            "BrowseDirectChildren",
            "*",
            starting_index,
            requested_count,
            "",
        )?;

        let items = parse_didl(response.field("Result"))?;
        Ok(BrowseResponse {
            items,
            number_returned: parse_field(&response, "NumberReturned")?,
            total_matches: parse_field(&response, "TotalMatches")?,
        })
    }

    /// Raw `Browse` invocation with every parameter exposed; the `Result`
    /// field keeps its DIDL-Lite payload undecoded.
    pub fn browse_raw(
        &self,
        object_id: &str,
        browse_flag: &str,
        filter: &str,
        starting_index: u32,
        requested_count: u32,
        sort_criteria: &str,
    ) -> Result<ActionResponse> {
        self.proxy.action(
            "Browse",
            ActionParams::new()
                .with("ObjectID", object_id)
                .with("BrowseFlag", browse_flag)
                .with("Filter", filter)
                .with("StartingIndex", starting_index.to_string())
                .with("RequestedCount", requested_count.to_string())
                .with("SortCriteria", sort_criteria),
        )
    }
}
