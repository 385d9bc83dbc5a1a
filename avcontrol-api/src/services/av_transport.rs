//! AVTransport: playback, seeking, and queue manipulation.

use soap_client::{ActionParams, ActionResponse};

use crate::error::Result;
use crate::proxy::ServiceProxy;
use crate::services::parse_field;

/// Proxy for the `AVTransport` service.
///
/// Every action implicitly carries `InstanceID=0` via the service defaults.
#[derive(Debug, Clone)]
pub struct AvTransport {
    proxy: ServiceProxy,
}

impl AvTransport {
    pub(crate) fn new(proxy: ServiceProxy) -> Self {
        Self { proxy }
    }

    /// Point the transport at a URI. `metadata` is the DIDL-Lite document
    /// describing the item, or `""` when none is needed.
    pub fn set_av_transport_uri(&self, uri: &str, metadata: &str) -> Result<()> {
        self.proxy
            .action(
                "SetAVTransportURI",
                ActionParams::new()
                    .with("CurrentURI", uri)
                    .with("CurrentURIMetaData", metadata),
            )
            .map(drop)
    }

    pub fn play(&self) -> Result<()> {
        self.proxy
            .action("Play", ActionParams::new().with("Speed", "1"))
            .map(drop)
    }

    pub fn pause(&self) -> Result<()> {
        self.proxy.action("Pause", ActionParams::new()).map(drop)
    }

    pub fn stop(&self) -> Result<()> {
        self.proxy.action("Stop", ActionParams::new()).map(drop)
    }

    pub fn next(&self) -> Result<()> {
        self.proxy.action("Next", ActionParams::new()).map(drop)
    }

    pub fn previous(&self) -> Result<()> {
        self.proxy.action("Previous", ActionParams::new()).map(drop)
    }

    /// Seek within the current track or queue. `unit` is `REL_TIME`,
    /// `TRACK_NR`, or `TIME_DELTA`; `target` uses the unit's encoding.
    pub fn seek(&self, unit: &str, target: &str) -> Result<()> {
        self.proxy
            .action(
                "Seek",
                ActionParams::new().with("Unit", unit).with("Target", target),
            )
            .map(drop)
    }

    /// Set the play mode, e.g. `NORMAL`, `REPEAT_ALL`, `SHUFFLE`.
    pub fn set_play_mode(&self, mode: &str) -> Result<()> {
        self.proxy
            .action("SetPlayMode", ActionParams::new().with("NewPlayMode", mode))
            .map(drop)
    }

    /// Append a URI to the queue. Returns the queue position the track was
    /// enqueued at.
    pub fn add_uri_to_queue(
        &self,
        uri: &str,
        metadata: &str,
        desired_first_track: u32,
        enqueue_as_next: bool,
    ) -> Result<u32> {
        let response = self.proxy.action(
            "AddURIToQueue",
            ActionParams::new()
                .with("EnqueuedURI", uri)
                .with("EnqueuedURIMetaData", metadata)
                .with("DesiredFirstTrackNumberEnqueued", desired_first_track.to_string())
                .with("EnqueueAsNext", if enqueue_as_next { "1" } else { "0" }),
        )?;
        parse_field(&response, "FirstTrackNumberEnqueued")
    }

    /// Remove one queue entry by object id, e.g. `Q:0/5`.
    pub fn remove_track_from_queue(&self, object_id: &str) -> Result<()> {
        self.proxy
            .action(
                "RemoveTrackFromQueue",
                ActionParams::new().with("ObjectID", object_id),
            )
            .map(drop)
    }

    /// Clear the queue.
    pub fn remove_all_tracks_from_queue(&self) -> Result<()> {
        self.proxy
            .action("RemoveAllTracksFromQueue", ActionParams::new())
            .map(drop)
    }

    /// Save the current queue as a named playlist.
    pub fn save_queue(&self, title: &str) -> Result<()> {
        self.proxy
            .action(
                "SaveQueue",
                ActionParams::new().with("Title", title).with("ObjectID", ""),
            )
            .map(drop)
    }

    /// Move a contiguous range of queue tracks to a new position.
    pub fn reorder_tracks_in_queue(
        &self,
        starting_index: u32,
        number_of_tracks: u32,
        insert_before: u32,
    ) -> Result<()> {
        self.proxy
            .action(
                "ReorderTracksInQueue",
                ActionParams::new()
                    .with("StartingIndex", starting_index.to_string())
                    .with("NumberOfTracks", number_of_tracks.to_string())
                    .with("InsertBefore", insert_before.to_string()),
            )
            .map(drop)
    }

    /// Transport state, status, and speed.
    pub fn get_transport_info(&self) -> Result<ActionResponse> {
        self.proxy.action("GetTransportInfo", ActionParams::new())
    }

    /// Current track number, URI, metadata, duration, and elapsed time.
    pub fn get_position_info(&self) -> Result<ActionResponse> {
        self.proxy.action("GetPositionInfo", ActionParams::new())
    }

    /// Current media URI and track count.
    pub fn get_media_info(&self) -> Result<ActionResponse> {
        self.proxy.action("GetMediaInfo", ActionParams::new())
    }

    /// Actions the transport currently accepts, comma-separated.
    pub fn get_current_transport_actions(&self) -> Result<ActionResponse> {
        self.proxy
            .action("GetCurrentTransportActions", ActionParams::new())
    }

    /// Leave any group and become a standalone coordinator.
    pub fn become_coordinator_of_standalone_group(&self) -> Result<()> {
        self.proxy
            .action("BecomeCoordinatorOfStandaloneGroup", ActionParams::new())
            .map(drop)
    }
}
