//! DIDL-Lite metadata extraction for "now playing" and browse results.
//!
//! DIDL-Lite documents arrive XML-escaped inside response fields
//! (`TrackMetaData`, browse `Result`). The SOAP decoder already unescapes
//! one level, so what reaches this module is the plain document.

use serde::Deserialize;

use crate::error::{ApiError, Result};

/// Metadata describing one media item or container from a DIDL-Lite document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    /// Object id within the content hierarchy
    pub id: String,
    /// `dc:title`
    pub title: Option<String>,
    /// `dc:creator`
    pub artist: Option<String>,
    /// `upnp:album`
    pub album: Option<String>,
    /// `upnp:albumArtURI`
    pub album_art_uri: Option<String>,
    /// `upnp:class`, e.g. `object.item.audioItem.musicTrack`
    pub class: Option<String>,
    /// Resource URI of the item
    pub uri: Option<String>,
    /// Resource duration as reported (`H:MM:SS`), no unit conversion
    pub duration: Option<String>,
}

/// The playing position of a device, combining transport state fields with
/// the decoded track metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    /// 1-based position in the queue, 0 when nothing is queued
    pub queue_position: u32,
    /// Transport URI of the current track
    pub uri: Option<String>,
    /// Total duration as reported (`H:MM:SS`)
    pub duration: Option<String>,
    /// Elapsed time as reported (`H:MM:SS`)
    pub position: Option<String>,
    /// Decoded DIDL-Lite metadata, when the device supplies any
    pub metadata: Option<TrackMetadata>,
}

#[derive(Debug, Deserialize)]
struct DidlLite {
    #[serde(rename = "item", default)]
    items: Vec<DidlObject>,
    #[serde(rename = "container", default)]
    containers: Vec<DidlObject>,
}

#[derive(Debug, Deserialize)]
struct DidlObject {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "dc:title")]
    title: Option<String>,
    #[serde(rename = "dc:creator")]
    creator: Option<String>,
    #[serde(rename = "upnp:album")]
    album: Option<String>,
    #[serde(rename = "upnp:albumArtURI")]
    album_art_uri: Option<String>,
    #[serde(rename = "upnp:class")]
    class: Option<String>,
    res: Option<DidlRes>,
}

#[derive(Debug, Deserialize)]
struct DidlRes {
    #[serde(rename = "@duration")]
    duration: Option<String>,
    #[serde(rename = "$text")]
    uri: Option<String>,
}

impl From<DidlObject> for TrackMetadata {
    fn from(object: DidlObject) -> Self {
        let (uri, duration) = match object.res {
            Some(res) => (res.uri, res.duration),
            None => (None, None),
        };
        TrackMetadata {
            id: object.id,
            title: object.title,
            artist: object.creator,
            album: object.album,
            album_art_uri: object.album_art_uri,
            class: object.class,
            uri,
            duration,
        }
    }
}

/// Parse a DIDL-Lite document into its items and containers, in document
/// order (items first).
///
/// Empty input and the `NOT_IMPLEMENTED` placeholder some devices send
/// yield an empty list rather than an error.
pub fn parse_didl(xml: &str) -> Result<Vec<TrackMetadata>> {
    let xml = xml.trim();
    if xml.is_empty() || xml == "NOT_IMPLEMENTED" {
        return Ok(Vec::new());
    }

    let didl: DidlLite = quick_xml::de::from_str(xml)
        .map_err(|e| ApiError::Parse(format!("DIDL-Lite: {e}")))?;

    Ok(didl
        .items
        .into_iter()
        .chain(didl.containers)
        .map(TrackMetadata::from)
        .collect())
}
