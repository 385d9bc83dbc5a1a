//! RenderingControl: volume, mute, and EQ.

use soap_client::ActionParams;

use crate::error::Result;
use crate::proxy::ServiceProxy;
use crate::services::{parse_bool_field, parse_field};

/// Proxy for the `RenderingControl` service.
///
/// Every action implicitly carries `InstanceID=0, Channel=Master`; pass an
/// explicit `Channel` through the generic proxy for per-channel control.
#[derive(Debug, Clone)]
pub struct RenderingControl {
    proxy: ServiceProxy,
}

impl RenderingControl {
    pub(crate) fn new(proxy: ServiceProxy) -> Self {
        Self { proxy }
    }

    /// Current volume, 0–100.
    pub fn get_volume(&self) -> Result<u16> {
        let response = self.proxy.action("GetVolume", ActionParams::new())?;
        parse_field(&response, "CurrentVolume")
    }

    pub fn set_volume(&self, volume: u16) -> Result<()> {
        self.proxy
            .action(
                "SetVolume",
                ActionParams::new().with("DesiredVolume", volume.to_string()),
            )
            .map(drop)
    }

    /// Adjust volume by a signed delta; returns the resulting volume.
    pub fn set_relative_volume(&self, adjustment: i32) -> Result<u16> {
        let response = self.proxy.action(
            "SetRelativeVolume",
            ActionParams::new().with("Adjustment", adjustment.to_string()),
        )?;
        parse_field(&response, "NewVolume")
    }

    pub fn get_mute(&self) -> Result<bool> {
        let response = self.proxy.action("GetMute", ActionParams::new())?;
        parse_bool_field(&response, "CurrentMute")
    }

    pub fn set_mute(&self, mute: bool) -> Result<()> {
        self.proxy
            .action(
                "SetMute",
                ActionParams::new().with("DesiredMute", if mute { "1" } else { "0" }),
            )
            .map(drop)
    }

    /// Bass level, -10–10.
    pub fn get_bass(&self) -> Result<i16> {
        let response = self.proxy.action("GetBass", ActionParams::new())?;
        parse_field(&response, "CurrentBass")
    }

    pub fn set_bass(&self, bass: i16) -> Result<()> {
        self.proxy
            .action(
                "SetBass",
                ActionParams::new().with("DesiredBass", bass.to_string()),
            )
            .map(drop)
    }

    /// Treble level, -10–10.
    pub fn get_treble(&self) -> Result<i16> {
        let response = self.proxy.action("GetTreble", ActionParams::new())?;
        parse_field(&response, "CurrentTreble")
    }

    pub fn set_treble(&self, treble: i16) -> Result<()> {
        self.proxy
            .action(
                "SetTreble",
                ActionParams::new().with("DesiredTreble", treble.to_string()),
            )
            .map(drop)
    }

    pub fn get_loudness(&self) -> Result<bool> {
        let response = self.proxy.action("GetLoudness", ActionParams::new())?;
        parse_bool_field(&response, "CurrentLoudness")
    }

    pub fn set_loudness(&self, loudness: bool) -> Result<()> {
        self.proxy
            .action(
                "SetLoudness",
                ActionParams::new().with("DesiredLoudness", if loudness { "1" } else { "0" }),
            )
            .map(drop)
    }
}
