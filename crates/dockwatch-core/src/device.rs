//! Audio device model.

use serde::{Deserialize, Serialize};

/// Direction of an audio device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Sink (speakers, headphones)
    Output,
    /// Source (microphones)
    Input,
}

/// Coarse classification used purely for priority ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCategory {
    /// The A50 headset itself (sink or microphone)
    Headset,
    /// HDMI/DisplayPort audio through an attached display
    Hdmi,
    /// Built-in speaker or microphone array
    Internal,
    /// External analog device (3.5mm jack mic, line-in)
    External,
}

/// A candidate audio device from one catalog snapshot.
///
/// Snapshots are never cached across decision cycles; devices can appear and
/// disappear between ticks (monitor unplugged, dock removed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDevice {
    /// Stable node name, e.g. `alsa_output.pci-0000_c3_00.1.HiFi__HDMI1__sink`
    pub id: String,
    pub direction: Direction,
    pub category: DeviceCategory,
    /// Port-level availability. For HDMI this tracks whether a display is
    /// actually attached; other devices are reported always available.
    pub available: bool,
}

impl AudioDevice {
    /// Shorten a node name for log lines.
    ///
    /// `alsa_output.pci-0000_c3_00.1.HiFi__HDMI1__sink` becomes `HDMI1`,
    /// `alsa_output.pci-0000_00_1f.3.analog-stereo` becomes `analog-stereo`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        let parts: Vec<&str> = self.id.split("__").collect();
        if parts.len() >= 2 {
            return parts[1];
        }
        if let Some((_, tail)) = self.id.rsplit_once('.') {
            return tail;
        }
        &self.id
    }
}
