//! Headset status samples and the debounced state they feed.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Instantaneous headset status as reported by the base station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadsetStatus {
    /// Headset is powered on and off the dock
    Active,
    /// Headset is sitting on the dock (or powered off)
    Docked,
    /// Base station could not be queried (unplugged, USB error)
    Unavailable,
}

/// One sample from the status reader.
///
/// Ephemeral: produced each poll, consumed by the state machine, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadsetReading {
    pub status: HeadsetStatus,
    pub at: Instant,
}

impl HeadsetReading {
    /// Create a reading stamped with the current time.
    #[must_use]
    pub fn now(status: HeadsetStatus) -> Self {
        Self { status, at: Instant::now() }
    }
}

/// Debounced belief about the headset, as maintained by [`crate::HeadsetMonitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadsetState {
    /// Headset is worn: route audio to it
    Active,
    /// Headset is docked, off, or was never seen: route to fallback devices
    Inactive,
}

impl Default for HeadsetState {
    fn default() -> Self {
        // Safe default: start in fallback-speaker mode until proven otherwise.
        Self::Inactive
    }
}
