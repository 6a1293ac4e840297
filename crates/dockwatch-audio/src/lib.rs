//! Dockwatch Audio - host audio device catalog.
//!
//! Enumerates sinks and sources by parsing `pactl list` output and applies
//! default-device changes with `pactl set-default-sink`/`set-default-source`.
//! Works against both PulseAudio and PipeWire (via pipewire-pulse).

pub mod catalog;
pub mod error;

pub use catalog::PactlCatalog;
pub use error::{AudioError, AudioResult};
