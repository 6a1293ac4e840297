//! Dockwatch Core - Headset state tracking and audio routing decisions.
//!
//! This crate contains the hardware-free domain logic: the debounced headset
//! state machine, the priority-based device selector, and the routing engine
//! that drives both through narrow collaborator traits.

pub mod device;
pub mod engine;
pub mod error;
pub mod monitor;
pub mod reading;
pub mod selector;

pub use device::{AudioDevice, DeviceCategory, Direction};
pub use engine::{DeviceCatalog, RoutingEngine, SkipReason, StatusReader, TickOutcome};
pub use error::{Error, Result};
pub use monitor::{HeadsetMonitor, MonitorConfig};
pub use reading::{HeadsetReading, HeadsetState, HeadsetStatus};
pub use selector::{NoEligibleDevice, RoutingDecision, select};
