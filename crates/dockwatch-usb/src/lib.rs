//! Dockwatch USB - Astro A50 base station integration.
//!
//! The base station exposes headset power/dock status over a vendor-specific
//! USB interface (not standard HID). This crate keeps one long-lived handle
//! to it and turns every failure mode into an `Unavailable` reading, so the
//! routing core never sees a USB error.

pub mod error;
pub mod station;

pub use error::{UsbError, UsbResult};
pub use station::{A50StatusReader, BaseStation, probe_usb_stack};
