//! A50 base station detection and status queries.

use std::time::Duration;

use tracing::{debug, info, warn};

use dockwatch_core::{HeadsetStatus, StatusReader};

use crate::error::{UsbError, UsbResult};

/// Astro Gaming USB Vendor ID
pub const ASTRO_VID: u16 = 0x9886;
/// A50 gen-4 base station Product ID
pub const A50_PID: u16 = 0x002c;
/// Vendor-specific control interface
const CONTROL_INTERFACE: u8 = 5;
/// Vendor request for the headset status report
const STATUS_REQUEST: u8 = 0x02;
/// Bound on each control transfer so a wedged device cannot stall a tick
const CONTROL_TIMEOUT: Duration = Duration::from_millis(500);

/// Status report flags
const FLAG_DOCKED: u8 = 0x01;
const FLAG_POWERED: u8 = 0x01;

/// A long-lived handle to a connected A50 base station.
pub struct BaseStation {
    handle: rusb::DeviceHandle<rusb::GlobalContext>,
    serial: String,
}

impl BaseStation {
    /// Attempt to find and open the base station.
    ///
    /// Returns `Ok(None)` if no matching device is plugged in; that is the
    /// normal "dock unplugged" situation, not an error.
    ///
    /// # Errors
    /// Returns an error if enumeration fails or a matching device cannot be
    /// opened (typically missing udev permissions).
    pub fn open(vendor_id: u16, product_id: u16) -> UsbResult<Option<Self>> {
        let devices = rusb::devices()?;

        for device in devices.iter() {
            let Ok(desc) = device.device_descriptor() else {
                continue;
            };
            if desc.vendor_id() != vendor_id || desc.product_id() != product_id {
                continue;
            }

            let mut handle = device.open().map_err(|e| match e {
                rusb::Error::Access => UsbError::PermissionDenied,
                other => UsbError::UsbError(other),
            })?;

            // Not supported on every platform; the claim below still works
            // where detaching is a no-op.
            let _ = handle.set_auto_detach_kernel_driver(true);
            handle.claim_interface(CONTROL_INTERFACE)?;

            let serial = Self::read_serial(&handle, &desc).unwrap_or_else(|| "unknown".to_string());

            info!(
                serial = %serial,
                bus = device.bus_number(),
                address = device.address(),
                "A50 base station opened"
            );

            return Ok(Some(Self { handle, serial }));
        }

        debug!("No A50 base station found");
        Ok(None)
    }

    fn read_serial(
        handle: &rusb::DeviceHandle<rusb::GlobalContext>,
        desc: &rusb::DeviceDescriptor,
    ) -> Option<String> {
        if desc.serial_number_string_index().is_some() {
            handle.read_serial_number_string_ascii(desc).ok()
        } else {
            None
        }
    }

    /// Base station serial number.
    #[must_use]
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Query the headset status via a vendor control read.
    ///
    /// # Errors
    /// Returns an error on any USB failure or a short/garbled report; the
    /// caller is expected to drop the handle and reconnect later.
    pub fn read_status(&self) -> UsbResult<HeadsetStatus> {
        let request_type = rusb::request_type(
            rusb::Direction::In,
            rusb::RequestType::Vendor,
            rusb::Recipient::Interface,
        );

        let mut report = [0u8; 2];
        let len = self.handle.read_control(
            request_type,
            STATUS_REQUEST,
            0,
            u16::from(CONTROL_INTERFACE),
            &mut report,
            CONTROL_TIMEOUT,
        )?;

        if len < report.len() {
            return Err(UsbError::ProtocolError(format!(
                "short status report: {len} bytes"
            )));
        }

        Ok(parse_status(report[0], report[1]))
    }
}

/// Decode the two status-report flag bytes.
///
/// Docked wins over powered: a headset charging on the dock reports both
/// flags, and it is not being worn.
fn parse_status(docked: u8, powered: u8) -> HeadsetStatus {
    if docked & FLAG_DOCKED != 0 {
        HeadsetStatus::Docked
    } else if powered & FLAG_POWERED != 0 {
        HeadsetStatus::Active
    } else {
        // Off the dock but powered down; inactive-equivalent.
        HeadsetStatus::Docked
    }
}

/// Verify the USB stack is usable at all.
///
/// Returns whether the base station is currently present. Used at daemon
/// startup: an enumeration failure is fatal, an absent dock is not.
///
/// # Errors
/// Returns an error if USB enumeration itself fails.
pub fn probe_usb_stack(vendor_id: u16, product_id: u16) -> UsbResult<bool> {
    let devices = rusb::devices()?;

    for device in devices.iter() {
        if let Ok(desc) = device.device_descriptor()
            && desc.vendor_id() == vendor_id
            && desc.product_id() == product_id
        {
            return Ok(true);
        }
    }

    Ok(false)
}

/// [`StatusReader`] backed by the base station, reconnecting lazily.
///
/// All I/O failures are absorbed here and surface as
/// [`HeadsetStatus::Unavailable`]; the read path never returns an error to
/// the engine. On a failed read the handle is dropped so the kernel driver
/// can reattach, and the next poll retries the connection.
pub struct A50StatusReader {
    vendor_id: u16,
    product_id: u16,
    station: Option<BaseStation>,
}

impl A50StatusReader {
    #[must_use]
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self { vendor_id, product_id, station: None }
    }

    /// Whether a base station handle is currently held.
    #[must_use]
    pub fn connected(&self) -> bool {
        self.station.is_some()
    }

    fn connect(&mut self) {
        match BaseStation::open(self.vendor_id, self.product_id) {
            Ok(Some(station)) => {
                info!(serial = %station.serial(), "Base station connected");
                self.station = Some(station);
            }
            Ok(None) => {}
            Err(e) => {
                debug!(error = %e, "Base station connection attempt failed");
            }
        }
    }
}

impl StatusReader for A50StatusReader {
    fn read_status(&mut self) -> HeadsetStatus {
        if self.station.is_none() {
            self.connect();
        }
        let Some(station) = &self.station else {
            return HeadsetStatus::Unavailable;
        };

        match station.read_status() {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Base station read failed; dropping handle");
                self.station = None;
                HeadsetStatus::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docked_flag_wins() {
        assert_eq!(parse_status(0x01, 0x01), HeadsetStatus::Docked);
        assert_eq!(parse_status(0x01, 0x00), HeadsetStatus::Docked);
    }

    #[test]
    fn test_powered_off_dock_is_active() {
        assert_eq!(parse_status(0x00, 0x01), HeadsetStatus::Active);
    }

    #[test]
    fn test_powered_off_is_inactive_equivalent() {
        assert_eq!(parse_status(0x00, 0x00), HeadsetStatus::Docked);
    }

    #[test]
    fn test_only_low_bit_is_significant() {
        assert_eq!(parse_status(0xfe, 0x01), HeadsetStatus::Active);
        assert_eq!(parse_status(0x03, 0x00), HeadsetStatus::Docked);
    }
}
