//! USB error types.

use thiserror::Error;

/// USB error type.
#[derive(Debug, Error)]
pub enum UsbError {
    #[error("Permission denied - check udev rules")]
    PermissionDenied,

    #[error("USB error: {0}")]
    UsbError(#[from] rusb::Error),

    #[error("Protocol error: {0}")]
    ProtocolError(String),
}

/// Result type for USB operations.
pub type UsbResult<T> = Result<T, UsbError>;
