//! Audio catalog error types.

use thiserror::Error;

/// Audio catalog error type.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("pactl error: {0}")]
    Pactl(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for audio catalog operations.
pub type AudioResult<T> = Result<T, AudioError>;
