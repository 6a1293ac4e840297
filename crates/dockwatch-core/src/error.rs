//! Error types for Dockwatch core.

use thiserror::Error;

/// Core error type, used at the collaborator trait boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("audio catalog error: {0}")]
    Catalog(String),
}

/// Result type alias for Dockwatch core operations.
pub type Result<T> = std::result::Result<T, Error>;
