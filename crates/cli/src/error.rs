//! CLI error types.

use fetch::FetchError;
use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The fetch completed with a classified failure.
    #[error("{}: {}", .0.kind(), .0)]
    Fetch(FetchError),

    /// The client could not be set up.
    #[error(transparent)]
    Library(#[from] fetch::Error),

    /// Configuration is invalid or missing required fields.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The payload could not be rendered as JSON.
    #[error("failed to render payload: {0}")]
    Render(#[from] serde_json::Error),

    /// Writing the result failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<FetchError> for Error {
    fn from(error: FetchError) -> Self {
        Self::Fetch(error)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
