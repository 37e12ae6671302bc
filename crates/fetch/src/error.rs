use thiserror::Error;

/// Setup errors raised while building clients, calls, and executors.
///
/// Failures of an individual fetch are never reported through this type;
/// they are classified into a [`FetchError`](crate::FetchError) and handed
/// to the failure callback.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("no tokio runtime available to drive requests")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, Error>;
