//! Raw and classified outcomes of a call.

use reqwest::{StatusCode, Url};
use std::error::Error as StdError;
use thiserror::Error;

/// Classified outcome of one fetch: exactly one of a payload or an error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum FetchResult<R, E> {
    Success(R),
    Failure(E),
}

impl<R, E> FetchResult<R, E> {
    pub fn success(value: R) -> Self {
        Self::Success(value)
    }

    pub fn failure(error: E) -> Self {
        Self::Failure(error)
    }

    /// Consume the result, running exactly one of the two handlers.
    pub fn fold<T>(self, on_success: impl FnOnce(R) -> T, on_failure: impl FnOnce(E) -> T) -> T {
        match self {
            Self::Success(value) => on_success(value),
            Self::Failure(error) => on_failure(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn into_result(self) -> Result<R, E> {
        self.into()
    }
}

impl<R, E> From<FetchResult<R, E>> for Result<R, E> {
    fn from(result: FetchResult<R, E>) -> Self {
        match result {
            FetchResult::Success(value) => Ok(value),
            FetchResult::Failure(error) => Err(error),
        }
    }
}

impl<R, E> From<Result<R, E>> for FetchResult<R, E> {
    fn from(result: Result<R, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

/// A response delivered by the transport, before classification.
#[derive(Debug, Clone)]
pub struct RawResponse<R> {
    status: StatusCode,
    url: Option<Url>,
    body: Option<R>,
    error_body: Option<String>,
}

impl<R> RawResponse<R> {
    pub fn new(status: StatusCode, body: Option<R>) -> Self {
        Self {
            status,
            url: None,
            body,
            error_body: None,
        }
    }

    /// A `200 OK` response carrying `body`.
    pub fn ok(body: R) -> Self {
        Self::new(StatusCode::OK, Some(body))
    }

    /// A response with no decoded body.
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, None)
    }

    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    /// Attach the undecoded body text of an error response.
    pub fn with_error_body(mut self, text: impl Into<String>) -> Self {
        self.error_body = Some(text.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Whether the status is in the `2xx` range.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn body(&self) -> Option<&R> {
        self.body.as_ref()
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn error_body(&self) -> Option<&str> {
        self.error_body.as_deref()
    }

    pub fn take_body(&mut self) -> Option<R> {
        self.body.take()
    }
}

/// A failure below the HTTP layer: nothing usable was received.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The host name could not be resolved.
    ///
    /// Ambiguous: the device may be offline, or the request named a host
    /// that does not exist.
    #[error("host could not be resolved: {0}")]
    HostUnresolved(String),

    /// The response body could not be decoded into the expected payload.
    #[error("response body could not be decoded: {0}")]
    Undecodable(String),

    /// Any other transport failure (timeouts, refused connections, TLS, ...).
    #[error("transport failure: {0}")]
    Other(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

impl TransportError {
    pub fn other(error: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        Self::Other(error.into())
    }
}

/// What an executor hands back for a submitted call.
#[derive(Debug)]
pub enum RawOutcome<R> {
    Response(RawResponse<R>),
    Failure(TransportError),
}

impl<R> From<RawResponse<R>> for RawOutcome<R> {
    fn from(response: RawResponse<R>) -> Self {
        Self::Response(response)
    }
}

impl<R> From<TransportError> for RawOutcome<R> {
    fn from(error: TransportError) -> Self {
        Self::Failure(error)
    }
}
