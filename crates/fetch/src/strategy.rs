//! Result classification.
//!
//! A [`ClassificationStrategy`] decides what a completed call means: a
//! success, or which error to report. [`StandardStrategy`] is the default
//! policy and maps into any error type that can be built from a
//! [`FetchError`].

use crate::{BadRequest, Call, FetchError, FetchErrorKind, NotFound, RawResponse, TransportError};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

// Longest rendering of a raw response kept in a `BadStatusCode` error.
const MAX_RAW_RESPONSE_CHARS: usize = 1024;

/// Reports whether the device currently has network access.
///
/// Only consulted to disambiguate host-resolution failures. It is called
/// synchronously from the executor's completion, which for
/// `ReqwestExecutor` is a tokio task, so an implementation that blocks
/// holds that worker for as long as it takes.
pub trait ConnectivityProbe: Send + Sync {
    fn has_network(&self) -> bool;
}

impl<F> ConnectivityProbe for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn has_network(&self) -> bool {
        self()
    }
}

/// Policy turning a raw outcome of call `C` into an error of type `E`.
pub trait ClassificationStrategy<C: Call, E>: Send + Sync {
    /// The transport failed before a response was received.
    fn from_transport_failure(&self, call: &C, error: &TransportError) -> E;

    /// A response arrived but carried no usable payload.
    fn from_missing_payload(&self, call: &C, response: &RawResponse<C::Output>) -> E;

    /// A response arrived with a payload. `None` means success.
    fn from_response(&self, call: &C, response: &RawResponse<C::Output>) -> Option<E>;
}

impl<C, E, S> ClassificationStrategy<C, E> for Arc<S>
where
    C: Call,
    S: ClassificationStrategy<C, E> + ?Sized,
{
    fn from_transport_failure(&self, call: &C, error: &TransportError) -> E {
        (**self).from_transport_failure(call, error)
    }

    fn from_missing_payload(&self, call: &C, response: &RawResponse<C::Output>) -> E {
        (**self).from_missing_payload(call, response)
    }

    fn from_response(&self, call: &C, response: &RawResponse<C::Output>) -> Option<E> {
        (**self).from_response(call, response)
    }
}

/// Default classification policy.
///
/// Transport failures:
/// - host unresolved: probe says online → `BadRequest.Encode`, offline →
///   `NotFound.MissingNetwork`, no probe → `Unknown`
/// - body undecodable → `BadRequest.Decode`
/// - anything else → `Unknown`
///
/// Responses without payload map to `NotFound.MissingData`; responses with a
/// non-success status map to `BadStatusCode`.
pub struct StandardStrategy<E = FetchError> {
    probe: Option<Arc<dyn ConnectivityProbe>>,
    error: PhantomData<fn() -> E>,
}

impl<E> StandardStrategy<E> {
    /// A strategy without connectivity probe.
    pub fn new() -> Self {
        Self::with_shared_probe(None)
    }

    pub fn with_probe(probe: impl ConnectivityProbe + 'static) -> Self {
        Self::with_shared_probe(Some(Arc::new(probe)))
    }

    pub fn with_shared_probe(probe: Option<Arc<dyn ConnectivityProbe>>) -> Self {
        Self {
            probe,
            error: PhantomData,
        }
    }

    pub fn has_probe(&self) -> bool {
        self.probe.is_some()
    }

    /// Extend `from_response` with a per-endpoint payload check.
    pub fn validate_with<F>(self, check: F) -> Validated<Self, F> {
        Validated::new(self, check)
    }

    /// Kind reported for a transport failure.
    pub fn transport_failure_kind(&self, error: &TransportError) -> FetchErrorKind {
        match error {
            TransportError::HostUnresolved(_) => match &self.probe {
                Some(probe) if probe.has_network() => FetchErrorKind::BadRequest(BadRequest::Encode),
                Some(_) => FetchErrorKind::NotFound(NotFound::MissingNetwork),
                // Offline and malformed host look the same without a probe.
                None => FetchErrorKind::Unknown,
            },
            TransportError::Undecodable(_) => FetchErrorKind::BadRequest(BadRequest::Decode),
            TransportError::Other(_) => FetchErrorKind::Unknown,
        }
    }
}

impl<E> Default for StandardStrategy<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for StandardStrategy<E> {
    fn clone(&self) -> Self {
        Self::with_shared_probe(self.probe.clone())
    }
}

impl<E> fmt::Debug for StandardStrategy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardStrategy")
            .field("has_probe", &self.has_probe())
            .finish()
    }
}

impl<C, E> ClassificationStrategy<C, E> for StandardStrategy<E>
where
    C: Call,
    E: From<FetchError>,
{
    fn from_transport_failure(&self, call: &C, error: &TransportError) -> E {
        let kind = self.transport_failure_kind(error);
        let dump = format!("(Transport): {error}\n(Call): {call:?}");
        E::from(FetchError::new(kind).augment(dump))
    }

    fn from_missing_payload(&self, call: &C, response: &RawResponse<C::Output>) -> E {
        let dump = format!("(Response): {response:?}\n(Call): {call:?}");
        E::from(FetchError::missing_data().augment(dump))
    }

    fn from_response(&self, call: &C, response: &RawResponse<C::Output>) -> Option<E> {
        if response.is_success() {
            return None;
        }
        let raw_response = truncate_chars(format!("{response:?}"), MAX_RAW_RESPONSE_CHARS);
        let error = FetchError::bad_status_code(response.status_code(), raw_response)
            .augment(format!("(Call): {call:?}"));
        Some(E::from(error))
    }
}

/// Cut `text` to at most `limit` characters, marking the cut.
fn truncate_chars(mut text: String, limit: usize) -> String {
    let cut = text.char_indices().nth(limit).map(|(index, _)| index);
    if let Some(index) = cut {
        let omitted = text[index..].chars().count();
        text.truncate(index);
        text.push_str(&format!("... ({omitted} more chars)"));
    }
    text
}

/// A strategy whose `from_response` runs an extra check after the inner one.
///
/// Transport failures and missing payloads are delegated unchanged.
#[derive(Debug, Clone)]
pub struct Validated<S, F> {
    inner: S,
    check: F,
}

impl<S, F> Validated<S, F> {
    pub fn new(inner: S, check: F) -> Self {
        Self { inner, check }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<C, E, S, F> ClassificationStrategy<C, E> for Validated<S, F>
where
    C: Call,
    S: ClassificationStrategy<C, E>,
    F: Fn(&C, &RawResponse<C::Output>) -> Option<E> + Send + Sync,
{
    fn from_transport_failure(&self, call: &C, error: &TransportError) -> E {
        self.inner.from_transport_failure(call, error)
    }

    fn from_missing_payload(&self, call: &C, response: &RawResponse<C::Output>) -> E {
        self.inner.from_missing_payload(call, response)
    }

    fn from_response(&self, call: &C, response: &RawResponse<C::Output>) -> Option<E> {
        self.inner
            .from_response(call, response)
            .or_else(|| (self.check)(call, response))
    }
}
