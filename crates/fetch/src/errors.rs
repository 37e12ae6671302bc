//! Classified fetch errors.
//!
//! Every failed fetch is reported as a [`FetchError`]: a closed
//! [`FetchErrorKind`] plus a human-readable description. The description
//! starts with a fixed text for the kind and may be extended once with a
//! debug dump of the call and the raw response or transport failure.

use std::fmt;
use thiserror::Error;

/// Separates the base description of an error from its debug dump.
pub const DUMP_KEYWORD: &str = "dump:-";

/// The request side of the exchange went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadRequest {
    /// The request could not be built or sent as described.
    Encode,
    /// The response body could not be decoded into the expected payload.
    Decode,
}

/// Nothing usable came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotFound {
    /// The call completed but carried no payload.
    MissingData,
    /// The host could not be reached because the device has no network.
    MissingNetwork,
}

/// Category of a [`FetchError`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    BadRequest(BadRequest),
    NotFound(NotFound),
    /// The server answered with a non-success status and a decodable body.
    BadStatusCode {
        status_code: u16,
        /// Rendering of the raw response, for diagnostics only.
        raw_response: String,
    },
    /// A transport failure that cannot be attributed to any other kind.
    Unknown,
}

impl FetchErrorKind {
    /// Fixed description every error of this kind starts with.
    pub fn base_description(&self) -> String {
        match self {
            Self::BadRequest(BadRequest::Encode) => {
                format!("Error encoding request! {DUMP_KEYWORD}")
            }
            Self::BadRequest(BadRequest::Decode) => {
                format!("Error decoding response! {DUMP_KEYWORD}")
            }
            Self::NotFound(NotFound::MissingData) => format!("No data found! {DUMP_KEYWORD}"),
            Self::NotFound(NotFound::MissingNetwork) => format!("No network! {DUMP_KEYWORD}"),
            Self::BadStatusCode {
                status_code,
                raw_response,
            } => format!(
                "Bad status code: {status_code}. Raw response: {raw_response} {DUMP_KEYWORD}"
            ),
            Self::Unknown => format!("Unknown error! {DUMP_KEYWORD}"),
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(BadRequest::Encode) => write!(f, "BadRequest.Encode"),
            Self::BadRequest(BadRequest::Decode) => write!(f, "BadRequest.Decode"),
            Self::NotFound(NotFound::MissingData) => write!(f, "NotFound.MissingData"),
            Self::NotFound(NotFound::MissingNetwork) => write!(f, "NotFound.MissingNetwork"),
            Self::BadStatusCode { status_code, .. } => write!(f, "BadStatusCode({status_code})"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A classified fetch failure.
///
/// Values are immutable; [`FetchError::augment`] returns a new error rather
/// than editing one in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{description}")]
pub struct FetchError {
    kind: FetchErrorKind,
    description: String,
}

impl FetchError {
    /// Create an error of the given kind with its base description.
    pub fn new(kind: FetchErrorKind) -> Self {
        let description = kind.base_description();
        Self { kind, description }
    }

    pub fn encode() -> Self {
        Self::new(FetchErrorKind::BadRequest(BadRequest::Encode))
    }

    pub fn decode() -> Self {
        Self::new(FetchErrorKind::BadRequest(BadRequest::Decode))
    }

    pub fn missing_data() -> Self {
        Self::new(FetchErrorKind::NotFound(NotFound::MissingData))
    }

    pub fn missing_network() -> Self {
        Self::new(FetchErrorKind::NotFound(NotFound::MissingNetwork))
    }

    pub fn bad_status_code(status_code: u16, raw_response: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::BadStatusCode {
            status_code,
            raw_response: raw_response.into(),
        })
    }

    pub fn unknown() -> Self {
        Self::new(FetchErrorKind::Unknown)
    }

    /// Return this error with `dump` appended to its description.
    ///
    /// The base description is kept as a prefix. Each produced error is
    /// expected to be augmented once.
    #[must_use]
    pub fn augment(self, dump: impl AsRef<str>) -> Self {
        let mut description = self.description;
        description.push_str(dump.as_ref());
        Self {
            kind: self.kind,
            description,
        }
    }

    pub fn kind(&self) -> &FetchErrorKind {
        &self.kind
    }

    /// Full description: base text followed by any debug dump.
    ///
    /// Advisory only; do not parse.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The debug dump appended by [`augment`](Self::augment), if any.
    pub fn dump(&self) -> &str {
        let base = self.kind.base_description();
        self.description.strip_prefix(&base).unwrap_or_default()
    }

    /// HTTP status for [`FetchErrorKind::BadStatusCode`] errors.
    pub fn status_code(&self) -> Option<u16> {
        match self.kind {
            FetchErrorKind::BadStatusCode { status_code, .. } => Some(status_code),
            _ => None,
        }
    }
}

impl From<FetchErrorKind> for FetchError {
    fn from(kind: FetchErrorKind) -> Self {
        Self::new(kind)
    }
}
