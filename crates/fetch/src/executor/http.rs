//! Executor backed by `reqwest`.

use super::{Completion, Executor};
use crate::call::unit_value;
use crate::{Error, HttpCall, RawOutcome, RawResponse, Result, TransportError};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::error::Error as StdError;
use std::fmt;
use tokio::runtime::Handle;
use tracing::debug;

// Lowercased fragments that resolvers put in "no such host" errors.
const UNRESOLVED_HOST_MARKERS: &[&str] = &[
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "nodename nor servname",
    "no such host",
    "name resolution",
];

/// Sends calls with a `reqwest::Client`, one tokio task per call.
///
/// `submit` returns immediately; the completion runs on the runtime the
/// executor was created with.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: reqwest::Client,
    runtime: Handle,
}

impl ReqwestExecutor {
    /// Create an executor on the current tokio runtime.
    pub fn new(client: reqwest::Client) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        Ok(Self::with_handle(client, runtime))
    }

    pub fn with_handle(client: reqwest::Client, runtime: Handle) -> Self {
        Self { client, runtime }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl<R> Executor<HttpCall<R>> for ReqwestExecutor
where
    R: DeserializeOwned + fmt::Debug + Send + 'static,
{
    fn submit(&self, call: HttpCall<R>, on_result: Completion<HttpCall<R>>) {
        let client = self.client.clone();
        self.runtime.spawn(async move {
            let outcome = execute(&client, &call).await;
            on_result(call, outcome);
        });
    }
}

async fn execute<R>(client: &reqwest::Client, call: &HttpCall<R>) -> RawOutcome<R>
where
    R: DeserializeOwned + 'static,
{
    let mut request = client
        .request(call.method().clone(), call.url().clone())
        .headers(call.headers().clone());
    if let Some(body) = call.body() {
        request = request.json(body);
    }

    debug!(method = %call.method(), url = %call.url(), "dispatching request");

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return RawOutcome::Failure(e.into()),
    };
    let status = response.status();
    let url = response.url().clone();
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => return RawOutcome::Failure(e.into()),
    };

    debug!(%status, %url, len = bytes.len(), "received response");

    decode_body(status, &bytes).map_or_else(RawOutcome::Failure, |response| {
        RawOutcome::Response(response.with_url(url))
    })
}

/// Decode a response body into the expected payload.
///
/// Empty bodies and JSON `null` carry no payload. A body that does not decode
/// is a transport failure on success statuses and is kept as text otherwise.
/// A `()` payload ignores the body.
fn decode_body<R>(
    status: StatusCode,
    bytes: &[u8],
) -> std::result::Result<RawResponse<R>, TransportError>
where
    R: DeserializeOwned + 'static,
{
    let error_text = || String::from_utf8_lossy(bytes).into_owned();

    if let Some(unit) = unit_value::<R>() {
        let response = RawResponse::new(status, Some(unit));
        return Ok(if status.is_success() {
            response
        } else {
            response.with_error_body(error_text())
        });
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(RawResponse::empty(status));
    }

    match serde_json::from_slice::<Option<R>>(bytes) {
        Ok(body) => Ok(RawResponse::new(status, body)),
        Err(e) if status.is_success() => Err(TransportError::Undecodable(e.to_string())),
        Err(_) => Ok(RawResponse::empty(status).with_error_body(error_text())),
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Undecodable(e.to_string())
        } else if e.is_connect() && reports_unresolved_host(&e) {
            Self::HostUnresolved(error_chain(&e))
        } else {
            Self::Other(Box::new(e))
        }
    }
}

/// Whether any error in the source chain reports a name-resolution failure.
fn reports_unresolved_host(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(error) = current {
        let message = error.to_string().to_ascii_lowercase();
        if UNRESOLVED_HOST_MARKERS
            .iter()
            .any(|marker| message.contains(marker))
        {
            return true;
        }
        current = error.source();
    }
    false
}

fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![error.to_string()];
    let mut current = error.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}
