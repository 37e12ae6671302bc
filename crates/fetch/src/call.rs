//! Call descriptors.

use crate::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

/// A prepared call whose successful response decodes into `Output`.
///
/// The descriptor is opaque to classification; its `Debug` rendering is
/// used in error dumps.
pub trait Call: fmt::Debug + Send + 'static {
    /// Payload type delivered on success.
    type Output: fmt::Debug + Send + 'static;
}

/// An HTTP request expecting a JSON body of type `R`.
pub struct HttpCall<R> {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Value>,
    payload: PhantomData<fn() -> R>,
}

impl<R> HttpCall<R> {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            payload: PhantomData,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: Url) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: Url) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Attach a JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

impl<R> fmt::Debug for HttpCall<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCall")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("body", &self.body)
            .finish()
    }
}

impl<R> fmt::Display for HttpCall<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

impl<R> Call for HttpCall<R>
where
    R: DeserializeOwned + fmt::Debug + Send + 'static,
{
    type Output = R;
}

/// The unit value when `R` is `()`, otherwise `None`.
pub(crate) fn unit_value<R: 'static>() -> Option<R> {
    let unit: Box<dyn Any> = Box::new(());
    unit.downcast::<R>().ok().map(|value| *value)
}
