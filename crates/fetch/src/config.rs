//! HTTP client configuration.

use crate::{Error, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_CALL_TIMEOUT_SECS: u64 = 30;

/// Settings for the underlying HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL relative endpoint paths are resolved against.
    pub base_url: String,

    /// Whole-call timeout, owned by the client.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Overrides the default `User-Agent` header.
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_call_timeout_secs() -> u64 {
    DEFAULT_CALL_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("fetch/{}", env!("CARGO_PKG_VERSION"))
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            call_timeout_secs: DEFAULT_CALL_TIMEOUT_SECS,
            user_agent: None,
        }
    }

    /// Set the whole-call timeout, rounded up to full seconds.
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        let partial = u64::from(timeout.subsec_nanos() > 0);
        self.call_timeout_secs = timeout.as_secs().saturating_add(partial);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Parsed base URL, always ending with `/` so that paths join below it.
    pub fn base(&self) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(format!(
                "{}: cannot be used as a base url",
                self.base_url
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Resolve `path` against the base URL. Absolute URLs pass through.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        if let Ok(url) = Url::parse(path) {
            return Ok(url);
        }
        self.base()?
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::InvalidUrl(format!("{path}: {e}")))
    }

    /// Check the configuration without building anything.
    pub fn validate(&self) -> Result<()> {
        if self.call_timeout_secs == 0 {
            return Err(Error::Config("call_timeout_secs must be greater than 0".into()));
        }
        self.base().map(|_| ())
    }

    /// Build a `reqwest::Client` with the configured timeout and user agent.
    pub fn build_client(&self) -> Result<reqwest::Client> {
        self.validate()?;
        let user_agent = self.user_agent.clone().unwrap_or_else(default_user_agent);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.call_timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(client)
    }
}
