//! Typed, classified HTTP fetching.
//!
//! This crate adapts an asynchronous network call into exactly one of two
//! callbacks: a typed success payload, or a classified error. Transport and
//! JSON decoding are left to `reqwest` and `serde_json`; the crate decides
//! what each outcome means.
//!
//! # Overview
//!
//! The crate is organized around these concepts:
//!
//! - **Call**: a prepared request descriptor with a typed payload
//!   ([`HttpCall`] for JSON over HTTP).
//! - **Executor**: submits a call and completes it once with a raw outcome.
//!   [`ReqwestExecutor`] sends real requests; [`StubExecutor`] and
//!   [`ScriptedExecutor`] complete synchronously for tests.
//! - **ClassificationStrategy**: turns a raw outcome into success or a
//!   [`FetchError`]. [`StandardStrategy`] is the default policy.
//! - **Fetcher**: the entry point that wires the three together.
//!
//! # Example
//!
//! ```ignore
//! use fetch::{ClientConfig, Fetcher, HttpCall};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Item {
//!     name: String,
//! }
//!
//! # async fn example() -> fetch::Result<()> {
//! let config = ClientConfig::new("https://api.example.com/v1/");
//! let fetcher = Fetcher::from_config(&config)?.with_probe(|| true);
//!
//! let call: HttpCall<Item> = HttpCall::get(config.endpoint("items/1")?);
//! match fetcher.fetch_result(call).await {
//!     Ok(item) => println!("{}", item.name),
//!     Err(error) => eprintln!("{}: {error}", error.kind()),
//! }
//! # Ok(())
//! # }
//! ```

mod call;
mod config;
mod error;
mod errors;
mod executor;
mod fetcher;
mod outcome;
mod strategy;

// Call descriptors
pub use call::{Call, HttpCall};

// Client configuration
pub use config::ClientConfig;

// Setup errors
pub use error::{Error, Result};

// Classified fetch errors
pub use errors::{BadRequest, DUMP_KEYWORD, FetchError, FetchErrorKind, NotFound};

// Executors
pub use executor::{Completion, Executor, ReqwestExecutor, ScriptedExecutor, StubExecutor};

// Orchestration
pub use fetcher::{Fetcher, classify, fetch_with};

// Outcomes
pub use outcome::{FetchResult, RawOutcome, RawResponse, TransportError};

// Classification
pub use strategy::{ClassificationStrategy, ConnectivityProbe, StandardStrategy, Validated};
