//! Fetch orchestration.
//!
//! [`fetch_with`] wires a call, an executor, and a classification strategy
//! together and invokes exactly one of the two user callbacks.
//! [`Fetcher`] bundles a default executor and an optional connectivity probe
//! so that common call sites only pass a call and two callbacks.

use crate::call::unit_value;
use crate::executor::{Executor, ReqwestExecutor};
use crate::strategy::{ClassificationStrategy, ConnectivityProbe, StandardStrategy};
use crate::{Call, ClientConfig, FetchError, FetchResult, RawOutcome, RawResponse, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Fetch `call` through `executor` and report the classified outcome.
///
/// Returns right after submission. Exactly one of `on_success` and
/// `on_failure` runs, once, when the executor completes.
pub fn fetch_with<C, X, S, E, OnSuccess, OnFailure>(
    executor: &X,
    call: C,
    strategy: S,
    on_success: OnSuccess,
    on_failure: OnFailure,
) where
    C: Call,
    X: Executor<C> + ?Sized,
    S: ClassificationStrategy<C, E> + 'static,
    OnSuccess: FnOnce(C::Output) + Send + 'static,
    OnFailure: FnOnce(E) + Send + 'static,
{
    dispatch(executor, call, strategy, move |result| {
        result.fold(on_success, on_failure)
    });
}

/// Submit `call` and hand its classified result to `callback`.
fn dispatch<C, X, S, E, F>(executor: &X, call: C, strategy: S, callback: F)
where
    C: Call,
    X: Executor<C> + ?Sized,
    S: ClassificationStrategy<C, E> + 'static,
    F: FnOnce(FetchResult<C::Output, E>) + Send + 'static,
{
    debug!(call = ?call, "submitting call");
    executor.submit(
        call,
        Box::new(move |call, outcome| {
            let result = classify(&strategy, &call, outcome);
            if result.is_success() {
                debug!(call = ?call, "call succeeded");
            } else {
                warn!(call = ?call, "call failed");
            }
            callback(result);
        }),
    );
}

/// Turn one raw outcome into a classified result.
pub fn classify<C, S, E>(
    strategy: &S,
    call: &C,
    outcome: RawOutcome<C::Output>,
) -> FetchResult<C::Output, E>
where
    C: Call,
    S: ClassificationStrategy<C, E> + ?Sized,
{
    match outcome {
        RawOutcome::Failure(error) => {
            FetchResult::failure(strategy.from_transport_failure(call, &error))
        }
        RawOutcome::Response(response) => classify_response(strategy, call, response),
    }
}

fn classify_response<C, S, E>(
    strategy: &S,
    call: &C,
    mut response: RawResponse<C::Output>,
) -> FetchResult<C::Output, E>
where
    C: Call,
    S: ClassificationStrategy<C, E> + ?Sized,
{
    if !response.has_body() {
        // An absent body is the expected payload when it is `()`.
        return match unit_value::<C::Output>() {
            Some(unit) => match strategy.from_response(call, &response) {
                Some(error) => FetchResult::failure(error),
                None => FetchResult::success(unit),
            },
            None => FetchResult::failure(strategy.from_missing_payload(call, &response)),
        };
    }

    if let Some(error) = strategy.from_response(call, &response) {
        return FetchResult::failure(error);
    }

    match response.take_body() {
        Some(body) => FetchResult::success(body),
        None => FetchResult::failure(strategy.from_missing_payload(call, &response)),
    }
}

/// Entry point bundling an executor with an optional connectivity probe.
///
/// # Example
///
/// ```ignore
/// use fetch::{ClientConfig, Fetcher, HttpCall};
///
/// # async fn example() -> fetch::Result<()> {
/// let config = ClientConfig::new("https://api.example.com/");
/// let fetcher = Fetcher::from_config(&config)?;
/// let call: HttpCall<serde_json::Value> = HttpCall::get(config.endpoint("items/1")?);
///
/// fetcher.fetch(
///     call,
///     |item| println!("{item}"),
///     |error| eprintln!("{}: {error}", error.kind()),
/// );
/// # Ok(())
/// # }
/// ```
pub struct Fetcher<X = ReqwestExecutor> {
    executor: X,
    probe: Option<Arc<dyn ConnectivityProbe>>,
}

impl Fetcher<ReqwestExecutor> {
    /// A fetcher sending real requests with a default client on the current
    /// tokio runtime.
    pub fn new() -> Result<Self> {
        Ok(Self::with_executor(ReqwestExecutor::new(reqwest::Client::new())?))
    }

    /// A fetcher using a client built from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = config.build_client()?;
        Ok(Self::with_executor(ReqwestExecutor::new(client)?))
    }
}

impl<X> Fetcher<X> {
    pub fn with_executor(executor: X) -> Self {
        Self {
            executor,
            probe: None,
        }
    }

    /// Use `probe` to disambiguate host-resolution failures.
    pub fn with_probe(mut self, probe: impl ConnectivityProbe + 'static) -> Self {
        self.probe = Some(Arc::new(probe));
        self
    }

    pub fn executor(&self) -> &X {
        &self.executor
    }

    /// The default strategy, sharing this fetcher's probe.
    pub fn standard_strategy<E>(&self) -> StandardStrategy<E> {
        StandardStrategy::with_shared_probe(self.probe.clone())
    }

    /// Fetch with the standard strategy.
    pub fn fetch<C, OnSuccess, OnFailure>(
        &self,
        call: C,
        on_success: OnSuccess,
        on_failure: OnFailure,
    ) where
        C: Call,
        X: Executor<C>,
        OnSuccess: FnOnce(C::Output) + Send + 'static,
        OnFailure: FnOnce(FetchError) + Send + 'static,
    {
        let strategy = self.standard_strategy::<FetchError>();
        fetch_with(&self.executor, call, strategy, on_success, on_failure);
    }

    /// Fetch with a custom strategy and error type.
    pub fn fetch_with<C, S, E, OnSuccess, OnFailure>(
        &self,
        call: C,
        strategy: S,
        on_success: OnSuccess,
        on_failure: OnFailure,
    ) where
        C: Call,
        X: Executor<C>,
        S: ClassificationStrategy<C, E> + 'static,
        OnSuccess: FnOnce(C::Output) + Send + 'static,
        OnFailure: FnOnce(E) + Send + 'static,
    {
        fetch_with(&self.executor, call, strategy, on_success, on_failure);
    }

    /// Fetch with the standard strategy and await the result.
    pub fn fetch_result<C>(
        &self,
        call: C,
    ) -> impl Future<Output = std::result::Result<C::Output, FetchError>> + Send + use<C, X>
    where
        C: Call,
        X: Executor<C>,
    {
        let strategy = self.standard_strategy::<FetchError>();
        self.fetch_result_with(call, strategy)
    }

    /// Fetch with a custom strategy and await the result.
    ///
    /// If the executor drops the completion without running it, the result
    /// is an `Unknown` error.
    pub fn fetch_result_with<C, S, E>(
        &self,
        call: C,
        strategy: S,
    ) -> impl Future<Output = std::result::Result<C::Output, E>> + Send + use<C, S, E, X>
    where
        C: Call,
        X: Executor<C>,
        S: ClassificationStrategy<C, E> + 'static,
        E: From<FetchError> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        dispatch(&self.executor, call, strategy, move |result| {
            // The caller may have stopped waiting.
            let _ = tx.send(result.into_result());
        });
        async move {
            rx.await.unwrap_or_else(|_| {
                Err(E::from(
                    FetchError::unknown().augment("(Completion): dropped before delivery"),
                ))
            })
        }
    }
}

impl<X: Clone> Clone for Fetcher<X> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            probe: self.probe.clone(),
        }
    }
}
