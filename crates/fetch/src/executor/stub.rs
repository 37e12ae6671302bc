//! Synchronous executors for tests.

use super::{Completion, Executor};
use crate::{Call, RawOutcome, TransportError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Completes every call synchronously with the outcome produced by `respond`.
///
/// Useful for testing classification without any I/O.
pub struct StubExecutor<F> {
    respond: F,
}

impl<F> StubExecutor<F> {
    pub fn new(respond: F) -> Self {
        Self { respond }
    }
}

impl<C, F> Executor<C> for StubExecutor<F>
where
    C: Call,
    F: Fn(&C) -> RawOutcome<C::Output> + Send + Sync,
{
    fn submit(&self, call: C, on_result: Completion<C>) {
        let outcome = (self.respond)(&call);
        on_result(call, outcome);
    }
}

/// Replays queued outcomes in order, one per submitted call.
///
/// Once the script runs out, calls complete with a transport failure.
pub struct ScriptedExecutor<R> {
    script: Mutex<VecDeque<RawOutcome<R>>>,
    submitted: AtomicUsize,
}

impl<R> ScriptedExecutor<R> {
    pub fn new(outcomes: impl IntoIterator<Item = RawOutcome<R>>) -> Self {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            submitted: AtomicUsize::new(0),
        }
    }

    /// Queue one more outcome.
    pub fn push(&self, outcome: impl Into<RawOutcome<R>>) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome.into());
    }

    /// Outcomes not yet replayed.
    pub fn remaining(&self) -> usize {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Calls submitted so far.
    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::SeqCst)
    }
}

impl<R> Default for ScriptedExecutor<R> {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}

impl<C: Call> Executor<C> for ScriptedExecutor<C::Output> {
    fn submit(&self, call: C, on_result: Completion<C>) {
        self.submitted.fetch_add(1, Ordering::SeqCst);
        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let outcome = next.unwrap_or_else(|| {
            RawOutcome::Failure(TransportError::other("executor script exhausted"))
        });
        on_result(call, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HttpCall, RawResponse};
    use reqwest::{StatusCode, Url};
    use std::sync::Arc;

    fn call() -> HttpCall<u32> {
        HttpCall::get(Url::parse("https://api.example.test/count").unwrap())
    }

    fn record(into: &Arc<Mutex<Vec<String>>>) -> Completion<HttpCall<u32>> {
        let into = Arc::clone(into);
        Box::new(move |_, outcome| {
            let line = match outcome {
                RawOutcome::Response(response) => format!("{:?}", response.body()),
                RawOutcome::Failure(error) => error.to_string(),
            };
            into.lock().unwrap().push(line);
        })
    }

    #[test]
    fn stub_completes_before_submit_returns() {
        let executor = StubExecutor::new(|_: &HttpCall<u32>| RawOutcome::Response(RawResponse::ok(3)));
        let seen = Arc::new(Mutex::new(Vec::new()));

        executor.submit(call(), record(&seen));

        assert_eq!(*seen.lock().unwrap(), vec!["Some(3)".to_string()]);
    }

    #[test]
    fn scripted_replays_in_order() {
        let executor = ScriptedExecutor::new([
            RawOutcome::Response(RawResponse::ok(1)),
            RawOutcome::Response(RawResponse::empty(StatusCode::NO_CONTENT)),
        ]);
        executor.push(TransportError::Undecodable("trailing comma".into()));
        let seen = Arc::new(Mutex::new(Vec::new()));

        for _ in 0..4 {
            executor.submit(call(), record(&seen));
        }

        assert_eq!(executor.submitted(), 4);
        assert_eq!(executor.remaining(), 0);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "Some(1)".to_string(),
                "None".to_string(),
                "response body could not be decoded: trailing comma".to_string(),
                "transport failure: executor script exhausted".to_string(),
            ]
        );
    }
}
