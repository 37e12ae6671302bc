use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use fetch::{
    BadRequest, FetchError, FetchErrorKind, Fetcher, HttpCall, NotFound, RawOutcome, RawResponse,
    ScriptedExecutor, StandardStrategy, StubExecutor, TransportError, fetch_with,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::{StatusCode, Url};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Item {
    id: u32,
    name: String,
}

fn item() -> Item {
    Item {
        id: 1,
        name: "lamp".to_string(),
    }
}

fn call<R>() -> HttpCall<R> {
    HttpCall::get(Url::parse("https://api.example.test/items/1").unwrap())
}

/// Records every callback invocation of one or more fetches.
struct Recorder<R> {
    successes: Arc<Mutex<Vec<R>>>,
    failures: Arc<Mutex<Vec<FetchError>>>,
}

impl<R> Default for Recorder<R> {
    fn default() -> Self {
        Self {
            successes: Arc::default(),
            failures: Arc::default(),
        }
    }
}

impl<R: Send + 'static> Recorder<R> {
    fn on_success(&self) -> impl FnOnce(R) + Send + 'static {
        let successes = Arc::clone(&self.successes);
        move |value| successes.lock().unwrap().push(value)
    }

    fn on_failure(&self) -> impl FnOnce(FetchError) + Send + 'static {
        let failures = Arc::clone(&self.failures);
        move |error| failures.lock().unwrap().push(error)
    }

    fn successes(&self) -> usize {
        self.successes.lock().unwrap().len()
    }

    fn single_failure(&self) -> FetchError {
        assert_eq!(self.successes(), 0, "no success expected");
        let failures = self.failures.lock().unwrap();
        assert_eq!(failures.len(), 1, "exactly one failure expected");
        failures[0].clone()
    }
}

fn fetch_once<R>(outcome: RawOutcome<R>, strategy: StandardStrategy) -> Recorder<R>
where
    R: serde::de::DeserializeOwned + std::fmt::Debug + Send + 'static,
{
    let executor = ScriptedExecutor::new([outcome]);
    let recorder = Recorder::default();
    fetch_with(
        &executor,
        call::<R>(),
        strategy,
        recorder.on_success(),
        recorder.on_failure(),
    );
    assert_eq!(executor.submitted(), 1);
    recorder
}

#[test]
fn success_payload_reaches_on_success_once() {
    let recorder = fetch_once(
        RawOutcome::Response(RawResponse::ok(item())),
        StandardStrategy::new(),
    );

    assert_eq!(*recorder.successes.lock().unwrap(), vec![item()]);
    assert!(recorder.failures.lock().unwrap().is_empty());
}

#[test]
fn non_success_status_is_bad_status_code() {
    for status in [
        StatusCode::BAD_REQUEST,
        StatusCode::NOT_FOUND,
        StatusCode::INTERNAL_SERVER_ERROR,
        StatusCode::MOVED_PERMANENTLY,
    ] {
        let recorder = fetch_once(
            RawOutcome::Response(RawResponse::new(status, Some(item()))),
            StandardStrategy::new(),
        );

        let error = recorder.single_failure();
        assert_eq!(error.status_code(), Some(status.as_u16()));
        assert!(matches!(error.kind(), FetchErrorKind::BadStatusCode { .. }));
        assert!(error.dump().contains("(Call)"));
    }
}

#[test]
fn empty_payload_is_missing_data() {
    let recorder = fetch_once::<Item>(
        RawOutcome::Response(RawResponse::empty(StatusCode::OK)),
        StandardStrategy::new(),
    );

    let error = recorder.single_failure();
    assert_eq!(error.kind(), &FetchErrorKind::NotFound(NotFound::MissingData));
    assert!(error.description().starts_with("No data found! dump:-(Response)"));
}

#[test]
fn empty_payload_for_unit_is_success() {
    let recorder = fetch_once::<()>(
        RawOutcome::Response(RawResponse::empty(StatusCode::NO_CONTENT)),
        StandardStrategy::new(),
    );

    assert_eq!(recorder.successes(), 1);
    assert!(recorder.failures.lock().unwrap().is_empty());
}

#[test]
fn host_unresolved_follows_connectivity_probe() {
    let cases = [
        (
            StandardStrategy::with_probe(|| true),
            FetchErrorKind::BadRequest(BadRequest::Encode),
        ),
        (
            StandardStrategy::with_probe(|| false),
            FetchErrorKind::NotFound(NotFound::MissingNetwork),
        ),
        (StandardStrategy::new(), FetchErrorKind::Unknown),
    ];

    for (strategy, expected) in cases {
        let recorder = fetch_once::<Item>(
            RawOutcome::Failure(TransportError::HostUnresolved(
                "dns error: failed to lookup address information".into(),
            )),
            strategy,
        );

        let error = recorder.single_failure();
        assert_eq!(error.kind(), &expected);
        assert!(error.dump().contains("failed to lookup address information"));
        assert!(error.dump().contains("https://api.example.test/items/1"));
    }
}

#[test]
fn undecodable_body_is_decode() {
    let recorder = fetch_once::<Item>(
        RawOutcome::Failure(TransportError::Undecodable("expected value at line 1".into())),
        StandardStrategy::with_probe(|| false),
    );

    let error = recorder.single_failure();
    assert_eq!(error.kind(), &FetchErrorKind::BadRequest(BadRequest::Decode));
}

#[test]
fn probe_is_only_consulted_for_unresolved_hosts() {
    let probed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&probed);
    let probe = move || {
        counter.fetch_add(1, Ordering::SeqCst);
        true
    };

    let recorder = fetch_once::<Item>(
        RawOutcome::Failure(TransportError::other("connection refused")),
        StandardStrategy::with_probe(probe.clone()),
    );
    assert_eq!(recorder.single_failure().kind(), &FetchErrorKind::Unknown);
    assert_eq!(probed.load(Ordering::SeqCst), 0);

    fetch_once::<Item>(
        RawOutcome::Failure(TransportError::HostUnresolved("dns error".into())),
        StandardStrategy::with_probe(probe),
    );
    assert_eq!(probed.load(Ordering::SeqCst), 1);
}

#[test]
fn fetcher_uses_standard_strategy_by_default() {
    let fetcher = Fetcher::with_executor(StubExecutor::new(|_: &HttpCall<Item>| {
        RawOutcome::Failure(TransportError::HostUnresolved("dns error".into()))
    }))
    .with_probe(|| false);
    let recorder = Recorder::default();

    fetcher.fetch(call::<Item>(), recorder.on_success(), recorder.on_failure());

    let error = recorder.single_failure();
    assert_eq!(error.kind(), &FetchErrorKind::NotFound(NotFound::MissingNetwork));
}

#[test]
fn exactly_one_callback_per_fetch() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let executor = ScriptedExecutor::<Item>::default();
    let recorder = Recorder::default();
    let mut expected_successes = 0;

    for round in 0..1000 {
        let outcome = if rng.gen_bool(0.5) {
            expected_successes += 1;
            RawOutcome::Response(RawResponse::ok(item()))
        } else {
            match rng.gen_range(0..4) {
                0 => RawOutcome::Response(RawResponse::new(
                    StatusCode::BAD_GATEWAY,
                    Some(item()),
                )),
                1 => RawOutcome::Response(RawResponse::empty(StatusCode::OK)),
                2 => RawOutcome::Failure(TransportError::HostUnresolved("dns error".into())),
                _ => RawOutcome::Failure(TransportError::other("timed out")),
            }
        };
        executor.push(outcome);

        let before = recorder.successes() + recorder.failures.lock().unwrap().len();
        fetch_with(
            &executor,
            call::<Item>(),
            StandardStrategy::new(),
            recorder.on_success(),
            recorder.on_failure(),
        );
        let after = recorder.successes() + recorder.failures.lock().unwrap().len();
        assert_eq!(after, before + 1, "round {round} invoked {} callbacks", after - before);
    }

    let failures = recorder.failures.lock().unwrap().len();
    assert_eq!(executor.submitted(), 1000);
    assert_eq!(recorder.successes(), expected_successes);
    assert_eq!(recorder.successes() + failures, 1000);
}
