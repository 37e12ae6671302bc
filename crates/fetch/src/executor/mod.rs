//! Call executors.
//!
//! An [`Executor`] submits a call and invokes its completion exactly once,
//! with either a response or a transport failure. [`ReqwestExecutor`] sends
//! real HTTP requests on a tokio runtime; [`StubExecutor`] and
//! [`ScriptedExecutor`] complete synchronously from canned outcomes.

mod http;
mod stub;

pub use http::ReqwestExecutor;
pub use stub::{ScriptedExecutor, StubExecutor};

use crate::{Call, RawOutcome};
use std::sync::Arc;

/// Completion handler for a submitted call.
///
/// Receives the call back together with its raw outcome.
pub type Completion<C> = Box<dyn FnOnce(C, RawOutcome<<C as Call>::Output>) + Send + 'static>;

/// Trait for call executors.
///
/// Implementations may complete on another thread at a later time, or
/// synchronously before `submit` returns.
pub trait Executor<C: Call>: Send + Sync {
    /// Submit `call` and hand its outcome to `on_result` once.
    fn submit(&self, call: C, on_result: Completion<C>);
}

impl<C, X> Executor<C> for Arc<X>
where
    C: Call,
    X: Executor<C> + ?Sized,
{
    fn submit(&self, call: C, on_result: Completion<C>) {
        (**self).submit(call, on_result);
    }
}

impl<C, X> Executor<C> for &X
where
    C: Call,
    X: Executor<C> + ?Sized,
{
    fn submit(&self, call: C, on_result: Completion<C>) {
        (**self).submit(call, on_result);
    }
}
