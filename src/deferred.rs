//! The deferred result wrapper.

use std::convert::Infallible;
use std::fmt;
use std::panic::Location;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use crate::combinators::pass_through;
use crate::error::{DisplayLocation, Fault};
use crate::marker::DeferredMarker;
use crate::schedule;
use crate::source::{AsyncThunk, IntoDeferredResult, Pending, Thunk};
use crate::trace;

/// The outcome of a computation: a domain `Result`, or a [`Fault`] if the
/// computation raised instead of producing one.
pub type Settled<T, E> = Result<Result<T, E>, Fault>;

/// A boxed computation yielding a [`Settled`] outcome.
pub type Computation<T, E> = BoxFuture<'static, Settled<T, E>>;

/// Bounds required of success and failure payloads.
///
/// Every resolution hands out its own copy of the outcome, and the shared
/// computation may be driven from any task.
pub trait Shareable: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Shareable for T {}

/// Where a wrapper's computation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Not finished yet.
    Pending,
    /// Finished with a success value.
    Succeeded,
    /// Finished with a domain failure.
    Failed,
    /// Raised instead of producing a `Result`.
    Faulted,
}

/// The eventual outcome of an operation that may still be running.
///
/// A `DeferredResult` owns exactly one computation, spawned onto the current
/// Tokio runtime when the wrapper is constructed. The outcome is
/// written once; resolving the wrapper any number of times, from any number
/// of tasks, awaits that same outcome without re-running the work.
///
/// Chaining ([`map`](Self::map), [`flat_map`](Self::flat_map), ...) never
/// touches the wrapper it is called on. It returns a new wrapper whose
/// computation is composed onto this one.
///
/// # Example
///
/// ```
/// use deferred_result::DeferredResult;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let parsed = DeferredResult::<_, String>::new(Ok("21"))
///     .flat_map(|text| text.parse::<u32>().map_err(|err| err.to_string()))
///     .map(|n| n * 2);
///
/// assert_eq!(parsed.resolve().await, Ok(42));
/// # }
/// ```
pub struct DeferredResult<T, E> {
    computation: Shared<Computation<T, E>>,
    origin: &'static Location<'static>,
}

impl<T, E> DeferredResult<T, E>
where
    T: Shareable,
    E: Shareable,
{
    /// Build a wrapper from any accepted source form.
    ///
    /// Never fails: a source that raises while being produced yields a
    /// faulted wrapper. A source that is itself a deferred result is adopted
    /// one level deep, sharing its computation.
    #[track_caller]
    pub fn new(source: impl IntoDeferredResult<T, E>) -> Self {
        let origin = Location::caller();
        if source.is_deferred_result() {
            tracing::trace!(origin = %DisplayLocation(origin), "adopting nested deferred result");
        }
        Self::from_computation(origin, source.into_computation())
    }

    /// Build a wrapper from a future that yields a `Result`.
    #[track_caller]
    pub fn from_future(future: impl Future<Output = Result<T, E>> + Send + 'static) -> Self {
        Self::new(Pending(future))
    }

    /// Build a wrapper by calling `producer` now.
    #[track_caller]
    pub fn from_fn<R>(producer: impl FnOnce() -> R) -> Self
    where
        R: IntoDeferredResult<T, E>,
    {
        Self::new(Thunk(producer))
    }

    /// Build a wrapper by calling `producer` now and running the future it
    /// returns.
    #[track_caller]
    pub fn from_async_fn<Fut>(producer: impl FnOnce() -> Fut) -> Self
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::new(AsyncThunk(producer))
    }

    pub(crate) fn from_computation(
        origin: &'static Location<'static>,
        computation: impl Future<Output = Settled<T, E>> + Send + 'static,
    ) -> Self {
        let computation = trace::traced(origin, computation).shared();
        schedule::start(origin, &computation);
        DeferredResult {
            computation,
            origin,
        }
    }

    /// Where this wrapper was constructed.
    #[must_use]
    pub fn origin(&self) -> &'static Location<'static> {
        self.origin
    }

    /// Inspect progress without waiting.
    #[must_use]
    pub fn state(&self) -> State {
        match self.computation.peek() {
            None => State::Pending,
            Some(Ok(Ok(_))) => State::Succeeded,
            Some(Ok(Err(_))) => State::Failed,
            Some(Err(_)) => State::Faulted,
        }
    }

    /// Await the outcome, surfacing a raise as a [`Fault`] value.
    ///
    /// This is the total view of the wrapper: it never unwinds.
    pub fn try_resolve(&self) -> impl Future<Output = Settled<T, E>> + Send + 'static + use<T, E> {
        self.computation.clone()
    }

    /// Await the outcome.
    ///
    /// # Panics
    ///
    /// If the computation raised, the [`Fault`] is re-raised by unwinding with
    /// the fault as payload. Use [`try_resolve`](Self::try_resolve) to observe
    /// it as a value instead.
    pub fn resolve(&self) -> impl Future<Output = Result<T, E>> + Send + 'static + use<T, E> {
        self.try_resolve()
            .map(|settled| settled.unwrap_or_else(|fault| fault.raise()))
    }

    /// Await the success value, raising the failure.
    ///
    /// # Panics
    ///
    /// A domain failure is raised with the error value itself as the panic
    /// payload (see [`std::panic::panic_any`]), so callers that catch the
    /// unwind can downcast it back to `E`. A fault is re-raised as in
    /// [`resolve`](Self::resolve).
    pub fn resolve_unwrap(&self) -> impl Future<Output = T> + Send + 'static + use<T, E> {
        self.resolve().map(|result| match result {
            Ok(value) => value,
            Err(err) => std::panic::panic_any(err),
        })
    }

    /// Await the success value, substituting `fallback` for a failure or a
    /// fault. Never raises.
    pub fn resolve_unwrap_or(
        &self,
        fallback: T,
    ) -> impl Future<Output = T> + Send + 'static + use<T, E> {
        self.resolve_unwrap_or_else(move || fallback)
    }

    /// Like [`resolve_unwrap_or`](Self::resolve_unwrap_or), computing the
    /// fallback only when it is needed.
    pub fn resolve_unwrap_or_else<F>(
        &self,
        fallback: F,
    ) -> impl Future<Output = T> + Send + 'static + use<F, T, E>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        self.try_resolve().map(|settled| match settled {
            Ok(Ok(value)) => value,
            Ok(Err(_)) | Err(_) => fallback(),
        })
    }

    /// Transform the success value. Failures pass through and `transform`
    /// is never called for them.
    #[track_caller]
    pub fn map<T2, F>(&self, transform: F) -> DeferredResult<T2, E>
    where
        T2: Shareable,
        F: FnOnce(T) -> T2 + Send + 'static,
    {
        let parent = self.computation.clone();
        DeferredResult::from_computation(Location::caller(), async move {
            parent.await.map(|outcome| outcome.map(transform))
        })
    }

    /// Transform the failure value. Successes pass through and `transform`
    /// is never called for them.
    #[track_caller]
    pub fn map_err<E2, F>(&self, transform: F) -> DeferredResult<T, E2>
    where
        E2: Shareable,
        F: FnOnce(E) -> E2 + Send + 'static,
    {
        let parent = self.computation.clone();
        DeferredResult::from_computation(Location::caller(), async move {
            parent.await.map(|outcome| outcome.map_err(transform))
        })
    }

    /// Continue with another fallible step on success.
    ///
    /// `transform` may return a plain `Result` or a deferred result; the
    /// latter is adopted one level deep, so the returned wrapper never holds
    /// a wrapper inside its computation. Failures pass through untouched.
    #[track_caller]
    pub fn flat_map<T2, R, F>(&self, transform: F) -> DeferredResult<T2, E>
    where
        T2: Shareable,
        R: IntoDeferredResult<T2, E>,
        F: FnOnce(T) -> R + Send + 'static,
    {
        let parent = self.computation.clone();
        DeferredResult::from_computation(Location::caller(), async move {
            match parent.await {
                Ok(Ok(value)) => adopt(transform(value)).await,
                Ok(Err(err)) => Ok(Err(err)),
                Err(fault) => Err(fault),
            }
        })
    }

    /// Recover from a failure with another fallible step.
    ///
    /// The mirror of [`flat_map`](Self::flat_map): runs only on failure and
    /// passes successes through untouched.
    #[track_caller]
    pub fn flat_map_err<E2, R, F>(&self, transform: F) -> DeferredResult<T, E2>
    where
        E2: Shareable,
        R: IntoDeferredResult<T, E2>,
        F: FnOnce(E) -> R + Send + 'static,
    {
        let parent = self.computation.clone();
        DeferredResult::from_computation(Location::caller(), async move {
            match parent.await {
                Ok(Ok(value)) => Ok(Ok(value)),
                Ok(Err(err)) => adopt(transform(err)).await,
                Err(fault) => Err(fault),
            }
        })
    }

    /// Observe the success value without changing it.
    #[track_caller]
    pub fn inspect<F>(&self, observer: F) -> DeferredResult<T, E>
    where
        F: FnMut(&T) + Send + 'static,
    {
        self.map(pass_through(observer))
    }

    /// Observe the failure value without changing it.
    #[track_caller]
    pub fn inspect_err<F>(&self, observer: F) -> DeferredResult<T, E>
    where
        F: FnMut(&E) + Send + 'static,
    {
        self.map_err(pass_through(observer))
    }
}

impl<T: Shareable> DeferredResult<T, Infallible> {
    /// Give a wrapper that cannot fail any failure type.
    #[track_caller]
    pub fn cast_err<E: Shareable>(&self) -> DeferredResult<T, E> {
        self.map_err(|never| match never {})
    }
}

impl<E: Shareable> DeferredResult<Infallible, E> {
    /// Give a wrapper that cannot succeed any success type.
    #[track_caller]
    pub fn cast_ok<T: Shareable>(&self) -> DeferredResult<T, E> {
        self.map(|never| match never {})
    }
}

fn adopt<T, E>(next: impl IntoDeferredResult<T, E>) -> Computation<T, E> {
    if next.is_deferred_result() {
        tracing::trace!("adopting computation of returned deferred result");
    }
    next.into_computation()
}

impl<T, E> Clone for DeferredResult<T, E> {
    /// Another handle to the same computation.
    fn clone(&self) -> Self {
        DeferredResult {
            computation: self.computation.clone(),
            origin: self.origin,
        }
    }
}

impl<T: Shareable, E: Shareable> fmt::Debug for DeferredResult<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredResult")
            .field("origin", &format_args!("{}", DisplayLocation(self.origin)))
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl<T, E> DeferredMarker for DeferredResult<T, E> {
    fn is_deferred_result(&self) -> bool {
        true
    }
}

impl<T: Shareable, E: Shareable> IntoDeferredResult<T, E> for DeferredResult<T, E> {
    fn into_computation(self) -> Computation<T, E> {
        self.computation.boxed()
    }
}

impl<T: Shareable, E: Shareable> IntoFuture for DeferredResult<T, E> {
    type Output = Result<T, E>;
    type IntoFuture = BoxFuture<'static, Result<T, E>>;

    fn into_future(self) -> Self::IntoFuture {
        self.resolve().boxed()
    }
}

impl<T: Shareable, E: Shareable> IntoFuture for &DeferredResult<T, E> {
    type Output = Result<T, E>;
    type IntoFuture = BoxFuture<'static, Result<T, E>>;

    fn into_future(self) -> Self::IntoFuture {
        self.resolve().boxed()
    }
}
