//! The forms a [`DeferredResult`](crate::DeferredResult) can be built from.
//!
//! | Form                          | Type                                  |
//! |-------------------------------|---------------------------------------|
//! | an available `Result`         | `Result<T, E>`                        |
//! | a computation already running | [`Pending`] around a future           |
//! | a function returning a value  | [`Thunk`] around a closure            |
//! | a function returning a future | [`AsyncThunk`] around a closure       |
//! | another deferred result       | `DeferredResult` or a foreign type    |
//!
//! Every form normalizes to a [`Computation`]. Functions are invoked right
//! away; a panic inside one is kept as a [`Fault`](crate::Fault) in the
//! computation rather than escaping the constructor.

use futures::FutureExt;
use futures::future;

use crate::deferred::Computation;
use crate::marker::DeferredMarker;
use crate::trace;

/// Conversion into the computation backing a
/// [`DeferredResult`](crate::DeferredResult).
///
/// Types from other crates may implement this to be accepted wherever a
/// deferred result is expected, including as the return value of
/// [`flat_map`](crate::DeferredResult::flat_map). Implementors that are themselves
/// deferred results should answer `true` from
/// [`DeferredMarker::is_deferred_result`] and hand over their existing
/// computation instead of starting a new one.
pub trait IntoDeferredResult<T, E>: DeferredMarker {
    /// Normalize `self` into a computation yielding a settled outcome.
    fn into_computation(self) -> Computation<T, E>;
}

impl<T, E> IntoDeferredResult<T, E> for Result<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn into_computation(self) -> Computation<T, E> {
        future::ready(Ok(self)).boxed()
    }
}

/// A future that is already running, or will run, and yields a `Result`.
#[derive(Debug)]
pub struct Pending<Fut>(pub Fut);

impl<Fut> DeferredMarker for Pending<Fut> {}

impl<Fut, T, E> IntoDeferredResult<T, E> for Pending<Fut>
where
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    fn into_computation(self) -> Computation<T, E> {
        self.0.map(Ok).boxed()
    }
}

/// A zero-argument function producing any other source form, typically a
/// plain `Result`.
#[derive(Debug)]
pub struct Thunk<F>(pub F);

impl<F> DeferredMarker for Thunk<F> {}

impl<F, R, T, E> IntoDeferredResult<T, E> for Thunk<F>
where
    F: FnOnce() -> R,
    R: IntoDeferredResult<T, E>,
    T: Send + 'static,
    E: Send + 'static,
{
    fn into_computation(self) -> Computation<T, E> {
        match trace::catch(self.0) {
            Ok(source) => source.into_computation(),
            Err(fault) => future::ready(Err(fault)).boxed(),
        }
    }
}

/// A zero-argument function returning a future that yields a `Result`.
#[derive(Debug)]
pub struct AsyncThunk<F>(pub F);

impl<F> DeferredMarker for AsyncThunk<F> {}

impl<F, Fut, T, E> IntoDeferredResult<T, E> for AsyncThunk<F>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    fn into_computation(self) -> Computation<T, E> {
        match trace::catch(self.0) {
            Ok(future) => future.map(Ok).boxed(),
            Err(fault) => future::ready(Err(fault)).boxed(),
        }
    }
}
