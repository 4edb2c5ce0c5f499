//! Success and failure specializations.
//!
//! These build a [`DeferredResult`] straight from a value, or from a future
//! of a value, already tagged as a success or as a failure.

use std::convert::Infallible;
use std::sync::LazyLock;

use futures::FutureExt;

use crate::deferred::{DeferredResult, Shareable};

/// Canonical immediate success carrying no payload.
///
/// Use [`cast_err`](DeferredResult::cast_err) to fit it into a chain with a
/// concrete failure type.
pub static EMPTY_SUCCESS: LazyLock<DeferredResult<(), Infallible>> =
    LazyLock::new(|| success(()));

/// Canonical immediate failure carrying no payload.
pub static EMPTY_FAILURE: LazyLock<DeferredResult<Infallible, ()>> =
    LazyLock::new(|| failure(()));

/// A deferred result that succeeds with `value`.
#[track_caller]
pub fn success<T: Shareable, E: Shareable>(value: T) -> DeferredResult<T, E> {
    DeferredResult::new(Ok(value))
}

/// A deferred result that succeeds with whatever `value` resolves to.
#[track_caller]
pub fn success_from<T, E>(value: impl Future<Output = T> + Send + 'static) -> DeferredResult<T, E>
where
    T: Shareable,
    E: Shareable,
{
    DeferredResult::from_future(value.map(Ok))
}

/// A deferred result that fails with `error`.
#[track_caller]
pub fn failure<T: Shareable, E: Shareable>(error: E) -> DeferredResult<T, E> {
    DeferredResult::new(Err(error))
}

/// A deferred result that fails with whatever `error` resolves to.
#[track_caller]
pub fn failure_from<T, E>(error: impl Future<Output = E> + Send + 'static) -> DeferredResult<T, E>
where
    T: Shareable,
    E: Shareable,
{
    DeferredResult::from_future(error.map(Err))
}
