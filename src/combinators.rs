//! Free-standing helpers for working with several deferred results at once.

use std::panic::Location;

use futures::future;

use crate::deferred::{DeferredResult, Shareable};
use crate::error::Fault;
use crate::source::IntoDeferredResult;

pub use crate::marker::is_deferred_result;

/// A fixed group of deferred results sharing one failure type.
///
/// Implemented for tuples of one to eight [`DeferredResult`]s; see [`all`].
pub trait AllDeferred<E> {
    /// The tuple of success values.
    type Values: Shareable;

    /// Combine the group into one wrapper constructed at `origin`.
    fn into_all(self, origin: &'static Location<'static>) -> DeferredResult<Self::Values, E>;
}

/// Wait for every wrapper in `results` and collect their success values.
///
/// The inputs are already running, so they all finish regardless of
/// outcome. If every input succeeds the result is a success holding the
/// values in input order. Otherwise it is the failure of the first failing
/// input in input order, whichever finished first. An input that raised
/// takes precedence over domain failures.
///
/// ```
/// use deferred_result::{all, success, failure};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let both = all((success::<_, &str>(2), success("a")));
/// assert_eq!(both.resolve().await, Ok((2, "a")));
///
/// let broken = all((success(2), success("a"), failure::<(), _>("E")));
/// assert_eq!(broken.resolve().await, Err("E"));
/// # }
/// ```
#[track_caller]
pub fn all<E: Shareable, A: AllDeferred<E>>(results: A) -> DeferredResult<A::Values, E> {
    results.into_all(Location::caller())
}

/// Like [`all`] for any number of wrappers of the same type.
#[track_caller]
pub fn all_iter<T, E>(
    results: impl IntoIterator<Item = DeferredResult<T, E>>,
) -> DeferredResult<Vec<T>, E>
where
    T: Shareable,
    E: Shareable,
{
    let pending: Vec<_> = results.into_iter().map(|r| r.try_resolve()).collect();
    DeferredResult::from_computation(Location::caller(), async move {
        let outcomes = future::join_all(pending)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, Fault>>()?;
        Ok::<_, Fault>(outcomes.into_iter().collect::<Result<Vec<T>, E>>())
    })
}

macro_rules! impl_all_deferred {
    ($($value:ident: $ty:ident),+) => {
        impl<E: Shareable, $($ty: Shareable),+> AllDeferred<E> for ($(DeferredResult<$ty, E>,)+) {
            type Values = ($($ty,)+);

            fn into_all(self, origin: &'static Location<'static>) -> DeferredResult<Self::Values, E> {
                let ($($value,)+) = self;
                DeferredResult::from_computation(origin, async move {
                    let ($($value,)+) = futures::join!($($value.try_resolve()),+);
                    $(let $value = $value?;)+
                    let values = (|| -> Result<Self::Values, E> { Ok(($($value?,)+)) })();
                    Ok::<_, Fault>(values)
                })
            }
        }
    };
}

impl_all_deferred!(a: A);
impl_all_deferred!(a: A, b: B);
impl_all_deferred!(a: A, b: B, c: C);
impl_all_deferred!(a: A, b: B, c: C, d: D);
impl_all_deferred!(a: A, b: B, c: C, d: D, e: E1);
impl_all_deferred!(a: A, b: B, c: C, d: D, e: E1, f: F);
impl_all_deferred!(a: A, b: B, c: C, d: D, e: E1, f: F, g: G);
impl_all_deferred!(a: A, b: B, c: C, d: D, e: E1, f: F, g: G, h: H);

/// Build a [`DeferredResult`] from any accepted source form.
///
/// Equivalent to [`DeferredResult::new`].
#[track_caller]
pub fn to_deferred_result<T, E>(source: impl IntoDeferredResult<T, E>) -> DeferredResult<T, E>
where
    T: Shareable,
    E: Shareable,
{
    DeferredResult::new(source)
}

/// Turn a side effect into an identity step for a chain.
///
/// ```
/// use deferred_result::{pass_through, success};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
/// let log = seen.clone();
/// let value = success::<_, ()>(3)
///     .map(pass_through(move |n: &i32| log.lock().unwrap().push(*n)))
///     .map(|n| n + 1);
///
/// assert_eq!(value.resolve().await, Ok(4));
/// assert_eq!(*seen.lock().unwrap(), vec![3]);
/// # }
/// ```
pub fn pass_through<T, R, F>(mut side_effect: F) -> impl FnMut(T) -> T
where
    F: FnMut(&T) -> R,
{
    move |item| {
        side_effect(&item);
        item
    }
}
