//! Diagnostic trace augmentation for deferred computations.

use std::panic::{AssertUnwindSafe, Location};

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::{DisplayLocation, Fault};
use crate::Settled;

/// Wrap `computation` so that a raise during resolution is recorded with the
/// capture site `location`.
///
/// A panic while polling becomes a [`Fault`]; a fault produced further up the
/// chain passes through. Either way `location` is appended to the fault's
/// trace. Successful and failed outcomes are returned untouched.
pub(crate) fn traced<T, E>(
    location: &'static Location<'static>,
    computation: impl Future<Output = Settled<T, E>> + Send + 'static,
) -> BoxFuture<'static, Settled<T, E>>
where
    T: Send + 'static,
    E: Send + 'static,
{
    AssertUnwindSafe(computation)
        .catch_unwind()
        .map(move |caught| {
            let settled = caught.unwrap_or_else(|payload| Err(Fault::from_panic(payload)));
            settled.map_err(|fault| {
                tracing::debug!(
                    at = %DisplayLocation(location),
                    fault = fault.message(),
                    "deferred computation raised"
                );
                fault.traced_at(location)
            })
        })
        .boxed()
}

/// Run a synchronous producer, capturing a panic as a [`Fault`].
///
/// The fault starts with an empty trace; the wrapper built from the result
/// appends its own capture site through [`traced`].
pub(crate) fn catch<R>(producer: impl FnOnce() -> R) -> Result<R, Fault> {
    std::panic::catch_unwind(AssertUnwindSafe(producer)).map_err(Fault::from_panic)
}
