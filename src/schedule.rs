//! Starting computations on the ambient cooperative scheduler.

use std::panic::Location;

use futures::FutureExt;
use futures::future::Shared;

use crate::error::DisplayLocation;

/// Begin driving `computation` on the current Tokio runtime.
///
/// The driver only polls a clone of the shared future, so resolvers still
/// observe the single outcome and never re-run the work. Without a runtime
/// the work starts at first resolution, on whatever executor polls it.
/// Dropping the driver (for instance when its runtime shuts down) leaves the
/// computation pollable by whoever awaits it next.
pub(crate) fn start<F>(origin: &'static Location<'static>, computation: &Shared<F>)
where
    F: Future + Send + 'static,
    F::Output: Clone + Send + Sync + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            tracing::trace!(origin = %DisplayLocation(origin), "spawning driver");
            handle.spawn(computation.clone().map(drop));
        }
        Err(_) => {
            tracing::trace!(
                origin = %DisplayLocation(origin),
                "no runtime available, deferring start to first resolution"
            );
        }
    }
}
