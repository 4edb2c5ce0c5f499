//! # deferred-result -- composable deferred success/failure values
//!
//! A [`DeferredResult<T, E>`] is the eventual outcome of an operation that may
//! still be running. It is always exactly one of "succeeded with a `T`" or
//! "failed with an `E`", and it can be chained before that outcome exists:
//!
//! ```
//! use deferred_result::{DeferredResult, all, success};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let user = DeferredResult::<_, String>::from_future(async { Ok(7_u32) });
//! let score = user
//!     .map(|id| id * 6)
//!     .flat_map(|n| if n > 40 { Ok(n) } else { Err("too low".to_string()) });
//!
//! assert_eq!(score.resolve().await, Ok(42));
//!
//! // `all` waits for several wrappers and keeps their input order.
//! let both = all((score, success("done")));
//! assert_eq!(both.resolve().await, Ok((42, "done")));
//! # }
//! ```
//!
//! ## Construction
//!
//! Wrappers are built from a ready `Result`, a future, a function returning
//! either, or another deferred result (see [`source`]). Construction never
//! fails and never blocks: the work is handed to the ambient Tokio runtime
//! right away and the wrapper is returned immediately. Outside a runtime the
//! work starts when the wrapper is first resolved.
//!
//! ## Resolution
//!
//! - [`resolve`](DeferredResult::resolve) awaits the `Result`
//! - [`resolve_unwrap`](DeferredResult::resolve_unwrap) awaits the value and raises the failure
//! - [`resolve_unwrap_or`](DeferredResult::resolve_unwrap_or) awaits the value or a fallback
//! - [`try_resolve`](DeferredResult::try_resolve) also exposes a [`Fault`] as a value
//!
//! Resolving is repeatable and never re-runs the work.
//!
//! ## Faults
//!
//! A computation that panics instead of producing a `Result` settles as a
//! [`Fault`]. Faults are not turned into typed failures. They travel down
//! the chain, collecting the location of every wrapper they pass through,
//! and are re-raised when resolved.

pub mod combinators;
pub mod constructors;
mod deferred;
pub mod error;
pub mod marker;
mod schedule;
pub mod source;
mod trace;

pub use combinators::{AllDeferred, all, all_iter, pass_through, to_deferred_result};
pub use constructors::{EMPTY_FAILURE, EMPTY_SUCCESS, failure, failure_from, success, success_from};
pub use deferred::{Computation, DeferredResult, Settled, Shareable, State};
pub use error::Fault;
pub use marker::{DEFERRED_MARKER_KEY, DeferredMarker, is_deferred_result};
pub use source::{AsyncThunk, IntoDeferredResult, Pending, Thunk};
