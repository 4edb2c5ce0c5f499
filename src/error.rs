//! The error raised by a deferred computation.
//!
//! Domain failures are never represented here: they live in the `Err` arm of
//! the wrapped `Result`. A [`Fault`] is what remains when a computation
//! panicked instead of producing a `Result` at all.

use std::any::Any;
use std::fmt;
use std::panic::Location;

use thiserror::Error;

/// A deferred computation raised instead of producing a `Result`.
///
/// Faults are not converted into typed failures. They travel through every
/// chained wrapper unchanged, except that each wrapper appends the location
/// it was created at to [`Fault::trace`]. Awaiting a faulted wrapper through
/// [`resolve`](crate::DeferredResult::resolve) re-raises the fault by
/// unwinding with the `Fault` itself as the panic payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("deferred computation raised: {message}")]
pub struct Fault {
    message: String,
    trace: Vec<&'static Location<'static>>,
}

impl Fault {
    /// Create a fault with an empty trace.
    pub fn new(message: impl ToString) -> Self {
        Fault {
            message: message.to_string(),
            trace: Vec::new(),
        }
    }

    /// Build a fault out of a caught panic payload.
    ///
    /// A payload that already is a `Fault` (a nested wrapper re-raised it) is
    /// recovered as-is so its trace is preserved.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Fault>() {
            Ok(fault) => return *fault,
            Err(payload) => payload,
        };
        let message = if let Some(message) = payload.downcast_ref::<&'static str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "opaque panic payload".to_string()
        };
        Fault::new(message)
    }

    /// The message carried by the original panic.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Capture points this fault passed through, innermost first.
    #[must_use]
    pub fn trace(&self) -> &[&'static Location<'static>] {
        &self.trace
    }

    /// Append a capture point to the trace.
    #[must_use]
    pub fn traced_at(mut self, location: &'static Location<'static>) -> Self {
        self.trace.push(location);
        self
    }

    /// Render the trace one capture point per line, like a backtrace.
    #[must_use]
    pub fn render_trace(&self) -> String {
        let mut out = String::new();
        for location in &self.trace {
            out.push_str(&format!("    at {}\n", DisplayLocation(location)));
        }
        out
    }

    /// Re-raise this fault on the current task.
    pub fn raise(self) -> ! {
        std::panic::resume_unwind(Box::new(self))
    }
}

/// Formats a location the way fault traces and logs print it.
pub(crate) struct DisplayLocation(pub &'static Location<'static>);

impl fmt::Display for DisplayLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.0.file(), self.0.line(), self.0.column())
    }
}
