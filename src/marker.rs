//! Structural recognition of deferred results.
//!
//! Two copies of this crate linked into one program (or a wrapper defined by
//! an entirely separate library) produce distinct types, so "is this my
//! `DeferredResult`" cannot be answered by type identity. Recognition instead
//! goes through the [`DeferredMarker`] capability: a value is a deferred
//! result when it says so.

use serde_json::Value;

/// Well-known key under which serialized or dynamic values carry the marker.
pub const DEFERRED_MARKER_KEY: &str = "isDeferredResult";

/// Capability check for "this value is a deferred result".
///
/// The default answer is `false`, so plain types opt out with an empty impl.
/// Only wrappers answer `true`, and they always do.
pub trait DeferredMarker {
    /// Whether this value is a deferred result.
    fn is_deferred_result(&self) -> bool {
        false
    }
}

/// Returns `true` if `value` identifies itself as a deferred result.
pub fn is_deferred_result<V: DeferredMarker + ?Sized>(value: &V) -> bool {
    value.is_deferred_result()
}

impl<T, E> DeferredMarker for Result<T, E> {}

impl<T> DeferredMarker for Option<T> {}

impl<T> DeferredMarker for Vec<T> {}

impl<T> DeferredMarker for [T] {}

impl<V: DeferredMarker + ?Sized> DeferredMarker for &V {
    fn is_deferred_result(&self) -> bool {
        (**self).is_deferred_result()
    }
}

impl<V: DeferredMarker + ?Sized> DeferredMarker for Box<V> {
    fn is_deferred_result(&self) -> bool {
        (**self).is_deferred_result()
    }
}

/// Dynamic values are recognized structurally: a JSON object (arrays never
/// qualify) whose marker member is exactly `true`.
impl DeferredMarker for Value {
    fn is_deferred_result(&self) -> bool {
        match self {
            Value::Object(map) => matches!(map.get(DEFERRED_MARKER_KEY), Some(Value::Bool(true))),
            _ => false,
        }
    }
}
