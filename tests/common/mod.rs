//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records every value it is called with.
#[derive(Debug)]
pub struct Spy<T> {
    calls: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for Spy<T> {
    fn clone(&self) -> Self {
        Spy {
            calls: self.calls.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> Spy<T> {
    pub fn new() -> Self {
        Spy {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A callback that records its argument.
    pub fn recorder(&self) -> impl FnOnce(T) + Send + 'static + use<T> {
        let calls = self.calls.clone();
        move |value| calls.lock().unwrap().push(value)
    }

    /// A callback that records its argument and hands it back.
    pub fn tap(&self) -> impl FnOnce(T) -> T + Send + 'static + use<T> {
        let calls = self.calls.clone();
        move |value| {
            calls.lock().unwrap().push(value.clone());
            value
        }
    }

    pub fn calls(&self) -> Vec<T> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_called(&self) -> bool {
        !self.calls.lock().unwrap().is_empty()
    }
}

/// Give spawned drivers time to run.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

/// Send library logs to the test writer, shown for failing tests or with
/// `--nocapture`.
pub fn init_test_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    drop(
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("deferred_result=trace")),
            )
            .with_test_writer()
            .try_init(),
    );
}
