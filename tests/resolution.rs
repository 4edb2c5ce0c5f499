//! Construction forms and the resolution surface.

mod common;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{Spy, settle};
use deferred_result::{
    AsyncThunk, DeferredResult, Pending, State, Thunk, failure, failure_from, success,
    success_from, to_deferred_result,
};
use futures::FutureExt;

mod resolve {
    use super::*;

    #[tokio::test]
    async fn works_with_success_and_sync_source() {
        let res: DeferredResult<i32, &str> = DeferredResult::new(Ok(2));
        assert_eq!(res.resolve().await, Ok(2));
    }

    #[tokio::test]
    async fn works_with_failure_and_sync_source() {
        let res: DeferredResult<i32, &str> = DeferredResult::new(Err("SimpleError"));
        assert_eq!(res.resolve().await, Err("SimpleError"));
    }

    #[tokio::test]
    async fn works_with_a_long_chain() {
        let res: DeferredResult<i32, &str> = DeferredResult::new(Ok(2));
        let error_spy = Spy::<&str>::new();

        let r = res
            .map(|v| v + 2)
            .map(|v| v + 10)
            .flat_map(|v| Ok(v + 6))
            .flat_map(|v| DeferredResult::new(Ok(v * 2)))
            .map_err(error_spy.tap())
            .resolve()
            .await;

        assert_eq!(r, Ok(40));
        assert!(!error_spy.was_called());
    }

    #[tokio::test]
    async fn is_idempotent() {
        let runs = Arc::new(AtomicUsize::new(0));
        let res: DeferredResult<usize, ()> = DeferredResult::from_async_fn({
            let runs = runs.clone();
            move || async move { Ok(runs.fetch_add(1, Ordering::SeqCst) + 1) }
        });

        assert_eq!(res.resolve().await, Ok(1));
        assert_eq!(res.resolve().await, Ok(1));
        assert_eq!(res.clone().await, Ok(1));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn can_be_awaited_from_many_tasks() {
        let (tx, rx) = tokio::sync::oneshot::channel::<u32>();
        let res: DeferredResult<u32, String> =
            DeferredResult::from_future(async move { rx.await.map_err(|err| err.to_string()) });

        let waiters: Vec<_> = (0..4).map(|_| tokio::spawn(res.resolve())).collect();
        tx.send(11).unwrap();

        for waiter in waiters {
            assert_eq!(waiter.await.unwrap(), Ok(11));
        }
    }

    #[tokio::test]
    async fn settles_without_being_awaited() {
        let res: DeferredResult<i32, ()> = DeferredResult::new(Ok(1));
        settle().await;
        assert_eq!(res.state(), State::Succeeded);
    }

    #[tokio::test]
    async fn outlives_the_wrapper() {
        let res: DeferredResult<i32, ()> = DeferredResult::new(Ok(1));
        let pending = res.resolve();
        let fallback = res.resolve_unwrap_or_else(|| 0);
        drop(res);

        assert_eq!(pending.await, Ok(1));
        assert_eq!(fallback.await, 1);
    }
}

mod resolve_unwrap {
    use super::*;

    #[tokio::test]
    async fn works_with_success_and_sync_source() {
        let res: DeferredResult<i32, &str> = DeferredResult::new(Ok(2));
        assert_eq!(res.resolve_unwrap().await, 2);
    }

    #[tokio::test]
    async fn works_with_success_and_async_source() {
        let res: DeferredResult<(&str, &str), ()> =
            DeferredResult::new(Pending(async { Ok(("from", "a future")) }));
        assert_eq!(res.resolve_unwrap().await, ("from", "a future"));
    }

    #[tokio::test]
    async fn raises_the_error_with_sync_source() {
        let res: DeferredResult<i32, &str> = DeferredResult::new(Err("SimpleError"));
        let payload = AssertUnwindSafe(res.resolve_unwrap())
            .catch_unwind()
            .await
            .unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"SimpleError"));
    }

    #[tokio::test]
    async fn raises_the_error_with_async_source() {
        let res: DeferredResult<i32, String> =
            DeferredResult::from_future(async { Err("AsyncError".to_string()) });
        let payload = AssertUnwindSafe(res.resolve_unwrap())
            .catch_unwind()
            .await
            .unwrap_err();
        assert_eq!(
            payload.downcast_ref::<String>().map(String::as_str),
            Some("AsyncError")
        );
    }
}

mod resolve_unwrap_or {
    use super::*;

    #[tokio::test]
    async fn success_path() {
        let res: DeferredResult<&str, &str> = DeferredResult::from_future(async { Ok("All Good") });
        assert_eq!(res.resolve_unwrap_or("fallback").await, "All Good");
    }

    #[tokio::test]
    async fn failure_path() {
        let res: DeferredResult<i32, &str> = DeferredResult::from_future(async { Err("AsyncError") });
        assert_eq!(res.resolve_unwrap_or(5).await, 5);
    }

    #[tokio::test]
    async fn fallback_is_lazy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let res: DeferredResult<i32, &str> = DeferredResult::new(Ok(1));
        let value = res
            .resolve_unwrap_or_else({
                let calls = calls.clone();
                move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    0
                }
            })
            .await;

        assert_eq!(value, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

mod construction {
    use super::*;

    #[tokio::test]
    async fn starts_work_before_resolution() {
        let started = Arc::new(AtomicUsize::new(0));
        let _res: DeferredResult<(), ()> = DeferredResult::from_future({
            let started = started.clone();
            async move {
                started.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        settle().await;
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dropped_chain_still_runs_to_the_end() {
        let first = Spy::<i32>::new();
        let last = Spy::<i32>::new();

        let _ = DeferredResult::<i32, ()>::new(Ok(1))
            .map(first.tap())
            .flat_map(|v| DeferredResult::new(Ok(v + 1)))
            .map(last.recorder());

        settle().await;
        assert_eq!(first.calls(), vec![1]);
        assert_eq!(last.calls(), vec![2]);
    }

    #[tokio::test]
    async fn calls_functions_immediately() {
        let spy = Spy::<()>::new();
        let _res: DeferredResult<i32, ()> = DeferredResult::new(Thunk({
            let record = spy.recorder();
            move || {
                record(());
                Ok(1)
            }
        }));

        assert!(spy.was_called());
    }

    #[tokio::test]
    async fn accepts_async_functions() {
        let res: DeferredResult<i32, ()> = DeferredResult::new(AsyncThunk(|| async { Ok(4) }));
        assert_eq!(res.resolve().await, Ok(4));
    }

    #[tokio::test]
    async fn from_fn_accepts_pending_sources() {
        let res: DeferredResult<i32, ()> = DeferredResult::from_fn(|| Pending(async { Ok(4) }));
        assert_eq!(res.resolve().await, Ok(4));
    }

    #[tokio::test]
    async fn unwraps_a_success_wrapper() {
        let res = DeferredResult::new(success::<_, ()>(2));
        assert_eq!(res.resolve().await, Ok(2));
    }

    #[tokio::test]
    async fn unwraps_a_failure_wrapper() {
        let res = DeferredResult::new(failure::<(), _>("test-error"));
        assert_eq!(res.resolve().await, Err("test-error"));
    }

    #[tokio::test]
    async fn adoption_shares_the_computation() {
        let runs = Arc::new(AtomicUsize::new(0));
        let inner: DeferredResult<usize, ()> = DeferredResult::from_future({
            let runs = runs.clone();
            async move { Ok(runs.fetch_add(1, Ordering::SeqCst)) }
        });
        let outer = DeferredResult::new(inner.clone());

        assert_eq!(outer.resolve().await, Ok(0));
        assert_eq!(inner.resolve().await, Ok(0));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn to_deferred_result_unwraps_success() {
        let res = to_deferred_result(success::<_, ()>(2));
        assert_eq!(res.resolve().await, Ok(2));
    }

    #[tokio::test]
    async fn to_deferred_result_unwraps_failure() {
        let res = to_deferred_result(failure::<(), _>("test-error"));
        assert_eq!(res.resolve().await, Err("test-error"));
    }

    #[tokio::test]
    async fn to_deferred_result_accepts_plain_results() {
        let res = to_deferred_result(Ok::<_, ()>(3));
        assert_eq!(res.resolve().await, Ok(3));
    }
}

mod constructors {
    use super::*;

    #[tokio::test]
    async fn success_works_from_primitives() {
        let spy = Spy::<i32>::new();
        success::<_, ()>(2).map(spy.recorder());
        settle().await;
        assert_eq!(spy.calls(), vec![2]);
    }

    #[tokio::test]
    async fn success_works_from_futures() {
        let spy = Spy::<Vec<i32>>::new();
        success_from::<_, ()>(async { vec![2, 3] }).map(spy.recorder());
        settle().await;
        assert_eq!(spy.calls(), vec![vec![2, 3]]);
    }

    #[tokio::test]
    async fn failure_works_from_strings() {
        let spy = Spy::<&str>::new();
        failure::<(), _>("SimpleError").map_err(spy.recorder());
        settle().await;
        assert_eq!(spy.calls(), vec!["SimpleError"]);
    }

    #[tokio::test]
    async fn failure_works_from_futures() {
        let res = failure_from::<(), _>(async { "AsyncError" });
        assert_eq!(res.resolve().await, Err("AsyncError"));
    }
}

#[test]
fn resolves_without_a_runtime() {
    let res: DeferredResult<i32, ()> = DeferredResult::from_future(async { Ok(1) });
    assert_eq!(res.state(), State::Pending);
    assert_eq!(futures::executor::block_on(res.map(|v| v + 1).resolve()), Ok(2));
}
