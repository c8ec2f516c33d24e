use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use lazy_retry::{
    LazyLoad, MemorySessionStore, RetryError, RetryOptions, RetryingInvoker, SessionStore,
    RELOAD_FLAG_KEY,
};

#[derive(Debug, PartialEq)]
struct RouteModule {
    path: &'static str,
}

fn invoker(attempts: u32) -> RetryingInvoker {
    let store = Arc::new(MemorySessionStore::new());
    // Pretend the page was already reloaded so exhaustion is observable.
    store
        .set_item(RELOAD_FLAG_KEY, "true")
        .expect("memory store must accept writes");
    RetryingInvoker::new(store, Arc::new(|| {})).with_options(RetryOptions {
        attempts,
        delay_ms: 10,
    })
}

#[tokio::test(start_paused = true)]
async fn loads_once_and_caches() {
    let invoker = invoker(3);
    let welcome = LazyLoad::new();
    let loads = AtomicUsize::new(0);

    for _ in 0..3 {
        let module = welcome
            .get_or_load(&invoker, || {
                loads.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, String>(RouteModule { path: "/welcome" }) }
            })
            .await
            .expect("load must succeed");
        assert_eq!(module.path, "/welcome");
    }

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert!(welcome.is_loaded());
    assert_eq!(welcome.get(), Some(&RouteModule { path: "/welcome" }));
}

#[tokio::test(start_paused = true)]
async fn concurrent_first_callers_share_one_load() {
    let invoker = invoker(3);
    let safe = LazyLoad::new();
    let loads = AtomicUsize::new(0);
    let loader = || {
        loads.fetch_add(1, Ordering::SeqCst);
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, String>(RouteModule { path: "/safes" })
        }
    };

    let (a, b) = tokio::join!(
        safe.get_or_load(&invoker, loader),
        safe.get_or_load(&invoker, loader),
    );

    assert_eq!(a.expect("first caller must load"), b.expect("second caller must load"));
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn retries_inside_a_single_load() {
    let invoker = invoker(3);
    let page = LazyLoad::new();
    let loads = Arc::new(AtomicUsize::new(0));

    let module = page
        .get_or_load(&invoker, || {
            let attempt = loads.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if attempt < 3 {
                    Err(format!("chunk {attempt} failed"))
                } else {
                    Ok(RouteModule { path: "/load" })
                }
            }
        })
        .await
        .expect("third attempt must succeed");

    assert_eq!(module.path, "/load");
    assert_eq!(loads.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn failed_load_is_not_cached() {
    let invoker = invoker(2);
    let page: LazyLoad<RouteModule> = LazyLoad::new();

    let err = page
        .get_or_load(&invoker, || async { Err::<RouteModule, _>("offline") })
        .await
        .expect_err("exhausted load must fail");
    assert!(matches!(err, RetryError::OperationFailed { attempts: 2, .. }));
    assert!(!page.is_loaded());

    let module = page
        .get_or_load(&invoker, || async {
            Ok::<_, &str>(RouteModule { path: "/create" })
        })
        .await
        .expect("later load must succeed");
    assert_eq!(module.path, "/create");
}
