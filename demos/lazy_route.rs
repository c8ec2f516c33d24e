use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use lazy_retry::{LazyLoad, MemorySessionStore, RetryOptions, RetryingInvoker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opts = RetryOptions::from_env().map_err(anyhow::Error::msg)?;
    let invoker = RetryingInvoker::new(
        Arc::new(MemorySessionStore::new()),
        Arc::new(|| println!("reloading host")),
    )
    .with_options(demo_options(opts));

    let route: LazyLoad<String> = LazyLoad::new();
    let fetches = AtomicUsize::new(0);

    for _ in 0..2 {
        let module = route
            .get_or_load(&invoker, || {
                let attempt = fetches.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    if attempt < 3 {
                        Err(format!("chunk fetch {attempt} failed"))
                    } else {
                        Ok("welcome page module".to_owned())
                    }
                }
            })
            .await
            .map_err(|err| anyhow::anyhow!("route failed to load: {err}"))?;
        println!("{module} (fetches so far: {})", fetches.load(Ordering::SeqCst));
    }

    Ok(())
}

/// The route in `main` only loads on its third fetch, and the reload hook just
/// prints, so fewer attempts would leave the demo waiting forever.
fn demo_options(opts: RetryOptions) -> RetryOptions {
    RetryOptions {
        attempts: opts.attempts.max(3),
        delay_ms: opts.delay_ms.min(200),
    }
}
