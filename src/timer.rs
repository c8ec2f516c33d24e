use std::time::Duration;

// tokio::time is only available on non-WASM targets.
#[cfg(not(target_arch = "wasm32"))]
use tokio::time::sleep as platform_sleep;

#[cfg(target_arch = "wasm32")]
use gloo_timers::future::sleep as platform_sleep;

/// Suspends the current retry chain for `delay`.
///
/// On native targets: `tokio::time::sleep`.
/// On WASM targets: a `setTimeout`-backed future, so the browser event loop
/// keeps running while the chain waits.
pub(crate) async fn wait(delay: Duration) {
    #[cfg(feature = "tracing")]
    tracing::debug!("waiting {} ms before next retry step", delay.as_millis());

    platform_sleep(delay).await;
}
