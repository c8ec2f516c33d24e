use std::{fmt, future::Future, sync::Arc};

use crate::{
    session::{ReloadFlag, SessionStore},
    timer, Reloader, Result, RetryError, RetryOptions,
};

/// Re-invokes a failing async operation, then falls back to one reload per
/// session.
///
/// The invoker is cheap to clone; clones share the session store and the
/// reload hook.
#[derive(Clone)]
pub struct RetryingInvoker {
    options: RetryOptions,
    flag: ReloadFlag,
    reloader: Arc<dyn Reloader>,
}

impl fmt::Debug for RetryingInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryingInvoker")
            .field("options", &self.options)
            .field("flag", &self.flag)
            .field("reloader", &"<reloader>")
            .finish()
    }
}

impl RetryingInvoker {
    /// Creates an invoker with default options (5 attempts, 1000 ms delay).
    pub fn new(store: Arc<dyn SessionStore>, reloader: Arc<dyn Reloader>) -> Self {
        Self {
            options: RetryOptions::default(),
            flag: ReloadFlag::new(store),
            reloader,
        }
    }

    /// Applies the attempt bound and delay used by [`RetryingInvoker::invoke`].
    pub fn with_options(mut self, opts: RetryOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn options(&self) -> &RetryOptions {
        &self.options
    }

    pub fn reload_flag(&self) -> &ReloadFlag {
        &self.flag
    }

    /// Runs `operation` with the invoker's configured options.
    ///
    /// See [`RetryingInvoker::invoke_with`].
    pub async fn invoke<T, E, F, Fut>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: fmt::Debug,
    {
        self.invoke_with(operation, &self.options).await
    }

    /// Runs `operation` until it succeeds or `opts.attempts` invocations
    /// have failed.
    ///
    /// Every failure waits `opts.delay_ms` before the next step. After the
    /// final failure the session reload flag is claimed:
    ///
    /// - unclaimed: the flag is set, the environment is reloaded and the
    ///   returned future never completes.
    /// - already set: [`RetryError::OperationFailed`] with the last error.
    ///
    /// A zero bound returns [`RetryError::NoAttempts`] without invoking
    /// `operation`.
    pub async fn invoke_with<T, E, F, Fut>(
        &self,
        mut operation: F,
        opts: &RetryOptions,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: fmt::Debug,
    {
        let original_attempts = opts.attempts;
        if original_attempts == 0 {
            return Err(RetryError::NoAttempts);
        }
        let delay = opts.delay();
        let mut attempts_remaining = original_attempts;

        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            timer::wait(delay).await;

            if attempts_remaining > 1 {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = ?error, "retrying rejected operation");

                attempts_remaining -= 1;
                continue;
            }

            // The flag is only consulted once the last attempt has failed.
            if self.flag.try_claim()? {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    attempts = original_attempts,
                    error = ?error,
                    "retry failed {original_attempts} time(s), reloading"
                );

                self.reloader.reload();
                return std::future::pending().await;
            }

            return Err(RetryError::OperationFailed {
                attempts: original_attempts,
                source: error,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::RetryingInvoker;
    use crate::{MemorySessionStore, RetryError, RetryOptions};

    fn invoker(reloads: Arc<AtomicUsize>) -> RetryingInvoker {
        RetryingInvoker::new(
            Arc::new(MemorySessionStore::new()),
            Arc::new(move || {
                reloads.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[test]
    fn debug_hides_reloader() {
        let debug = format!("{:?}", invoker(Arc::new(AtomicUsize::new(0))));
        assert!(debug.contains("<reloader>"));
        assert!(debug.contains("attempts: 5"));
    }

    #[tokio::test]
    async fn zero_bound_never_invokes() {
        let reloads = Arc::new(AtomicUsize::new(0));
        let calls = AtomicUsize::new(0);
        let invoker = invoker(reloads.clone()).with_options(RetryOptions {
            attempts: 0,
            delay_ms: 0,
        });

        let err = invoker
            .invoke(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>("boom") }
            })
            .await
            .expect_err("zero bound must fail");

        assert!(matches!(err, RetryError::NoAttempts));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(reloads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn success_has_no_side_effects() {
        let reloads = Arc::new(AtomicUsize::new(0));
        let invoker = invoker(reloads.clone());

        let value = invoker
            .invoke(|| async { Ok::<_, &str>(7) })
            .await
            .expect("first attempt must succeed");

        assert_eq!(value, 7);
        assert_eq!(invoker.reload_flag().is_set(), Ok(false));
        assert_eq!(reloads.load(Ordering::SeqCst), 0);
    }
}
