//! Memoized lazy loading on top of [`RetryingInvoker`].

use std::{fmt, future::Future};

use tokio::sync::OnceCell;

use crate::{Result, RetryingInvoker};

/// A value loaded on first use through a retry chain, then kept.
///
/// Callers racing on the first load wait for the one in flight. A load that
/// ends in an error leaves the slot empty, so the next caller starts a new
/// retry chain.
#[derive(Debug)]
pub struct LazyLoad<T> {
    cell: OnceCell<T>,
}

impl<T> Default for LazyLoad<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LazyLoad<T> {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Returns the value if it has been loaded.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Returns the cached value, loading it through `invoker` first if
    /// needed.
    pub async fn get_or_load<E, F, Fut>(
        &self,
        invoker: &RetryingInvoker,
        loader: F,
    ) -> Result<&T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: fmt::Debug,
    {
        self.cell
            .get_or_try_init(|| invoker.invoke(loader))
            .await
    }
}
