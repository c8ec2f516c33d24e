//! `lazy-retry` re-invokes failing async operations, such as fetching a
//! lazily loaded code chunk, and falls back to a single environment reload
//! per session once every attempt has failed.
//!
//! The entry points are:
//! - [`RetryingInvoker::invoke`]
//! - [`RetryingInvoker::invoke_with`]
//! - [`LazyLoad::get_or_load`]

mod error;
mod invoker;
mod lazy;
mod options;
mod reload;
mod session;
mod timer;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use error::{RetryError, StoreError};
pub use invoker::RetryingInvoker;
pub use lazy::LazyLoad;
pub use options::RetryOptions;
pub use reload::Reloader;
pub use session::{MemorySessionStore, ReloadFlag, SessionStore, RELOAD_FLAG_KEY};

/// Result of a retry chain wrapping an operation that fails with `E`.
pub type Result<T, E> = std::result::Result<T, RetryError<E>>;
