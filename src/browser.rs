//! Browser backends.
//!
//! Only compiled for `wasm32` targets. Both types look up `window` on every
//! call rather than holding JS handles, which keeps them `Send + Sync`.

use std::sync::Arc;

use wasm_bindgen::JsValue;
use web_sys::{Storage, Window};

use crate::{Reloader, RetryingInvoker, SessionStore, StoreError};

/// [`SessionStore`] backed by `window.sessionStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSessionStore;

impl SessionStore for BrowserSessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        session_storage()?.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        session_storage()?.set_item(key, value).map_err(js_error)
    }
}

/// [`Reloader`] calling `window.location.reload()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserReloader;

impl Reloader for BrowserReloader {
    fn reload(&self) {
        let Some(window) = web_sys::window() else {
            #[cfg(feature = "tracing")]
            tracing::warn!("no window object available, reload skipped");
            return;
        };
        if let Err(err) = window.location().reload() {
            #[cfg(feature = "tracing")]
            tracing::warn!("location.reload() failed: {:?}", err);
            let _ = err;
        }
    }
}

impl RetryingInvoker {
    /// Creates an invoker bound to the current page's session storage and
    /// reload.
    pub fn browser() -> Self {
        Self::new(Arc::new(BrowserSessionStore), Arc::new(BrowserReloader))
    }
}

fn window() -> Result<Window, StoreError> {
    web_sys::window()
        .ok_or_else(|| StoreError::Unavailable("no window object available".to_owned()))
}

fn session_storage() -> Result<Storage, StoreError> {
    window()?
        .session_storage()
        .map_err(js_error)?
        .ok_or_else(|| StoreError::Unavailable("sessionStorage is disabled".to_owned()))
}

fn js_error(err: JsValue) -> StoreError {
    StoreError::Unavailable(format!("{err:?}"))
}
