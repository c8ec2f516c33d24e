use std::time::Duration;

use serde::Deserialize;

/// Configures the attempt bound and delay of a retry chain.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryOptions {
    /// Total number of invocations, first call included.
    pub attempts: u32,
    /// Fixed delay in milliseconds between a failed attempt and the next step.
    pub delay_ms: u64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay_ms: 1_000,
        }
    }
}

impl RetryOptions {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts,
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Reads options from environment variables.
    ///
    /// Reads:
    /// - `LAZY_RETRY_ATTEMPTS` — attempt bound (default 5)
    /// - `LAZY_RETRY_DELAY_MS` — delay between attempts (default 1000)
    ///
    /// Unset variables keep their defaults. Set but unparsable values are
    /// reported as an error.
    ///
    /// **Not available on `wasm32` targets** — browser runtimes have no
    /// process environment.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> std::result::Result<Self, String> {
        let mut opts = Self::default();
        if let Some(attempts) = read_env("LAZY_RETRY_ATTEMPTS")? {
            opts.attempts = attempts;
        }
        if let Some(delay_ms) = read_env("LAZY_RETRY_DELAY_MS")? {
            opts.delay_ms = delay_ms;
        }
        Ok(opts)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_env<T: std::str::FromStr>(name: &str) -> std::result::Result<Option<T>, String> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| format!("{name} is not a valid non-negative integer: '{raw}'")),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(format!("{name} is not valid unicode")),
    }
}
