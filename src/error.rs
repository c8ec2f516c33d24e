/// Error type returned by a retry chain.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// Every attempt failed and the session had already been reloaded once.
    #[error("operation failed after {attempts} attempt(s): {source}")]
    OperationFailed {
        /// Number of times the operation was invoked.
        attempts: u32,
        /// Error from the final attempt.
        source: E,
    },
    /// The attempt bound was zero, so the operation was never invoked.
    #[error("attempt bound is zero")]
    NoAttempts,
    /// The reload flag could not be read or written.
    #[error("session store error: {0}")]
    Store(#[from] StoreError),
}

impl<E> RetryError<E> {
    /// Returns the operation's error, if this failure carries one.
    pub fn into_source(self) -> Option<E> {
        match self {
            Self::OperationFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Error raised by a [`crate::SessionStore`] backend.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The backing storage threw or is not accessible.
    #[error("session storage unavailable: {0}")]
    Unavailable(String),
    /// A stored value could not be decoded.
    #[error("corrupt value for '{key}': {value}")]
    Corrupt { key: String, value: String },
}
