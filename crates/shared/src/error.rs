use thiserror::Error;

/// Failure taxonomy the core surfaces to its caller. Every failed operation
/// maps to exactly one variant; nothing is swallowed or auto-retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Raised locally before any network call when a draft violates the
    /// name/price/category constraints.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The repository reports that the targeted id does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Network, timeout or unreachable-repository failure. Retryable at the
    /// caller's discretion; the core itself never retries.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The repository answered with an unexpected failure (5xx-equivalent),
    /// surfaced verbatim.
    #[error("repository error (status {status}): {message}")]
    Server { status: u16, message: String },

    /// A 2xx response whose envelope could not be decoded or that reported
    /// `success: false`.
    #[error("unexpected repository response: {0}")]
    UnexpectedResponse(String),
}

impl CatalogError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, CatalogError::Transport(_))
    }
}
