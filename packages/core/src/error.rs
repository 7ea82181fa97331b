//! Error taxonomy for lifecycle operations.

use thiserror::Error;

/// Result type for marketplace operations.
pub type MarketResult<T> = Result<T, MarketError>;

/// Errors returned by the lifecycle coordinator.
///
/// `Validation`, `NotFound` and `Authorization` are terminal for the caller.
/// `Conflict` means the request raced a state change; the caller should
/// refresh before retrying the user action. The coordinator never retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not authorized: {0}")]
    Authorization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Coordinator unavailable: {0}")]
    Unavailable(String),
}

/// Coarse error category, stable across message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Authorization,
    Storage,
    Unavailable,
}

impl MarketError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarketError::Validation(_) => ErrorKind::Validation,
            MarketError::NotFound(_) => ErrorKind::NotFound,
            MarketError::Conflict(_) => ErrorKind::Conflict,
            MarketError::Authorization(_) => ErrorKind::Authorization,
            MarketError::Storage(_) => ErrorKind::Storage,
            MarketError::Unavailable(_) => ErrorKind::Unavailable,
        }
    }

    /// Whether the failure is the caller's fault (4xx in HTTP terms).
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            MarketError::Storage(_) | MarketError::Unavailable(_)
        )
    }
}
