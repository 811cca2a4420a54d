//! Error types for identifier resolution and the storage ports.

use thiserror::Error;

/// Failures surfaced to callers of [`crate::cid::CidService`].
///
/// An absent identifier is not an error: it is `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CidError {
    /// The scope contains characters outside `[A-Za-z0-9_-]`, or is empty.
    #[error("invalid scope {0:?}: must match [A-Za-z0-9_-]+")]
    InvalidScope(String),

    /// The embedding host was asked for a base id and had none.
    #[error("no identifier available from delegated host")]
    NoIdentifier,

    /// A proxy-only operation was invoked on a document served directly.
    #[error("not a proxy origin: {0}")]
    NotProxyOrigin(String),

    /// The document URL could not be parsed.
    #[error("invalid document url {url}: {reason}")]
    InvalidUrl {
        /// The rejected input.
        url: String,
        /// Parser message.
        reason: String,
    },
}

/// Failure reported by a key/value store or cookie jar adapter.
///
/// Managers collapse these to "absent"; they never reach `resolve` callers.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store is disabled or unreachable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The write was rejected for lack of space.
    #[error("storage quota exceeded")]
    QuotaExceeded,

    /// Underlying I/O failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored bytes did not decode.
    #[error("malformed stored value: {0}")]
    Malformed(String),
}

/// The strong randomness source could not produce bytes.
#[derive(Debug, Error)]
#[error("strong entropy unavailable: {0}")]
pub struct EntropyError(pub String);
