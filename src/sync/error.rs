//! Sync error types.

use crate::backup::CodecError;

/// Failures surfaced by the remote content store. `NotFound` is not among
/// them: an absent remote document is a valid fetch outcome, not an error.
#[derive(Debug)]
pub enum RemoteError {
    /// Bad or missing credentials (HTTP 401/403). Requires the user to
    /// re-enter remote settings; never retried automatically.
    Auth,
    /// Version token mismatch on a conditioned write: the remote document
    /// changed since it was last fetched.
    Conflict,
    /// Transport-level failure. The user may retry by performing another
    /// mutation.
    Network(String),
    /// The remote payload could not be unwrapped or parsed.
    Malformed(CodecError),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::Auth => write!(f, "Authentication failed; check remote settings"),
            RemoteError::Conflict => {
                write!(f, "Remote backup changed since last fetch (version conflict)")
            }
            RemoteError::Network(e) => write!(f, "Network failure: {}", e),
            RemoteError::Malformed(e) => write!(f, "Remote data unreadable: {}", e),
        }
    }
}

impl std::error::Error for RemoteError {}

impl From<CodecError> for RemoteError {
    fn from(e: CodecError) -> Self {
        RemoteError::Malformed(e)
    }
}

/// Hard failures of a sync attempt: the local store or the codec broke.
/// Remote failures never appear here; they fold into the sync status and
/// leave local data untouched.
#[derive(Debug)]
pub enum SyncError {
    Storage(sqlx::Error),
    Codec(CodecError),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Storage(e) => write!(f, "Storage failure: {}", e),
            SyncError::Codec(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Storage(e) => Some(e),
            SyncError::Codec(e) => Some(e),
        }
    }
}

impl From<sqlx::Error> for SyncError {
    fn from(e: sqlx::Error) -> Self {
        SyncError::Storage(e)
    }
}

impl From<CodecError> for SyncError {
    fn from(e: CodecError) -> Self {
        SyncError::Codec(e)
    }
}
