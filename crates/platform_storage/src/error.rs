//! Error type shared by the player-store strategies.

use platform_host::RemoteError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failure inside a [`PlayerStore`](crate::PlayerStore) strategy.
///
/// [`DatabaseManager`](crate::DatabaseManager) absorbs these; callers that need to tell "no data"
/// apart from "load failed" use [`DatabaseManager::checked`](crate::DatabaseManager::checked).
pub enum StorageError {
    /// The remote backend or its transport failed.
    #[error("remote store: {0}")]
    Remote(#[from] RemoteError),
    /// The local fallback store failed (unavailable, quota, ...).
    #[error("local store: {0}")]
    Local(String),
    /// A payload could not be encoded or decoded.
    #[error("codec: {0}")]
    Codec(String),
}

impl StorageError {
    pub(crate) fn codec(err: serde_json::Error) -> Self {
        Self::Codec(err.to_string())
    }
}
