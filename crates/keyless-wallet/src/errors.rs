//! Error types for the keyless wallet engine.

use keyless_crypto::{CryptoError, KeyKind};
use thiserror::Error;

use crate::recovery::RecoveryState;

/// Keyless wallet errors.
#[derive(Debug, Error)]
pub enum KeylessError {
    /// A cryptographic primitive failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Restore called without any pack.
    #[error("No packs provided")]
    NoPacksProvided,

    /// Two supplied packs belong to different pack sets.
    #[error("Pack set id does not match: {expected} != {actual}")]
    PackSetMismatch {
        /// Pack set id of the first pack
        expected: String,
        /// Pack set id of the conflicting pack
        actual: String,
    },

    /// A specific pack could not be opened with the password derived for it.
    #[error("Failed to decrypt {kind} pack")]
    AuthenticationFailed {
        /// The pack that failed
        kind: KeyKind,
    },

    /// Pack set id is not 32 lowercase hex characters.
    #[error("Invalid packSetId: must be a 32-character lowercase hex string")]
    InvalidPackSetId,

    /// Fewer packs or shares than the threshold.
    #[error("Insufficient shares: required {required}, provided {provided}")]
    InsufficientShares {
        /// Threshold
        required: usize,
        /// Number supplied
        provided: usize,
    },

    /// Required field missing or empty.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Recovery flow was driven out of order.
    #[error("Invalid recovery transition: {from:?} -> {to:?}")]
    InvalidTransition {
        /// Current state
        from: RecoveryState,
        /// Requested state
        to: RecoveryState,
    },

    /// Pack store failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization failure outside of pack decryption.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Blocking task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    TaskJoin(String),
}

impl KeylessError {
    /// Map insufficient-share crypto errors onto the engine variant so callers
    /// match a single kind.
    pub(crate) fn normalize(self) -> Self {
        match self {
            Self::Crypto(CryptoError::InsufficientShares { required, provided }) => {
                Self::InsufficientShares { required, provided }
            }
            other => other,
        }
    }
}

impl From<serde_json::Error> for KeylessError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<tokio::task::JoinError> for KeylessError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskJoin(err.to_string())
    }
}

/// Result type for keyless wallet operations.
pub type Result<T> = std::result::Result<T, KeylessError>;
