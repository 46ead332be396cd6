//! Error types for keyless cryptographic operations.

use thiserror::Error;

/// Errors produced by the keyless primitives.
///
/// `AuthenticationError` carries no detail: a wrong password,
/// a tampered blob and a truncated blob all surface as the same variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Share or blob text is not valid base64 / hex.
    #[error("Malformed encoding: {0}")]
    Decode(String),

    /// Fewer shares than the reconstruction threshold.
    #[error("Insufficient shares: required {required}, provided {provided}")]
    InsufficientShares {
        /// Threshold k
        required: usize,
        /// Number of shares supplied
        provided: usize,
    },

    /// Shares are malformed or do not lie on a single polynomial.
    #[error("Corrupt share: {0}")]
    CorruptShare(String),

    /// Two supplied shares carry the same x-coordinate.
    #[error("Duplicate evaluation point: {0}")]
    DuplicateEvaluationPoint(u8),

    /// Pack could not be opened: wrong password or tampered ciphertext.
    #[error("Authentication failed")]
    AuthenticationError,

    /// Mnemonic failed BIP-39 validation, or entropy has an invalid length.
    #[error("Mnemonic checksum validation failed")]
    Checksum,

    /// Evaluation point is zero or collides with a known share.
    #[error("Invalid evaluation point: {0}")]
    InvalidEvaluationPoint(u8),

    /// Threshold parameters are out of range.
    #[error("Invalid threshold: k={threshold}, n={total}")]
    InvalidThreshold {
        /// Requested threshold k
        threshold: usize,
        /// Requested share count n
        total: usize,
    },

    /// The OS random source failed.
    #[error("Random generation failed: {0}")]
    RandomGenerationFailed(String),

    /// HKDF or Argon2 failed.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// Caller supplied an invalid argument.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result alias for keyless cryptographic operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
