//! Recovery flow state machine.
//!
//! ```text
//! Idle -> PacksCollected -> Decrypting -> Reconstructed -> Verified
//!      -> [RegeneratingMissingShare] -> Done
//! ```
//!
//! `Failed` is terminal and reachable from every working state.

use keyless_crypto::{CryptoError, KeyKind};
use tracing::debug;

use crate::errors::{KeylessError, Result};

/// Why a recovery stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Fewer than two usable packs or shares.
    InsufficientShares,
    /// The named pack did not open.
    Authentication(KeyKind),
    /// Reconstructed entropy is not a valid mnemonic.
    Checksum,
    /// Shares disagree or are malformed.
    CorruptShare,
    /// The missing share could not be recomputed.
    Regeneration,
}

impl FailureReason {
    /// Classify an engine error.
    pub fn from_error(err: &KeylessError) -> Self {
        match err {
            KeylessError::AuthenticationFailed { kind } => Self::Authentication(*kind),
            KeylessError::InsufficientShares { .. }
            | KeylessError::NoPacksProvided
            | KeylessError::Crypto(CryptoError::InsufficientShares { .. }) => Self::InsufficientShares,
            KeylessError::Crypto(CryptoError::Checksum) => Self::Checksum,
            KeylessError::Crypto(CryptoError::InvalidEvaluationPoint(_)) => Self::Regeneration,
            _ => Self::CorruptShare,
        }
    }
}

/// States of a single recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryState {
    Idle,
    PacksCollected,
    Decrypting,
    Reconstructed,
    Verified,
    RegeneratingMissingShare,
    Done,
    Failed(FailureReason),
}

impl RecoveryState {
    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(&self, next: &RecoveryState) -> bool {
        use RecoveryState::*;
        matches!(
            (self, next),
            (Idle, PacksCollected)
                | (PacksCollected, Decrypting)
                | (Decrypting, Reconstructed)
                | (Reconstructed, Verified)
                | (Verified, RegeneratingMissingShare)
                | (Verified, Done)
                | (RegeneratingMissingShare, Done)
                | (PacksCollected, Failed(_))
                | (Decrypting, Failed(_))
                | (Reconstructed, Failed(_))
                | (RegeneratingMissingShare, Failed(_))
        )
    }

    /// `Done` or `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RecoveryState::Done | RecoveryState::Failed(_))
    }
}

/// Tracks one recovery through its states and keeps the trace.
#[derive(Debug, Clone)]
pub struct RecoveryFlow {
    state: RecoveryState,
    trace: Vec<RecoveryState>,
}

impl Default for RecoveryFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl RecoveryFlow {
    pub fn new() -> Self {
        Self {
            state: RecoveryState::Idle,
            trace: vec![RecoveryState::Idle],
        }
    }

    pub fn state(&self) -> RecoveryState {
        self.state
    }

    /// Every state visited, starting with `Idle`.
    pub fn trace(&self) -> &[RecoveryState] {
        &self.trace
    }

    /// Move to `next`, rejecting illegal transitions.
    pub fn advance(&mut self, next: RecoveryState) -> Result<()> {
        if !self.state.can_transition_to(&next) {
            return Err(KeylessError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        debug!(from = ?self.state, state = ?next, "Recovery state transition");
        self.state = next;
        self.trace.push(next);
        Ok(())
    }

    /// Record `err` as the failure reason and hand it back.
    ///
    /// Meant for `map_err`: the original error always wins over a transition
    /// error.
    pub fn fail(&mut self, err: KeylessError) -> KeylessError {
        let reason = FailureReason::from_error(&err);
        if let Err(transition) = self.advance(RecoveryState::Failed(reason)) {
            debug!(error = %transition, "Failure recorded outside a working state");
        }
        err
    }
}
