//! # Error Types
//!
//! Registry errors surfaced to callers, plus the errors reported by the
//! storage and transfer collaborators.

use crate::domain::entities::EntityKind;
use rr_01_derivation::{DerivationError, Location};
use thiserror::Error;

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

// =============================================================================
// REGISTRY ERRORS
// =============================================================================

/// Errors returned by registry operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Target record does not exist.
    #[error("{kind} not found at {location}")]
    NotFound { kind: EntityKind, location: Location },

    /// Location already occupied (duplicate create or confirmation).
    #[error("{kind} already exists at {location}")]
    AlreadyExists { kind: EntityKind, location: Location },

    /// Authorization, role or ownership failure.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Transition not valid in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Stake is still locked.
    #[error("too early: stake unlocks at {unlock_at}, now {now}")]
    TooEarly { unlock_at: u64, now: u64 },

    /// The funding source could not cover a stake transfer.
    #[error("insufficient funds: {required} required")]
    InsufficientFunds { required: u128 },

    /// Risk score above the allowed maximum.
    #[error("risk score {0} out of range 0..=10")]
    RiskOutOfRange(u8),

    /// Identifier does not fit its fixed-width field.
    #[error(transparent)]
    Encoding(#[from] DerivationError),

    /// A collaborator timed out or was unreachable.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Concurrent modification of an existing record.
    #[error("write conflict at {location}")]
    Conflict { location: Location },

    /// Stored record could not be decoded.
    #[error("corrupted record at {location}: {reason}")]
    Corrupted { location: Location, reason: String },
}

impl RegistryError {
    /// True when retrying the whole operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Conflict { .. })
    }

    /// True for the expected loser of a concurrent create.
    #[must_use]
    pub fn is_expected_race(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Short label used for metrics and logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::AlreadyExists { .. } => "already_exists",
            Self::Forbidden(_) => "forbidden",
            Self::InvalidState(_) => "invalid_state",
            Self::TooEarly { .. } => "too_early",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::RiskOutOfRange(_) => "risk_out_of_range",
            Self::Encoding(_) => "encoding",
            Self::Unavailable(_) => "unavailable",
            Self::Conflict { .. } => "conflict",
            Self::Corrupted { .. } => "corrupted",
        }
    }
}

// =============================================================================
// COLLABORATOR ERRORS
// =============================================================================

/// Errors reported by the storage substrate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// An expected prior state did not hold.
    #[error("storage conflict at {location}")]
    Conflict { location: Location },

    /// Substrate unreachable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors reported by the funding/transfer collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// Source balance too low.
    #[error("insufficient balance: required {required}, available {available}")]
    Insufficient { required: u128, available: u128 },

    /// Transfer service unreachable.
    #[error("transfer unavailable: {0}")]
    Unavailable(String),
}

impl From<TransferError> for RegistryError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Insufficient { required, .. } => Self::InsufficientFunds { required },
            TransferError::Unavailable(reason) => Self::Unavailable(reason),
        }
    }
}
