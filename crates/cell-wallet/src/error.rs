//! Wallet error types.

use std::fmt;

use cell_core::error::{CryptoError, RpcError};
use thiserror::Error;

/// Why a send could not be funded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityShortfall {
    /// The requested amount is itself smaller than the minimum cell capacity.
    BelowMinimum {
        /// Requested capacity.
        target: u64,
        /// Configured minimum cell capacity.
        min_capacity: u64,
    },
    /// The wallet's live cells do not add up to the requested amount.
    Unfunded {
        /// Sum of every scanned cell.
        available: u64,
        /// Requested capacity.
        target: u64,
    },
}

impl fmt::Display for CapacityShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowMinimum {
                target,
                min_capacity,
            } => write!(f, "target {target} below minimum cell capacity {min_capacity}"),
            Self::Unfunded { available, target } => {
                write!(f, "have {available}, need {target}")
            }
        }
    }
}

/// Errors that can occur in wallet operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Malformed, wrong-length or non-hex secret key.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Target below the minimum cell capacity, or not enough live cells.
    #[error("insufficient capacity: {0}")]
    InsufficientCapacity(CapacityShortfall),

    /// Failure reported by the ledger collaborator, passed through unchanged.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// The signing backend failed.
    #[error("signing failure: {0}")]
    SigningFailure(String),

    /// Capacities summed past `u64::MAX`.
    #[error("capacity overflow")]
    CapacityOverflow,

    /// Invalid wallet configuration.
    #[error("config: {0}")]
    Config(String),
}

impl WalletError {
    /// Map a key-parsing failure to [`WalletError::InvalidKey`].
    pub(crate) fn invalid_key(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidKey(msg) => Self::InvalidKey(msg),
            other => Self::InvalidKey(other.to_string()),
        }
    }

    /// Map a backend failure to [`WalletError::SigningFailure`].
    pub(crate) fn signing(err: CryptoError) -> Self {
        Self::SigningFailure(err.to_string())
    }
}
