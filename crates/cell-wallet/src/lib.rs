//! # cell-wallet — single-key wallet for cell-based ledgers.
//!
//! Lists a wallet's live cells, greedily selects inputs under a minimum cell
//! capacity, builds payment and change outputs, and signs the result with
//! one sighash-all signature.
//!
//! # Modules
//!
//! - [`error`] — `WalletError` enum
//! - [`config`] — `WalletConfig` (minimum capacity, page window)
//! - [`pager`] — windowed cell listing and balance
//! - [`coin_selection`] — first-fit input selection
//! - [`builder`] — transaction skeleton with payment and change outputs
//! - [`signer`] — witness generation
//! - [`wallet`] — high-level wallet composition

pub mod builder;
pub mod coin_selection;
pub mod config;
pub mod error;
pub mod pager;
pub mod signer;
pub mod wallet;

#[cfg(test)]
mod mocks;

// Re-exports for convenient access
pub use builder::TransactionBuilder;
pub use coin_selection::{InputSelection, InputSelector};
pub use config::WalletConfig;
pub use error::{CapacityShortfall, WalletError};
pub use pager::CellPager;
pub use signer::sign_transaction;
pub use wallet::Wallet;
