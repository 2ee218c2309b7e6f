//! # cell-core
//! Foundation types, lock scripts and signing primitives for cell-based ledgers.

pub mod constants;
pub mod crypto;
pub mod error;
pub mod lock;
pub mod traits;
pub mod types;
