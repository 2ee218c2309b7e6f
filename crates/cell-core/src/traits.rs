//! Trait interfaces at the crate seams.
//!
//! - [`LedgerRpc`]: the node collaborator a wallet reads cells from and
//!   submits transactions to (transport lives outside this workspace)
//! - [`DigestSigner`]: the elliptic-curve backend producing public keys and
//!   signatures over a 32-byte digest

use crate::crypto::{PublicKey, SecretKey, Signature};
use crate::error::{CryptoError, RpcError};
use crate::lock::LockScript;
use crate::types::{Cell, Hash256, OutPoint, Transaction};

/// Blocking view of a ledger node.
///
/// Every method is one round trip. Implementations report failures as
/// [`RpcError`]; callers propagate them unchanged and never retry.
pub trait LedgerRpc: Send + Sync {
    /// Height of the current chain tip.
    fn tip_height(&self) -> Result<u64, RpcError>;

    /// Live cells guarded by `lock_hash` created in blocks `from..=to`.
    fn cells_by_lock_hash(
        &self,
        lock_hash: &Hash256,
        from: u64,
        to: u64,
    ) -> Result<Vec<Cell>, RpcError>;

    /// Decode a human-readable address into the lock script it names.
    fn parse_address(&self, address: &str) -> Result<LockScript, RpcError>;

    /// Encode a lock script as a human-readable address.
    fn encode_address(&self, lock: &LockScript) -> Result<String, RpcError>;

    /// Code reference of the network's standard signature-verification script.
    fn standard_script_code_reference(&self) -> Result<Hash256, RpcError>;

    /// The cell defining the standard script, to be listed as a dep.
    fn standard_script_dependency(&self) -> Result<OutPoint, RpcError>;

    /// Submit a signed transaction, returning its hash.
    fn submit_transaction(&self, tx: &Transaction) -> Result<Hash256, RpcError>;

    /// Look up a transaction by hash. Returns `None` if unknown.
    fn get_transaction(&self, hash: &Hash256) -> Result<Option<Transaction>, RpcError>;
}

/// Narrow signing capability over a fixed-size digest.
///
/// Keeping the curve behind this trait lets selection and building be
/// tested against a mock backend.
pub trait DigestSigner: Send + Sync {
    /// Derive the public key for `key`.
    fn public_key(&self, key: &SecretKey) -> Result<PublicKey, CryptoError>;

    /// Sign `digest` with `key`.
    fn sign(&self, digest: &Hash256, key: &SecretKey) -> Result<Signature, CryptoError>;
}
