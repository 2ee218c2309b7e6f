//! Ledger data model: cells, out points, inputs, outputs, transactions.
//!
//! All capacities are `u64` in the ledger's minimal unit. A cell is consumed
//! whole when referenced as an input; there is no partial spend.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TransactionError;
use crate::lock::LockScript;

/// A 32-byte hash value.
///
/// Used for transaction hashes, lock hashes, script code references and
/// signing digests (all BLAKE3).
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// The zero hash (32 zero bytes).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create a Hash256 from a byte array.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero hash.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Lowercase hex with a `0x` prefix, the form node configuration files expect.
    pub fn to_prefixed_hex(&self) -> String {
        format!("0x{self}")
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Reference to a specific output of a previous transaction.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash,
    bincode::Encode, bincode::Decode,
)]
pub struct OutPoint {
    /// Hash of the transaction that created the output.
    pub tx_hash: Hash256,
    /// Index of the output within that transaction.
    pub index: u32,
}

impl OutPoint {
    pub fn new(tx_hash: Hash256, index: u32) -> Self {
        Self { tx_hash, index }
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_hash, self.index)
    }
}

/// A live, spendable cell as reported by the ledger.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct Cell {
    /// Where the cell was created.
    pub out_point: OutPoint,
    /// Value held by the cell.
    pub capacity: u64,
    /// Opaque payload.
    pub data: Vec<u8>,
    /// Ownership predicate guarding the cell.
    pub lock: LockScript,
}

/// A proposed new cell, not yet committed.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct Output {
    pub capacity: u64,
    pub data: Vec<u8>,
    pub lock: LockScript,
}

/// A transaction input consuming a previously created cell.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct Input {
    /// The cell being spent.
    pub previous_output: OutPoint,
    /// Extra arguments handed to the lock script. Empty for the standard lock.
    pub unlock_args: Vec<Vec<u8>>,
}

impl Input {
    /// An input spending `previous_output` with no unlock arguments.
    pub fn spending(previous_output: OutPoint) -> Self {
        Self {
            previous_output,
            unlock_args: Vec::new(),
        }
    }
}

/// Per-input authorization data.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct Witness {
    /// Raw public key bytes of the signer.
    pub public_key: Vec<u8>,
    /// Raw signature over the transaction's signing digest.
    pub signature: Vec<u8>,
}

/// A transaction moving capacity between lock scripts.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct Transaction {
    /// Protocol version.
    pub version: u32,
    /// Cells referenced for validation without being spent.
    pub deps: Vec<OutPoint>,
    /// Cells consumed.
    pub inputs: Vec<Input>,
    /// Cells created.
    pub outputs: Vec<Output>,
    /// Aligned 1:1 with `inputs` once signed; empty before.
    pub witnesses: Vec<Witness>,
}

impl Transaction {
    /// Compute the transaction hash.
    ///
    /// BLAKE3 over the bincode encoding of the transaction with its
    /// witnesses stripped, so signing does not change the hash.
    pub fn hash(&self) -> Result<Hash256, TransactionError> {
        let stripped = Transaction {
            witnesses: Vec::new(),
            ..self.clone()
        };
        let encoded = bincode::encode_to_vec(&stripped, bincode::config::standard())
            .map_err(|e| TransactionError::Serialization(e.to_string()))?;
        Ok(Hash256(blake3::hash(&encoded).into()))
    }

    /// Sum of all output capacities. Returns None on overflow.
    pub fn total_output_capacity(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, out| acc.checked_add(out.capacity))
    }

    /// Whether every input has a matching witness.
    pub fn is_signed(&self) -> bool {
        !self.inputs.is_empty() && self.witnesses.len() == self.inputs.len()
    }
}
