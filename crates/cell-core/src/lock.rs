//! Lock scripts: the ownership predicate attached to every cell.
//!
//! The standard single-key lock references the network's signature
//! verification script by code hash and carries one argument, the short hash
//! of the owner's public key. Spending such a cell requires a witness whose
//! public key hashes to that argument and whose signature verifies.

use serde::{Deserialize, Serialize};

use crate::crypto::{PublicKey, short_hash};
use crate::types::Hash256;

/// An ownership predicate: `{ code_reference, args }`.
///
/// Two lock scripts are equal iff both fields are equal.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash,
    bincode::Encode, bincode::Decode,
)]
pub struct LockScript {
    /// Hash identifying the script code that evaluates this lock.
    pub code_reference: Hash256,
    /// Ordered arguments passed to the script.
    pub args: Vec<Vec<u8>>,
}

impl LockScript {
    /// Build a lock script from an already-known code reference and args.
    pub fn new(code_reference: Hash256, args: Vec<Vec<u8>>) -> Self {
        Self {
            code_reference,
            args,
        }
    }

    /// Derive the standard single-key lock for `public_key`.
    pub fn from_public_key(code_reference: Hash256, public_key: &PublicKey) -> Self {
        Self::new(
            code_reference,
            vec![short_hash(public_key.as_bytes()).to_vec()],
        )
    }

    /// Append the canonical encoding: `code_reference || arg_count ||
    /// (len || arg)*`, with counts and lengths as little-endian u64.
    ///
    /// Shared by the lock hash and the signing digest.
    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.code_reference.as_bytes());
        out.extend_from_slice(&(self.args.len() as u64).to_le_bytes());
        for arg in &self.args {
            out.extend_from_slice(&(arg.len() as u64).to_le_bytes());
            out.extend_from_slice(arg);
        }
    }

    /// Compute the lock hash used to index cells on the ledger: BLAKE3 over
    /// [`write_canonical`](Self::write_canonical).
    pub fn hash(&self) -> Hash256 {
        let mut encoded = Vec::new();
        self.write_canonical(&mut encoded);
        Hash256(blake3::hash(&encoded).into())
    }

    /// Render the `[block_assembler]` stanza a node needs to pay block
    /// rewards to this lock.
    ///
    /// ```
    /// use cell_core::lock::LockScript;
    /// use cell_core::types::Hash256;
    /// let lock = LockScript::new(Hash256([0x01; 32]), vec![vec![1, 2], vec![255]]);
    /// let text = lock.block_assembler_config();
    /// assert!(text.ends_with("args = [[1, 2], [255]]"));
    /// ```
    pub fn block_assembler_config(&self) -> String {
        let args = self
            .args
            .iter()
            .map(|arg| {
                let bytes: Vec<String> = arg.iter().map(u8::to_string).collect();
                format!("[{}]", bytes.join(", "))
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "[block_assembler]\nbinary_hash = \"{}\"\nargs = [{}]",
            self.code_reference.to_prefixed_hex(),
            args
        )
    }
}
