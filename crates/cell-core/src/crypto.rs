//! Keys, digests and the Ed25519 signing backend.
//!
//! Uses ed25519-dalek for signatures and BLAKE3 for public-key short hashes
//! and signing digests.
//!
//! # Signing scheme
//!
//! A transaction is signed once, sighash-all. The digest commits to:
//! - Transaction version
//! - All deps (tx_hash + index)
//! - All input previous outputs (tx_hash + index)
//! - All outputs (capacity, data, lock)
//!
//! Witnesses are excluded: they are produced from the digest, not covered by
//! it. Input `unlock_args` are excluded as well. Every input of a single-key
//! wallet carries the same `{ public_key, signature }` witness.

use ed25519_dalek::{Signer as _, Verifier as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{SECRET_KEY_HEX_LEN, SECRET_KEY_PREFIX, SHORT_HASH_LEN, SIGHASH_CONTEXT};
use crate::error::CryptoError;
use crate::traits::DigestSigner;
use crate::types::{Hash256, Transaction};

/// 32 bytes of secret key material, zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: [u8; 32],
}

impl SecretKey {
    /// Create a secret key from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Parse a `0x`-prefixed, 64-digit hex secret key.
    ///
    /// The shape is checked strictly before any decoding: exactly
    /// 66 characters, the `0x` prefix, then only `[0-9a-fA-F]`.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        if s.len() != SECRET_KEY_HEX_LEN {
            return Err(CryptoError::InvalidKey(format!(
                "expected {SECRET_KEY_HEX_LEN} characters, got {}",
                s.len()
            )));
        }
        let Some(body) = s.strip_prefix(SECRET_KEY_PREFIX) else {
            return Err(CryptoError::InvalidKey(format!(
                "missing {SECRET_KEY_PREFIX} prefix"
            )));
        };
        if let Some(c) = body.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(CryptoError::InvalidKey(format!("non-hex character {c:?}")));
        }

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(body, &mut bytes)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self { bytes })
    }

    /// Get the raw secret key bytes. Handle with care.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Backend-agnostic public key bytes.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey(pub Vec<u8>);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(&self.0))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

/// Backend-agnostic signature bytes.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Signature(pub Vec<u8>);

impl Signature {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", hex::encode(&self.0))
    }
}

/// Truncated BLAKE3 of raw public key bytes, as carried in lock args.
pub fn short_hash(pubkey_bytes: &[u8]) -> [u8; SHORT_HASH_LEN] {
    let full = blake3::hash(pubkey_bytes);
    let mut out = [0u8; SHORT_HASH_LEN];
    out.copy_from_slice(&full.as_bytes()[..SHORT_HASH_LEN]);
    out
}

/// Compute the sighash-all signing digest of a transaction.
///
/// Commits to version, deps, input outpoints and outputs. Witnesses and
/// unlock args are excluded, so the digest of a signed transaction equals
/// the digest of its unsigned draft.
pub fn signing_digest(tx: &Transaction) -> Hash256 {
    let mut data = Vec::new();

    data.extend_from_slice(&tx.version.to_le_bytes());

    data.extend_from_slice(&(tx.deps.len() as u64).to_le_bytes());
    for dep in &tx.deps {
        data.extend_from_slice(dep.tx_hash.as_bytes());
        data.extend_from_slice(&dep.index.to_le_bytes());
    }

    data.extend_from_slice(&(tx.inputs.len() as u64).to_le_bytes());
    for input in &tx.inputs {
        data.extend_from_slice(input.previous_output.tx_hash.as_bytes());
        data.extend_from_slice(&input.previous_output.index.to_le_bytes());
    }

    data.extend_from_slice(&(tx.outputs.len() as u64).to_le_bytes());
    for output in &tx.outputs {
        data.extend_from_slice(&output.capacity.to_le_bytes());
        data.extend_from_slice(&(output.data.len() as u64).to_le_bytes());
        data.extend_from_slice(&output.data);
        output.lock.write_canonical(&mut data);
    }

    let mut hasher = blake3::Hasher::new_derive_key(SIGHASH_CONTEXT);
    hasher.update(&data);
    Hash256(hasher.finalize().into())
}

/// Ed25519 backend. Signatures are deterministic by construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Signer;

impl DigestSigner for Ed25519Signer {
    fn public_key(&self, key: &SecretKey) -> Result<PublicKey, CryptoError> {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(key.as_bytes());
        Ok(PublicKey(signing_key.verifying_key().to_bytes().to_vec()))
    }

    fn sign(&self, digest: &Hash256, key: &SecretKey) -> Result<Signature, CryptoError> {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(key.as_bytes());
        Ok(Signature(signing_key.sign(digest.as_bytes()).to_bytes().to_vec()))
    }
}

/// Verify an Ed25519 signature over a digest.
pub fn verify_signature(
    public_key: &[u8],
    digest: &Hash256,
    signature: &[u8],
) -> Result<(), CryptoError> {
    let pk_bytes: [u8; 32] = public_key
        .try_into()
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    let vk = ed25519_dalek::VerifyingKey::from_bytes(&pk_bytes)
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    let sig_bytes: [u8; 64] = signature
        .try_into()
        .map_err(|_| CryptoError::InvalidSignature)?;
    let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);
    vk.verify(digest.as_bytes(), &sig)
        .map_err(|_| CryptoError::VerificationFailed)
}

/// Verify every witness of a transaction against the expected owner arg.
///
/// Checks that:
/// 1. There is exactly one witness per input
/// 2. Each witness public key short-hashes to `expected_arg`
/// 3. Each signature verifies against the signing digest
pub fn verify_transaction(tx: &Transaction, expected_arg: &[u8]) -> Result<(), CryptoError> {
    if tx.witnesses.len() != tx.inputs.len() {
        return Err(CryptoError::WitnessCountMismatch {
            inputs: tx.inputs.len(),
            witnesses: tx.witnesses.len(),
        });
    }

    let digest = signing_digest(tx);
    for witness in &tx.witnesses {
        if short_hash(&witness.public_key).as_slice() != expected_arg {
            return Err(CryptoError::PubkeyHashMismatch);
        }
        verify_signature(&witness.public_key, &digest, &witness.signature)?;
    }
    Ok(())
}
