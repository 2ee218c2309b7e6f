//! Error types for cell-core.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("serialization: {0}")] Serialization(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid secret key: {0}")] InvalidKey(String),
    #[error("invalid public key bytes")] InvalidPublicKey,
    #[error("invalid signature bytes")] InvalidSignature,
    #[error("signature verification failed")] VerificationFailed,
    #[error("pubkey hash does not match lock args")] PubkeyHashMismatch,
    #[error("witness count mismatch: {inputs} inputs, {witnesses} witnesses")]
    WitnessCountMismatch { inputs: usize, witnesses: usize },
    #[error("signing backend: {0}")] Backend(String),
}

/// Failures surfaced by the ledger RPC collaborator. Passed through unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error("transport: {0}")] Transport(String),
    #[error("rejected by node: {0}")] Rejected(String),
    #[error("invalid response: {0}")] InvalidResponse(String),
    #[error("invalid address: {0}")] InvalidAddress(String),
}
