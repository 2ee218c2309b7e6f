//! Witness generation.
//!
//! One signature over the transaction's sighash-all digest, repeated in one
//! witness per input. Every input of a single-key wallet is owned by the
//! same key, so the witnesses are identical.

use tracing::debug;

use cell_core::crypto::{SecretKey, signing_digest};
use cell_core::traits::DigestSigner;
use cell_core::types::{Transaction, Witness};

use crate::error::WalletError;

/// Sign `tx` with `key`, replacing any existing witnesses.
///
/// Backend failures are reported as [`WalletError::SigningFailure`].
pub fn sign_transaction(
    mut tx: Transaction,
    key: &SecretKey,
    backend: &dyn DigestSigner,
) -> Result<Transaction, WalletError> {
    let digest = signing_digest(&tx);
    let public_key = backend.public_key(key).map_err(WalletError::signing)?;
    let signature = backend.sign(&digest, key).map_err(WalletError::signing)?;

    tx.witnesses = tx
        .inputs
        .iter()
        .map(|_| Witness {
            public_key: public_key.0.clone(),
            signature: signature.0.clone(),
        })
        .collect();

    debug!(%digest, witnesses = tx.witnesses.len(), "signer: transaction signed");
    Ok(tx)
}
