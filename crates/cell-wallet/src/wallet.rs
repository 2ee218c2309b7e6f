//! Wallet composition: one secret key, its lock, and the send pipeline.
//!
//! The [`Wallet`] ties together cell paging, input selection, transaction
//! building and signing against a [`LedgerRpc`]. Its own lock script and
//! lock hash are derived once at construction; apart from the secret key it
//! holds no state between calls.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use cell_core::crypto::{Ed25519Signer, PublicKey, SecretKey};
use cell_core::lock::LockScript;
use cell_core::traits::{DigestSigner, LedgerRpc};
use cell_core::types::{Cell, Hash256, Transaction};

use crate::builder::TransactionBuilder;
use crate::coin_selection::InputSelector;
use crate::config::WalletConfig;
use crate::error::{CapacityShortfall, WalletError};
use crate::pager::CellPager;
use crate::signer::sign_transaction;

/// Single-key wallet.
pub struct Wallet {
    key: SecretKey,
    public_key: PublicKey,
    lock: LockScript,
    lock_hash: Hash256,
    rpc: Arc<dyn LedgerRpc>,
    signer: Arc<dyn DigestSigner>,
    config: WalletConfig,
}

impl Wallet {
    /// Open a wallet with the Ed25519 backend and default configuration.
    pub fn from_hex_key(secret_hex: &str, rpc: Arc<dyn LedgerRpc>) -> Result<Self, WalletError> {
        Self::with_config(secret_hex, rpc, Arc::new(Ed25519Signer), WalletConfig::default())
    }

    /// Open a wallet with an explicit backend and configuration.
    ///
    /// The key shape is checked before any cryptographic or network call.
    /// Construction then fetches the standard script's code reference once
    /// to derive the wallet's lock.
    pub fn with_config(
        secret_hex: &str,
        rpc: Arc<dyn LedgerRpc>,
        signer: Arc<dyn DigestSigner>,
        config: WalletConfig,
    ) -> Result<Self, WalletError> {
        let key = SecretKey::from_hex(secret_hex).map_err(WalletError::invalid_key)?;
        config.validate()?;

        let public_key = signer.public_key(&key).map_err(WalletError::signing)?;
        let code_reference = rpc.standard_script_code_reference()?;
        let lock = LockScript::from_public_key(code_reference, &public_key);
        let lock_hash = lock.hash();

        info!(%lock_hash, %public_key, "wallet: opened");
        Ok(Self {
            key,
            public_key,
            lock,
            lock_hash,
            rpc,
            signer,
            config,
        })
    }

    /// The wallet's public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The lock script guarding the wallet's cells.
    pub fn lock(&self) -> &LockScript {
        &self.lock
    }

    /// Hash of [`lock`](Self::lock), used to query cells.
    pub fn lock_hash(&self) -> Hash256 {
        self.lock_hash
    }

    /// Active configuration.
    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// Human-readable address of the wallet's lock.
    pub fn address(&self) -> Result<String, WalletError> {
        Ok(self.rpc.encode_address(&self.lock)?)
    }

    /// Live cells owned by this wallet.
    pub fn get_unspent_cells(&self) -> Result<Vec<Cell>, WalletError> {
        self.pager().list_unspent(&self.lock_hash)
    }

    /// Total capacity of the wallet's live cells.
    pub fn get_balance(&self) -> Result<u64, WalletError> {
        self.pager().balance(&self.lock_hash)
    }

    /// Build and sign a transaction paying `capacity` to `target_lock`.
    ///
    /// Nothing is submitted. Fails with
    /// [`InsufficientCapacity`](WalletError::InsufficientCapacity) before any
    /// network call when `capacity` is below the minimum cell capacity.
    pub fn build_send(
        &self,
        target_lock: &LockScript,
        capacity: u64,
    ) -> Result<Transaction, WalletError> {
        self.check_min_capacity(capacity)?;

        let cells = self.get_unspent_cells()?;
        let selection =
            InputSelector::select(&cells, capacity, self.config.min_capacity, &self.public_key)?;
        let dep = self.rpc.standard_script_dependency()?;
        let draft = TransactionBuilder::new()
            .set_min_capacity(self.config.min_capacity)
            .build(target_lock, capacity, &selection, &self.lock, vec![dep]);

        sign_transaction(draft, &self.key, self.signer.as_ref())
    }

    /// Build, sign and submit a payment to `target_lock`. Returns the
    /// transaction hash reported by the node.
    pub fn send_capacity(
        &self,
        target_lock: &LockScript,
        capacity: u64,
    ) -> Result<Hash256, WalletError> {
        let tx = self.build_send(target_lock, capacity)?;
        let hash = self.rpc.submit_transaction(&tx)?;
        info!(
            %hash,
            capacity,
            inputs = tx.inputs.len(),
            outputs = tx.outputs.len(),
            "wallet: transaction submitted"
        );
        Ok(hash)
    }

    /// Pay `capacity` to the lock named by a human-readable address.
    pub fn send_to_address(&self, address: &str, capacity: u64) -> Result<Hash256, WalletError> {
        self.check_min_capacity(capacity)?;
        let target_lock = self.rpc.parse_address(address)?;
        self.send_capacity(&target_lock, capacity)
    }

    /// Look up a transaction by hash.
    pub fn get_transaction(&self, hash: &Hash256) -> Result<Option<Transaction>, WalletError> {
        Ok(self.rpc.get_transaction(hash)?)
    }

    /// `[block_assembler]` stanza paying block rewards to this wallet.
    pub fn block_assembler_config(&self) -> String {
        self.lock.block_assembler_config()
    }

    fn pager(&self) -> CellPager<'_> {
        CellPager::new(self.rpc.as_ref(), self.config.page_window)
    }

    fn check_min_capacity(&self, capacity: u64) -> Result<(), WalletError> {
        if capacity < self.config.min_capacity {
            return Err(WalletError::InsufficientCapacity(
                CapacityShortfall::BelowMinimum {
                    target: capacity,
                    min_capacity: self.config.min_capacity,
                },
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("public_key", &self.public_key)
            .field("lock_hash", &self.lock_hash)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
