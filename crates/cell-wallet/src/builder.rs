//! Transaction builder: payment output, optional change, deps and inputs.
//!
//! Produces an unsigned draft with empty witnesses:
//! 1. `outputs[0]` pays `target` to the destination lock
//! 2. `outputs[1]` returns `total - target` to the wallet when positive
//!
//! A change amount below the minimum cell capacity is still emitted, with a
//! `warn` event naming the change and the minimum.

use tracing::{debug, warn};

use cell_core::constants::{DEFAULT_MIN_CELL_CAPACITY, TX_VERSION};
use cell_core::lock::LockScript;
use cell_core::types::{OutPoint, Output, Transaction};

use crate::coin_selection::InputSelection;

/// Builder for unsigned transactions.
///
/// # Example
/// ```ignore
/// let selection = InputSelector::select(&cells, 100, 40, &pubkey)?;
/// let draft = TransactionBuilder::new().build(&to, 100, &selection, &own, vec![dep]);
/// let signed = sign_transaction(draft, &key, &Ed25519Signer)?;
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    version: u32,
    min_capacity: u64,
}

impl TransactionBuilder {
    /// Create a builder producing [`TX_VERSION`] transactions.
    pub fn new() -> Self {
        Self {
            version: TX_VERSION,
            min_capacity: DEFAULT_MIN_CELL_CAPACITY,
        }
    }

    /// Override the transaction version.
    pub fn set_version(&mut self, version: u32) -> &mut Self {
        self.version = version;
        self
    }

    /// Minimum cell capacity the change output is compared against.
    pub fn set_min_capacity(&mut self, min_capacity: u64) -> &mut Self {
        self.min_capacity = min_capacity;
        self
    }

    /// Assemble the draft transaction.
    ///
    /// # Arguments
    /// - `target_lock` — lock of the payment output
    /// - `target` — capacity paid to `target_lock`
    /// - `selection` — inputs and their total
    /// - `own_lock` — lock receiving change
    /// - `deps` — cells the transaction depends on without spending
    pub fn build(
        &self,
        target_lock: &LockScript,
        target: u64,
        selection: &InputSelection,
        own_lock: &LockScript,
        deps: Vec<OutPoint>,
    ) -> Transaction {
        let mut outputs = Vec::with_capacity(2);
        outputs.push(Output {
            capacity: target,
            data: Vec::new(),
            lock: target_lock.clone(),
        });

        let change = selection.change(target);
        if change > 0 {
            if change < self.min_capacity {
                warn!(
                    change,
                    min_capacity = self.min_capacity,
                    "builder: change output below minimum cell capacity"
                );
            }
            outputs.push(Output {
                capacity: change,
                data: Vec::new(),
                lock: own_lock.clone(),
            });
        }

        debug!(
            inputs = selection.inputs.len(),
            outputs = outputs.len(),
            target,
            change,
            "builder: draft assembled"
        );

        Transaction {
            version: self.version,
            deps,
            inputs: selection.inputs.clone(),
            outputs,
            witnesses: Vec::new(),
        }
    }
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
