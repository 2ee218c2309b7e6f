//! First-fit input selection.
//!
//! Walks cells in listing order and takes each one until the running total
//! covers the target with at least a minimum-capacity remainder for change.
//! There is no sorting and no attempt to minimise input count or fees.
//!
//! When the cells run out after the target is covered but before the
//! remainder reaches the minimum, the selection is still returned. The
//! resulting change may be smaller than the minimum cell capacity; callers
//! see it in [`InputSelection::change`].

use tracing::debug;

use cell_core::crypto::PublicKey;
use cell_core::types::{Cell, Input};

use crate::error::{CapacityShortfall, WalletError};

/// Result of input selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSelection {
    /// Inputs spending the selected cells, in listing order.
    pub inputs: Vec<Input>,
    /// Total capacity of the selected cells.
    pub total: u64,
    /// Owner public key, once per input.
    pub pubkeys: Vec<PublicKey>,
}

impl InputSelection {
    /// Capacity left over after paying `target`.
    pub fn change(&self, target: u64) -> u64 {
        self.total.saturating_sub(target)
    }
}

/// Greedy first-fit selector.
pub struct InputSelector;

impl InputSelector {
    /// Select inputs covering `target`.
    ///
    /// # Arguments
    /// - `cells` — live cells in listing order
    /// - `target` — capacity to pay out
    /// - `min_capacity` — minimum capacity of any cell
    /// - `owner_pubkey` — public key owning every cell
    ///
    /// Fails before looking at any cell when `target < min_capacity`.
    pub fn select(
        cells: &[Cell],
        target: u64,
        min_capacity: u64,
        owner_pubkey: &PublicKey,
    ) -> Result<InputSelection, WalletError> {
        if target < min_capacity {
            return Err(WalletError::InsufficientCapacity(
                CapacityShortfall::BelowMinimum {
                    target,
                    min_capacity,
                },
            ));
        }

        let mut inputs = Vec::new();
        let mut pubkeys = Vec::new();
        let mut total: u64 = 0;

        for cell in cells {
            inputs.push(Input::spending(cell.out_point.clone()));
            pubkeys.push(owner_pubkey.clone());
            total = total
                .checked_add(cell.capacity)
                .ok_or(WalletError::CapacityOverflow)?;

            if total >= target && total - target >= min_capacity {
                break;
            }
        }

        if total < target {
            debug!(total, target, scanned = cells.len(), "selector: insufficient capacity");
            return Err(WalletError::InsufficientCapacity(
                CapacityShortfall::Unfunded {
                    available: total,
                    target,
                },
            ));
        }

        debug!(inputs = inputs.len(), total, target, "selector: inputs selected");
        Ok(InputSelection {
            inputs,
            total,
            pubkeys,
        })
    }
}
