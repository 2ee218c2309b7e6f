//! Windowed listing of a lock's live cells.
//!
//! The node answers cell queries over bounded block ranges, so the pager
//! walks from height 1 to the tip in fixed windows and concatenates the
//! pages in the order returned. Each call is a fresh snapshot: nothing stops
//! the chain from advancing between two calls, or between listing and
//! spending.

use tracing::debug;

use cell_core::constants::FIRST_SCAN_HEIGHT;
use cell_core::traits::LedgerRpc;
use cell_core::types::{Cell, Hash256};

use crate::error::WalletError;

/// Pages live cells out of a [`LedgerRpc`].
pub struct CellPager<'a> {
    rpc: &'a dyn LedgerRpc,
    window: u64,
}

impl<'a> CellPager<'a> {
    /// Create a pager issuing queries of `window` blocks. A zero window is
    /// treated as one block.
    pub fn new(rpc: &'a dyn LedgerRpc, window: u64) -> Self {
        Self {
            rpc,
            window: window.max(1),
        }
    }

    /// All live cells guarded by `lock_hash`, in strictly increasing window order.
    pub fn list_unspent(&self, lock_hash: &Hash256) -> Result<Vec<Cell>, WalletError> {
        let tip = self.rpc.tip_height()?;
        let mut cells = Vec::new();
        if tip < FIRST_SCAN_HEIGHT {
            debug!(tip, "pager: chain has no scannable blocks");
            return Ok(cells);
        }

        let mut from = FIRST_SCAN_HEIGHT;
        loop {
            let to = from.saturating_add(self.window - 1).min(tip);
            let page = self.rpc.cells_by_lock_hash(lock_hash, from, to)?;
            debug!(from, to, count = page.len(), "pager: fetched window");
            cells.extend(page);
            if to >= tip {
                break;
            }
            from = to + 1;
        }

        debug!(%lock_hash, tip, total = cells.len(), "pager: listing complete");
        Ok(cells)
    }

    /// Sum of capacities over [`list_unspent`](Self::list_unspent).
    pub fn balance(&self, lock_hash: &Hash256) -> Result<u64, WalletError> {
        self.list_unspent(lock_hash)?
            .iter()
            .try_fold(0u64, |acc, cell| acc.checked_add(cell.capacity))
            .ok_or(WalletError::CapacityOverflow)
    }
}
