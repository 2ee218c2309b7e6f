//! Shared test helpers for E2E and property tests.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use cell_core::crypto::verify_transaction;
use cell_core::error::RpcError;
use cell_core::lock::LockScript;
use cell_core::traits::LedgerRpc;
use cell_core::types::{Cell, Hash256, OutPoint, Transaction};

/// Code reference of the in-memory ledger's standard lock script.
pub const STANDARD_CODE_REF: Hash256 = Hash256([0x5C; 32]);

/// Address prefix understood by [`InMemoryLedger`].
pub const ADDRESS_PREFIX: &str = "cell1";

/// Two well-formed wallet keys.
pub const ALICE_KEY: &str = "0xe79f3207ea4980b7fed79956d5934249ceac4751a4fae01a0f7c4a96884bc4e3";
pub const BOB_KEY: &str = "0x1b3b5fe4d9ad1e42f9a1c7f3b2de3bbf5a1c2d3e4f5061728394a5b6c7d8e9f0";

/// The cell defining the standard lock script.
pub fn standard_dep() -> OutPoint {
    OutPoint::new(Hash256([0x5D; 32]), 0)
}

/// Install a test-writer subscriber once. Honors `RUST_LOG`, defaults to `warn`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Number of calls made to each [`LedgerRpc`] method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub tip_height: usize,
    pub cells_by_lock_hash: usize,
    pub parse_address: usize,
    pub encode_address: usize,
    pub code_reference: usize,
    pub dependency: usize,
    pub submit_transaction: usize,
    pub get_transaction: usize,
}

impl CallCounts {
    /// Sum over every method.
    pub fn total(&self) -> usize {
        self.tip_height
            + self.cells_by_lock_hash
            + self.parse_address
            + self.encode_address
            + self.code_reference
            + self.dependency
            + self.submit_transaction
            + self.get_transaction
    }
}

struct LiveCell {
    height: u64,
    cell: Cell,
}

#[derive(Default)]
struct LedgerState {
    tip: u64,
    live: Vec<LiveCell>,
    transactions: HashMap<Hash256, Transaction>,
    calls: CallCounts,
    ranges: Vec<(u64, u64)>,
    offline: bool,
    next_funding: u64,
}

/// In-memory ledger node.
///
/// Accepts a transaction only if every input is live, every witness verifies
/// against the input cell's lock arg, the standard dep is listed, and input
/// and output capacities balance. Accepted transactions are committed into a
/// new block at `tip + 1`.
#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mine one block creating a cell per capacity for `lock`.
    pub fn fund(&self, lock: &LockScript, capacities: &[u64]) -> Vec<OutPoint> {
        let height = self.state.lock().tip + 1;
        self.fund_at(height, lock, capacities)
    }

    /// Create cells at `height`, raising the tip to it if needed.
    pub fn fund_at(&self, height: u64, lock: &LockScript, capacities: &[u64]) -> Vec<OutPoint> {
        let mut state = self.state.lock();
        state.next_funding += 1;
        let mut tx_hash = [0xF0u8; 32];
        tx_hash[..8].copy_from_slice(&state.next_funding.to_le_bytes());

        let mut out_points = Vec::with_capacity(capacities.len());
        for (i, &capacity) in capacities.iter().enumerate() {
            let out_point = OutPoint::new(Hash256(tx_hash), i as u32);
            state.live.push(LiveCell {
                height,
                cell: Cell {
                    out_point: out_point.clone(),
                    capacity,
                    data: vec![],
                    lock: lock.clone(),
                },
            });
            out_points.push(out_point);
        }
        state.tip = state.tip.max(height);
        out_points
    }

    /// Mine `blocks` empty blocks.
    pub fn advance(&self, blocks: u64) {
        self.state.lock().tip += blocks;
    }

    /// Make every subsequent call fail with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    pub fn tip(&self) -> u64 {
        self.state.lock().tip
    }

    pub fn calls(&self) -> CallCounts {
        self.state.lock().calls.clone()
    }

    /// Block ranges requested through `cells_by_lock_hash`, in call order.
    pub fn ranges(&self) -> Vec<(u64, u64)> {
        self.state.lock().ranges.clone()
    }

    pub fn reset_calls(&self) {
        let mut state = self.state.lock();
        state.calls = CallCounts::default();
        state.ranges.clear();
    }

    /// Every live cell regardless of lock.
    pub fn live_cells(&self) -> Vec<Cell> {
        self.state.lock().live.iter().map(|l| l.cell.clone()).collect()
    }

    fn check_online(state: &LedgerState) -> Result<(), RpcError> {
        if state.offline {
            return Err(RpcError::Transport("node unreachable".into()));
        }
        Ok(())
    }

    fn validate(state: &LedgerState, tx: &Transaction) -> Result<(), RpcError> {
        if tx.inputs.is_empty() || tx.outputs.is_empty() {
            return Err(RpcError::Rejected("empty inputs or outputs".into()));
        }
        if !tx.deps.contains(&standard_dep()) {
            return Err(RpcError::Rejected("missing standard script dep".into()));
        }

        let mut seen = HashSet::new();
        let mut input_total: u64 = 0;
        for input in &tx.inputs {
            if !seen.insert(input.previous_output.clone()) {
                return Err(RpcError::Rejected(format!(
                    "duplicate input {}",
                    input.previous_output
                )));
            }
            let live = state
                .live
                .iter()
                .find(|l| l.cell.out_point == input.previous_output)
                .ok_or_else(|| {
                    RpcError::Rejected(format!("dead cell {}", input.previous_output))
                })?;
            let owner_arg = live
                .cell
                .lock
                .args
                .first()
                .ok_or_else(|| RpcError::Rejected("lock without args".into()))?;
            verify_transaction(tx, owner_arg)
                .map_err(|e| RpcError::Rejected(format!("witness: {e}")))?;
            input_total = input_total
                .checked_add(live.cell.capacity)
                .ok_or_else(|| RpcError::Rejected("input overflow".into()))?;
        }

        let output_total = tx
            .total_output_capacity()
            .ok_or_else(|| RpcError::Rejected("output overflow".into()))?;
        if output_total != input_total {
            return Err(RpcError::Rejected(format!(
                "capacity mismatch: inputs {input_total}, outputs {output_total}"
            )));
        }
        Ok(())
    }
}

impl LedgerRpc for InMemoryLedger {
    fn tip_height(&self) -> Result<u64, RpcError> {
        let mut state = self.state.lock();
        state.calls.tip_height += 1;
        Self::check_online(&state)?;
        Ok(state.tip)
    }

    fn cells_by_lock_hash(
        &self,
        lock_hash: &Hash256,
        from: u64,
        to: u64,
    ) -> Result<Vec<Cell>, RpcError> {
        let mut state = self.state.lock();
        state.calls.cells_by_lock_hash += 1;
        state.ranges.push((from, to));
        Self::check_online(&state)?;
        Ok(state
            .live
            .iter()
            .filter(|l| l.height >= from && l.height <= to && l.cell.lock.hash() == *lock_hash)
            .map(|l| l.cell.clone())
            .collect())
    }

    fn parse_address(&self, address: &str) -> Result<LockScript, RpcError> {
        let mut state = self.state.lock();
        state.calls.parse_address += 1;
        Self::check_online(&state)?;
        let arg = address
            .strip_prefix(ADDRESS_PREFIX)
            .and_then(|body| hex::decode(body).ok())
            .ok_or_else(|| RpcError::InvalidAddress(address.to_string()))?;
        Ok(LockScript::new(STANDARD_CODE_REF, vec![arg]))
    }

    fn encode_address(&self, lock: &LockScript) -> Result<String, RpcError> {
        let mut state = self.state.lock();
        state.calls.encode_address += 1;
        Self::check_online(&state)?;
        match lock.args.as_slice() {
            [arg] if lock.code_reference == STANDARD_CODE_REF => {
                Ok(format!("{ADDRESS_PREFIX}{}", hex::encode(arg)))
            }
            _ => Err(RpcError::InvalidAddress("not a standard lock".into())),
        }
    }

    fn standard_script_code_reference(&self) -> Result<Hash256, RpcError> {
        let mut state = self.state.lock();
        state.calls.code_reference += 1;
        Self::check_online(&state)?;
        Ok(STANDARD_CODE_REF)
    }

    fn standard_script_dependency(&self) -> Result<OutPoint, RpcError> {
        let mut state = self.state.lock();
        state.calls.dependency += 1;
        Self::check_online(&state)?;
        Ok(standard_dep())
    }

    fn submit_transaction(&self, tx: &Transaction) -> Result<Hash256, RpcError> {
        let mut state = self.state.lock();
        state.calls.submit_transaction += 1;
        Self::check_online(&state)?;
        Self::validate(&state, tx)?;

        let hash = tx
            .hash()
            .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;
        let spent: HashSet<&OutPoint> = tx.inputs.iter().map(|i| &i.previous_output).collect();
        state.live.retain(|l| !spent.contains(&l.cell.out_point));

        let height = state.tip + 1;
        for (i, output) in tx.outputs.iter().enumerate() {
            state.live.push(LiveCell {
                height,
                cell: Cell {
                    out_point: OutPoint::new(hash, i as u32),
                    capacity: output.capacity,
                    data: output.data.clone(),
                    lock: output.lock.clone(),
                },
            });
        }
        state.tip = height;
        state.transactions.insert(hash, tx.clone());
        Ok(hash)
    }

    fn get_transaction(&self, hash: &Hash256) -> Result<Option<Transaction>, RpcError> {
        let mut state = self.state.lock();
        state.calls.get_transaction += 1;
        Self::check_online(&state)?;
        Ok(state.transactions.get(hash).cloned())
    }
}
