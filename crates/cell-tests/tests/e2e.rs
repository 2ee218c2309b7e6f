//! End-to-end wallet tests against the in-memory ledger.
//!
//! Each test funds wallets by mining cells directly into the ledger, then
//! drives the full pipeline: paging, selection, building, signing and
//! submission. The ledger checks every witness, so an accepted transaction
//! proves the signature covers the right digest.

use std::sync::Arc;

use cell_core::error::RpcError;
use cell_core::lock::LockScript;
use cell_core::traits::LedgerRpc;
use cell_core::types::Hash256;
use cell_tests::helpers::*;
use cell_wallet::{CapacityShortfall, Wallet, WalletConfig, WalletError};

fn ledger() -> Arc<InMemoryLedger> {
    init_tracing();
    Arc::new(InMemoryLedger::new())
}

fn open(key: &str, ledger: &Arc<InMemoryLedger>) -> Wallet {
    Wallet::from_hex_key(key, ledger.clone()).unwrap()
}

// ---------------------------------------------------------------------------
// Send scenarios
// ---------------------------------------------------------------------------

#[test]
fn exact_payment_has_no_change() {
    let ledger = ledger();
    let alice = open(ALICE_KEY, &ledger);
    let bob = open(BOB_KEY, &ledger);
    ledger.fund(alice.lock(), &[50]);

    let tx = alice.build_send(bob.lock(), 50).unwrap();
    assert_eq!(tx.inputs.len(), 1);
    assert_eq!(tx.outputs.len(), 1);
    assert_eq!(tx.outputs[0].capacity, 50);
    assert_eq!(tx.outputs[0].lock, *bob.lock());

    ledger.submit_transaction(&tx).unwrap();
    assert_eq!(alice.get_balance().unwrap(), 0);
    assert_eq!(bob.get_balance().unwrap(), 50);
}

#[test]
fn sub_minimum_change_is_kept() {
    let ledger = ledger();
    let alice = open(ALICE_KEY, &ledger);
    let bob = open(BOB_KEY, &ledger);
    ledger.fund(alice.lock(), &[60, 60]);

    let tx = alice.build_send(bob.lock(), 100).unwrap();
    assert_eq!(tx.inputs.len(), 2);
    assert_eq!(tx.outputs.len(), 2);
    assert_eq!(tx.outputs[1].capacity, 20);
    assert!(tx.outputs[1].capacity < alice.config().min_capacity);
    assert_eq!(tx.outputs[1].lock, *alice.lock());

    ledger.submit_transaction(&tx).unwrap();
    assert_eq!(alice.get_balance().unwrap(), 20);
    assert_eq!(bob.get_balance().unwrap(), 100);
}

#[test]
fn target_below_minimum_makes_no_calls() {
    let ledger = ledger();
    let alice = open(ALICE_KEY, &ledger);
    let bob = open(BOB_KEY, &ledger);
    ledger.fund(alice.lock(), &[1_000]);
    ledger.reset_calls();

    let expected = WalletError::InsufficientCapacity(CapacityShortfall::BelowMinimum {
        target: 10,
        min_capacity: 40,
    });
    assert_eq!(alice.send_capacity(bob.lock(), 10).unwrap_err(), expected);
    assert_eq!(alice.send_to_address("cell1abcd", 10).unwrap_err(), expected);
    assert_eq!(ledger.calls().total(), 0);
}

#[test]
fn unfunded_after_full_scan() {
    let ledger = ledger();
    let alice = open(ALICE_KEY, &ledger);
    let bob = open(BOB_KEY, &ledger);
    ledger.fund_at(3, alice.lock(), &[20]);
    ledger.fund_at(150, alice.lock(), &[30]);
    ledger.advance(70);
    ledger.reset_calls();

    let err = alice.send_capacity(bob.lock(), 100).unwrap_err();
    assert_eq!(
        err,
        WalletError::InsufficientCapacity(CapacityShortfall::Unfunded {
            available: 50,
            target: 100,
        })
    );
    assert_eq!(ledger.ranges(), vec![(1, 100), (101, 200), (201, 220)]);
    assert_eq!(ledger.calls().submit_transaction, 0);
}

#[test]
fn change_is_spendable_in_a_later_block() {
    let ledger = ledger();
    let alice = open(ALICE_KEY, &ledger);
    let bob = open(BOB_KEY, &ledger);
    ledger.fund(alice.lock(), &[500]);

    alice.send_capacity(bob.lock(), 100).unwrap();
    assert_eq!(alice.get_balance().unwrap(), 400);

    ledger.advance(250);
    alice.send_capacity(bob.lock(), 300).unwrap();
    assert_eq!(alice.get_balance().unwrap(), 100);
    assert_eq!(bob.get_balance().unwrap(), 400);
}

#[test]
fn bob_can_spend_what_alice_sent() {
    let ledger = ledger();
    let alice = open(ALICE_KEY, &ledger);
    let bob = open(BOB_KEY, &ledger);
    ledger.fund(alice.lock(), &[200]);

    alice.send_capacity(bob.lock(), 120).unwrap();
    bob.send_capacity(alice.lock(), 80).unwrap();

    assert_eq!(alice.get_balance().unwrap(), 160);
    assert_eq!(bob.get_balance().unwrap(), 40);
}

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

#[test]
fn send_to_address_round_trip() {
    let ledger = ledger();
    let alice = open(ALICE_KEY, &ledger);
    let bob = open(BOB_KEY, &ledger);
    ledger.fund(alice.lock(), &[100]);

    let address = bob.address().unwrap();
    assert!(address.starts_with(ADDRESS_PREFIX));
    assert_eq!(ledger.parse_address(&address).unwrap(), *bob.lock());

    alice.send_to_address(&address, 60).unwrap();
    assert_eq!(bob.get_balance().unwrap(), 60);
}

#[test]
fn malformed_address_passes_through() {
    let ledger = ledger();
    let alice = open(ALICE_KEY, &ledger);
    ledger.fund(alice.lock(), &[100]);

    let err = alice.send_to_address("not-an-address", 60).unwrap_err();
    assert!(matches!(err, WalletError::Rpc(RpcError::InvalidAddress(_))));
    assert_eq!(alice.get_balance().unwrap(), 100);
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[test]
fn balance_is_idempotent() {
    let ledger = ledger();
    let alice = open(ALICE_KEY, &ledger);
    ledger.fund(alice.lock(), &[10, 20, 30]);
    ledger.fund_at(420, alice.lock(), &[40]);

    let first = alice.get_balance().unwrap();
    let second = alice.get_balance().unwrap();
    assert_eq!(first, 100);
    assert_eq!(first, second);
}

#[test]
fn unspent_cells_listed_in_block_order() {
    let ledger = ledger();
    let alice = open(ALICE_KEY, &ledger);
    let bob = open(BOB_KEY, &ledger);
    let early = ledger.fund_at(5, alice.lock(), &[70]);
    ledger.fund_at(6, bob.lock(), &[999]);
    let late = ledger.fund_at(180, alice.lock(), &[80]);

    let cells = alice.get_unspent_cells().unwrap();
    let out_points: Vec<_> = cells.iter().map(|c| c.out_point.clone()).collect();
    assert_eq!(out_points, [early, late].concat());
    assert!(cells.iter().all(|c| c.lock == *alice.lock()));
}

#[test]
fn empty_chain_issues_no_range_queries() {
    let ledger = ledger();
    let alice = open(ALICE_KEY, &ledger);

    assert_eq!(alice.get_balance().unwrap(), 0);
    assert_eq!(ledger.calls().cells_by_lock_hash, 0);
}

#[test]
fn custom_page_window() {
    let ledger = ledger();
    let config = WalletConfig {
        page_window: 10,
        ..WalletConfig::default()
    };
    let alice = Wallet::with_config(
        ALICE_KEY,
        ledger.clone(),
        Arc::new(cell_core::crypto::Ed25519Signer),
        config,
    )
    .unwrap();
    ledger.fund_at(25, alice.lock(), &[45]);

    assert_eq!(alice.get_balance().unwrap(), 45);
    assert_eq!(ledger.ranges(), vec![(1, 10), (11, 20), (21, 25)]);
}

#[test]
fn submitted_transaction_is_retrievable() {
    let ledger = ledger();
    let alice = open(ALICE_KEY, &ledger);
    let bob = open(BOB_KEY, &ledger);
    ledger.fund(alice.lock(), &[100]);

    let hash = alice.send_capacity(bob.lock(), 50).unwrap();
    let tx = alice.get_transaction(&hash).unwrap().unwrap();
    assert_eq!(tx.hash().unwrap(), hash);
    assert!(tx.is_signed());

    assert_eq!(alice.get_transaction(&Hash256([0x42; 32])).unwrap(), None);
}

#[test]
fn block_assembler_names_code_reference() {
    let ledger = ledger();
    let alice = open(ALICE_KEY, &ledger);

    let stanza = alice.block_assembler_config();
    assert!(stanza.starts_with("[block_assembler]"));
    assert!(stanza.contains(&STANDARD_CODE_REF.to_prefixed_hex()));
}

// ---------------------------------------------------------------------------
// Rejections and failures
// ---------------------------------------------------------------------------

#[test]
fn ledger_rejects_tampered_output() {
    let ledger = ledger();
    let alice = open(ALICE_KEY, &ledger);
    let bob = open(BOB_KEY, &ledger);
    ledger.fund(alice.lock(), &[100]);

    let mut tx = alice.build_send(bob.lock(), 50).unwrap();
    tx.outputs[0].lock = LockScript::new(STANDARD_CODE_REF, vec![vec![0xEE; 20]]);

    let err = ledger.submit_transaction(&tx).unwrap_err();
    assert!(matches!(err, RpcError::Rejected(ref m) if m.contains("witness")));
}

#[test]
fn ledger_rejects_stale_double_spend() {
    let ledger = ledger();
    let alice = open(ALICE_KEY, &ledger);
    let bob = open(BOB_KEY, &ledger);
    ledger.fund(alice.lock(), &[100]);

    let first = alice.build_send(bob.lock(), 50).unwrap();
    let second = alice.build_send(bob.lock(), 60).unwrap();
    ledger.submit_transaction(&first).unwrap();

    let err = ledger.submit_transaction(&second).unwrap_err();
    assert!(matches!(err, RpcError::Rejected(ref m) if m.contains("dead cell")));
}

#[test]
fn key_errors_precede_network() {
    let ledger = ledger();
    for bad in [
        "e79f3207ea4980b7fed79956d5934249ceac4751a4fae01a0f7c4a96884bc4e3",
        "0x1234",
        "0xzz9f3207ea4980b7fed79956d5934249ceac4751a4fae01a0f7c4a96884bc4e3",
    ] {
        let err = Wallet::from_hex_key(bad, ledger.clone()).unwrap_err();
        assert!(matches!(err, WalletError::InvalidKey(_)), "{bad}");
    }
    assert_eq!(ledger.calls().total(), 0);
}

#[test]
fn transport_failure_propagates() {
    let ledger = ledger();
    let alice = open(ALICE_KEY, &ledger);
    let bob = open(BOB_KEY, &ledger);
    ledger.fund(alice.lock(), &[100]);
    ledger.set_offline(true);

    let err = alice.send_capacity(bob.lock(), 50).unwrap_err();
    assert!(matches!(err, WalletError::Rpc(RpcError::Transport(_))));

    ledger.set_offline(false);
    assert_eq!(alice.get_balance().unwrap(), 100);
}

#[test]
fn opening_a_wallet_fails_when_offline() {
    let ledger = ledger();
    ledger.set_offline(true);
    let err = Wallet::from_hex_key(ALICE_KEY, ledger.clone()).unwrap_err();
    assert!(matches!(err, WalletError::Rpc(RpcError::Transport(_))));
}
