//! mockall doubles and a tracing capture shared by the unit tests.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use cell_core::crypto::{PublicKey, SecretKey, Signature};
use cell_core::error::{CryptoError, RpcError};
use cell_core::lock::LockScript;
use cell_core::traits::{DigestSigner, LedgerRpc};
use cell_core::types::{Cell, Hash256, OutPoint, Transaction};

mockall::mock! {
    pub Ledger {}

    impl LedgerRpc for Ledger {
        fn tip_height(&self) -> Result<u64, RpcError>;
        fn cells_by_lock_hash(
            &self,
            lock_hash: &Hash256,
            from: u64,
            to: u64,
        ) -> Result<Vec<Cell>, RpcError>;
        fn parse_address(&self, address: &str) -> Result<LockScript, RpcError>;
        fn encode_address(&self, lock: &LockScript) -> Result<String, RpcError>;
        fn standard_script_code_reference(&self) -> Result<Hash256, RpcError>;
        fn standard_script_dependency(&self) -> Result<OutPoint, RpcError>;
        fn submit_transaction(&self, tx: &Transaction) -> Result<Hash256, RpcError>;
        fn get_transaction(&self, hash: &Hash256) -> Result<Option<Transaction>, RpcError>;
    }
}

mockall::mock! {
    pub Backend {}

    impl DigestSigner for Backend {
        fn public_key(&self, key: &SecretKey) -> Result<PublicKey, CryptoError>;
        fn sign(&self, digest: &Hash256, key: &SecretKey) -> Result<Signature, CryptoError>;
    }
}

/// Standard script code reference used across tests.
pub const CODE_REF: Hash256 = Hash256([0xC0; 32]);

/// A cell of `capacity` with a distinct out point per `seed`.
pub fn cell(seed: u8, capacity: u64, lock: &LockScript) -> Cell {
    Cell {
        out_point: OutPoint::new(Hash256([seed; 32]), 0),
        capacity,
        data: vec![],
        lock: lock.clone(),
    }
}

/// One recorded tracing event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    /// Debug rendering of the field called `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct FieldRecorder(Vec<(String, String)>);

impl Visit for FieldRecorder {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
}

struct CaptureLayer(Arc<Mutex<Vec<CapturedEvent>>>);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut recorder = FieldRecorder::default();
        event.record(&mut recorder);
        self.0.lock().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: recorder.0,
        });
    }
}

/// Run `f` with a thread-local subscriber and return the events it emitted.
pub fn capture_events<R>(f: impl FnOnce() -> R) -> (R, Vec<CapturedEvent>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer(events.clone()));
    let out = tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().clone();
    (out, captured)
}
