//! Protocol and wallet constants. All capacities are in the ledger's minimal unit.

/// Length in bytes of the public-key short hash carried in a lock script's args.
pub const SHORT_HASH_LEN: usize = 20;

/// Default minimum capacity any output cell must carry.
pub const DEFAULT_MIN_CELL_CAPACITY: u64 = 40;

/// Default number of blocks covered by a single `cells_by_lock_hash` query.
pub const DEFAULT_PAGE_WINDOW: u64 = 100;

/// First block height scanned when listing unspent cells. Genesis is skipped.
pub const FIRST_SCAN_HEIGHT: u64 = 1;

/// Transaction version produced by the builder.
pub const TX_VERSION: u32 = 0;

/// Required prefix of a hex-encoded secret key.
pub const SECRET_KEY_PREFIX: &str = "0x";

/// Total length of a hex-encoded secret key, prefix included.
pub const SECRET_KEY_HEX_LEN: usize = 66;

/// BLAKE3 derive-key context separating signing digests from every other hash.
pub const SIGHASH_CONTEXT: &str = "cellwallet 2026-01-01 sighash-all v1";
