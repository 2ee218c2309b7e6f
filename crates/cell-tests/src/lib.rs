//! End-to-end and property test suite for cellwallet.
//!
//! [`helpers::InMemoryLedger`] stands in for a node: it tracks live cells per
//! block, validates witnesses on submission, and commits accepted
//! transactions into a new block.

pub mod helpers;
