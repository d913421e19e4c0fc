//! Weights for pallet-upgrade-proxy.
//!
//! Hand-set until benchmarked. Forwarding cost grows with the payload, since the
//! payload bounds the work the ledger logic can do.

use frame_support::weights::{constants::RocksDbWeight, Weight};

/// Smallest encoding of one batch entry: a one-byte account and a `u128` amount.
pub const MIN_BATCH_ENTRY_LEN: u32 = 17;

/// Upper bound on the transfers a payload of `len` bytes can carry.
pub fn max_batch_entries(len: u32) -> u64 {
    (len / MIN_BATCH_ENTRY_LEN).max(1) as u64
}

pub trait WeightInfo {
    fn forward(len: u32) -> Weight;
    fn upgrade_to() -> Weight;
    fn upgrade_to_and_call(len: u32) -> Weight;
    fn change_admin() -> Weight;
}

impl WeightInfo for () {
    // Each transfer reads role, pause, policy and balance entries and writes two balances.
    fn forward(len: u32) -> Weight {
        let entries = max_batch_entries(len);
        Weight::from_parts(25_000_000, 0)
            .saturating_add(Weight::from_parts(40_000, 0).saturating_mul(len.into()))
            .saturating_add(RocksDbWeight::get().reads(2 + 8 * entries))
            .saturating_add(RocksDbWeight::get().writes(2 + 2 * entries))
    }

    fn upgrade_to() -> Weight {
        Weight::from_parts(12_000_000, 0)
            .saturating_add(RocksDbWeight::get().reads(2))
            .saturating_add(RocksDbWeight::get().writes(1))
    }

    fn upgrade_to_and_call(len: u32) -> Weight {
        Self::upgrade_to().saturating_add(Self::forward(len))
    }

    fn change_admin() -> Weight {
        Weight::from_parts(10_000_000, 0)
            .saturating_add(RocksDbWeight::get().reads(1))
            .saturating_add(RocksDbWeight::get().writes(1))
    }
}
