//! Weights for pallet-proxy-admin. Each call wraps one dispatcher operation.

use frame_support::weights::{constants::RocksDbWeight, Weight};
use pallet_upgrade_proxy::weights::max_batch_entries;

pub trait WeightInfo {
    fn upgrade() -> Weight;
    fn upgrade_and_call(len: u32) -> Weight;
    fn change_proxy_admin() -> Weight;
}

impl WeightInfo for () {
    fn upgrade() -> Weight {
        Weight::from_parts(15_000_000, 0)
            .saturating_add(RocksDbWeight::get().reads(2))
            .saturating_add(RocksDbWeight::get().writes(1))
    }

    fn upgrade_and_call(len: u32) -> Weight {
        let entries = max_batch_entries(len);
        Weight::from_parts(40_000_000, 0)
            .saturating_add(Weight::from_parts(40_000, 0).saturating_mul(len.into()))
            .saturating_add(RocksDbWeight::get().reads(4 + 8 * entries))
            .saturating_add(RocksDbWeight::get().writes(3 + 2 * entries))
    }

    fn change_proxy_admin() -> Weight {
        Weight::from_parts(12_000_000, 0)
            .saturating_add(RocksDbWeight::get().reads(1))
            .saturating_add(RocksDbWeight::get().writes(1))
    }
}
